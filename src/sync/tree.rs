use super::{ReparentPolicy, SyncReport};
use crate::display::{Columns, RowHandle, TreeModel};
use crate::tree::FlatEntry;
use log::{debug, warn};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// A process currently shown in the tree.
#[derive(Debug, Clone)]
struct LiveRow {
    handle: RowHandle,
    /// Flat parent pid the row was placed (or last moved) for.
    parent_pid: u32,
    columns: Columns,
}

/// Keeps a [`TreeModel`] in step with successive flat projections.
///
/// Each process keeps the same [`RowHandle`] for as long as it stays in the
/// snapshots; only rows for new or vanished processes are inserted or
/// removed. Every pass runs in the order update, insert, reparent, remove.
#[derive(Debug, Default)]
pub struct TreeSynchronizer {
    policy: ReparentPolicy,
    live_rows: HashMap<u32, LiveRow>,
    pids: HashMap<RowHandle, u32>,
    polls: u64,
}

impl TreeSynchronizer {
    pub fn new(policy: ReparentPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ReparentPolicy {
        self.policy
    }

    pub fn row_for(&self, pid: u32) -> Option<RowHandle> {
        self.live_rows.get(&pid).map(|row| row.handle)
    }

    pub fn live_pids(&self) -> Vec<u32> {
        let mut pids: Vec<u32> = self.live_rows.keys().copied().collect();
        pids.sort_unstable();
        pids
    }

    pub fn len(&self) -> usize {
        self.live_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live_rows.is_empty()
    }

    /// Number of completed sync passes.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn sync<M: TreeModel>(&mut self, entries: &[FlatEntry], model: &mut M) -> SyncReport {
        let mut by_pid: HashMap<u32, &FlatEntry> = HashMap::with_capacity(entries.len());
        let mut order = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.pid() == 0 {
                continue;
            }
            if by_pid.insert(entry.pid(), entry).is_some() {
                warn!("duplicate pid {} in flat entries, keeping the last", entry.pid());
            } else {
                order.push(entry.pid());
            }
        }

        if self.live_rows.is_empty() {
            debug!("building tree model from {} entries", order.len());
        }

        // Without reparenting, rows below a vanished ancestor go with it and
        // must not take new children this pass.
        let blocked = match self.policy {
            ReparentPolicy::Keep => self.doomed_pids(&by_pid, &*model),
            ReparentPolicy::Move => HashSet::new(),
        };

        let mut report = SyncReport::default();
        self.update_rows(&order, &by_pid, model, &mut report);
        self.insert_rows(&order, &by_pid, &blocked, model, &mut report);
        if self.policy == ReparentPolicy::Move {
            self.reparent_rows(&order, &by_pid, model, &mut report);
        }
        self.remove_rows(&by_pid, model, &mut report);

        self.polls += 1;
        debug!("tree sync #{}: {report}", self.polls);
        report
    }

    fn update_rows<M: TreeModel>(
        &mut self,
        order: &[u32],
        by_pid: &HashMap<u32, &FlatEntry>,
        model: &mut M,
        report: &mut SyncReport,
    ) {
        for pid in order {
            let (Some(row), Some(entry)) = (self.live_rows.get_mut(pid), by_pid.get(pid)) else {
                continue;
            };
            let columns = entry.record.columns();
            if columns != row.columns {
                model.update_columns(row.handle, columns.clone());
                row.columns = columns;
                report.updated += 1;
            }
        }
    }

    /// A parent is usable when it is shown, still in this snapshot and not
    /// about to be removed.
    fn resolve_parent(
        &self,
        parent_pid: u32,
        by_pid: &HashMap<u32, &FlatEntry>,
        blocked: &HashSet<u32>,
    ) -> Option<RowHandle> {
        if !by_pid.contains_key(&parent_pid) || blocked.contains(&parent_pid) {
            return None;
        }
        self.row_for(parent_pid)
    }

    /// Shown pids missing from this snapshot plus every row still below them.
    fn doomed_pids<M: TreeModel>(&self, by_pid: &HashMap<u32, &FlatEntry>, model: &M) -> HashSet<u32> {
        let mut stack: Vec<RowHandle> = self
            .live_rows
            .iter()
            .filter(|(pid, _)| !by_pid.contains_key(*pid))
            .map(|(_, row)| row.handle)
            .collect();

        let mut doomed = HashSet::new();
        while let Some(handle) = stack.pop() {
            let Some(&pid) = self.pids.get(&handle) else {
                continue;
            };
            if doomed.insert(pid) {
                stack.extend(model.children(Some(handle)));
            }
        }
        doomed
    }

    fn insert_rows<M: TreeModel>(
        &mut self,
        order: &[u32],
        by_pid: &HashMap<u32, &FlatEntry>,
        blocked: &HashSet<u32>,
        model: &mut M,
        report: &mut SyncReport,
    ) {
        let mut pending: Vec<&FlatEntry> = order
            .iter()
            .filter(|pid| !self.live_rows.contains_key(*pid))
            .filter_map(|pid| by_pid.get(pid).copied())
            .collect();
        if pending.is_empty() {
            return;
        }

        // Phase 1: top-level processes
        pending.retain(|entry| {
            if entry.parent_pid != 0 {
                return true;
            }
            self.place(entry, None, model);
            report.inserted += 1;
            false
        });

        // Phase 2: children whose parent row now exists, until no progress
        loop {
            let before = pending.len();
            pending.retain(|entry| match self.resolve_parent(entry.parent_pid, by_pid, blocked) {
                Some(parent) => {
                    self.place(entry, Some(parent), model);
                    report.inserted += 1;
                    false
                }
                None => true,
            });
            if pending.is_empty() || pending.len() == before {
                break;
            }
        }

        if !pending.is_empty() {
            let stranded: Vec<(u32, u32)> = pending
                .iter()
                .map(|entry| (entry.pid(), entry.parent_pid))
                .collect();
            warn!(
                "{} processes have no resolvable parent, attaching to the root: {stranded:?}",
                stranded.len()
            );
            for entry in pending {
                self.place(entry, None, model);
                report.inserted += 1;
                report.fallback += 1;
            }
        }
    }

    fn place<M: TreeModel>(&mut self, entry: &FlatEntry, parent: Option<RowHandle>, model: &mut M) {
        let columns = entry.record.columns();
        let handle = model.insert_row(parent, columns.clone());
        self.pids.insert(handle, entry.pid());
        self.live_rows.insert(
            entry.pid(),
            LiveRow {
                handle,
                parent_pid: entry.parent_pid,
                columns,
            },
        );
    }

    fn reparent_rows<M: TreeModel>(
        &mut self,
        order: &[u32],
        by_pid: &HashMap<u32, &FlatEntry>,
        model: &mut M,
        report: &mut SyncReport,
    ) {
        for pid in order {
            let (Some(row), Some(entry)) = (self.live_rows.get(pid), by_pid.get(pid)) else {
                continue;
            };
            if row.parent_pid == entry.parent_pid {
                continue;
            }
            let handle = row.handle;
            let new_parent_pid = entry.parent_pid;

            let target = if new_parent_pid == 0 {
                None
            } else {
                self.resolve_parent(new_parent_pid, by_pid, &HashSet::new())
            };
            let allowed = match target {
                Some(target) => !is_within(model, target, handle, self.live_rows.len()),
                None => true,
            };

            if allowed {
                if model.parent_of(handle) != target {
                    model.move_row(handle, target);
                    report.moved += 1;
                }
            } else {
                warn!("pid {pid} cannot move under its own descendant {new_parent_pid}, leaving it in place");
            }

            if let Some(row) = self.live_rows.get_mut(pid) {
                row.parent_pid = new_parent_pid;
            }
        }
    }

    fn remove_rows<M: TreeModel>(
        &mut self,
        by_pid: &HashMap<u32, &FlatEntry>,
        model: &mut M,
        report: &mut SyncReport,
    ) {
        // Missing rows take every row still hanging below them
        let doomed = self.doomed_pids(by_pid, &*model);
        if doomed.is_empty() {
            return;
        }

        let limit = self.live_rows.len();
        let mut removals: Vec<(usize, u32)> = doomed
            .into_iter()
            .filter_map(|pid| {
                let row = self.live_rows.get(&pid)?;
                Some((depth_of(&*model, row.handle, limit), pid))
            })
            .collect();
        removals.sort_unstable_by_key(|&(depth, pid)| (Reverse(depth), pid));

        for (_, pid) in removals {
            let Some(row) = self.live_rows.remove(&pid) else {
                continue;
            };
            if by_pid.contains_key(&pid) {
                debug!("pid {pid} removed with its vanished ancestor");
            }
            self.pids.remove(&row.handle);
            model.remove_row(row.handle);
            report.removed += 1;
        }
    }
}

/// Distance from the display root. `limit` bounds the walk.
fn depth_of<M: TreeModel>(model: &M, row: RowHandle, limit: usize) -> usize {
    let mut depth = 0;
    let mut current = model.parent_of(row);
    while let Some(parent) = current {
        depth += 1;
        if depth > limit {
            break;
        }
        current = model.parent_of(parent);
    }
    depth
}

/// Whether `row` is `ancestor` or lies somewhere below it.
fn is_within<M: TreeModel>(model: &M, row: RowHandle, ancestor: RowHandle, limit: usize) -> bool {
    let mut current = Some(row);
    let mut steps = 0;
    while let Some(handle) = current {
        if handle == ancestor {
            return true;
        }
        steps += 1;
        if steps > limit {
            break;
        }
        current = model.parent_of(handle);
    }
    false
}
