//! One monitoring session: snapshots in, synchronized tree and table out.

use crate::config::Settings;
use crate::display::{TableStore, TreeStore};
use crate::process::{dedup_pids, ProcessRecord, SnapshotFilter};
use crate::sync::{ReparentPolicy, SyncReport, TableSynchronizer, TreeSynchronizer};
use crate::tree::build_tree;
use anyhow::Result;
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionReport {
    pub processes: usize,
    pub tree: SyncReport,
    pub table: SyncReport,
}

/// Owns both views and their synchronizers. Snapshots must be applied one
/// at a time, in the order they were taken.
#[derive(Debug, Default)]
pub struct Session {
    filter: SnapshotFilter,
    tree_sync: TreeSynchronizer,
    table_sync: TableSynchronizer,
    tree: TreeStore,
    table: TableStore,
}

impl Session {
    pub fn new(policy: ReparentPolicy, filter: SnapshotFilter) -> Self {
        Self {
            filter,
            tree_sync: TreeSynchronizer::new(policy),
            ..Self::default()
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let filter = SnapshotFilter::new(&settings.exclude)?;
        Ok(Self::new(settings.reparent, filter))
    }

    pub fn apply(&mut self, snapshot: Vec<ProcessRecord>) -> SessionReport {
        // Deduplicated once here so both views agree on the surviving record
        let records = dedup_pids(self.filter.apply(snapshot));
        let entries = build_tree(&records).flatten();

        let tree = self.tree_sync.sync(&entries, &mut self.tree);
        let table = self.table_sync.sync(&records, &mut self.table);

        let report = SessionReport {
            processes: entries.len(),
            tree,
            table,
        };
        info!(
            "poll #{}: {} processes, tree {}, table {}",
            self.tree_sync.polls(),
            report.processes,
            report.tree,
            report.table
        );
        report
    }

    pub fn tree(&self) -> &TreeStore {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut TreeStore {
        &mut self.tree
    }

    pub fn table(&self) -> &TableStore {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableStore {
        &mut self.table
    }

    pub fn tree_sync(&self) -> &TreeSynchronizer {
        &self.tree_sync
    }

    pub fn table_sync(&self) -> &TableSynchronizer {
        &self.table_sync
    }
}
