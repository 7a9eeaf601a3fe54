use super::SyncReport;
use crate::display::TableModel;
use crate::process::ProcessRecord;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

/// Keeps a flat [`TableModel`] in step with successive snapshots.
///
/// Rows are kept in model order. New processes are appended; presentation
/// order is the concern of whatever sorts the model.
#[derive(Debug, Default)]
pub struct TableSynchronizer {
    rows: Vec<ProcessRecord>,
}

impl TableSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ProcessRecord] {
        &self.rows
    }

    /// Position of the row showing `pid`.
    pub fn position(&self, pid: u32) -> Option<usize> {
        self.rows.iter().position(|row| row.pid == pid)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sync<M: TableModel>(&mut self, records: &[ProcessRecord], model: &mut M) -> SyncReport {
        let mut by_pid: HashMap<u32, &ProcessRecord> = HashMap::with_capacity(records.len());
        let mut order = Vec::with_capacity(records.len());
        for record in records {
            if record.pid == 0 {
                continue;
            }
            if by_pid.insert(record.pid, record).is_some() {
                warn!("duplicate pid {} in snapshot, keeping the last record", record.pid);
            } else {
                order.push(record.pid);
            }
        }

        let mut report = SyncReport::default();

        if self.rows.is_empty() {
            self.rows = order
                .iter()
                .filter_map(|pid| by_pid.get(pid).map(|&record| record.clone()))
                .collect();
            if !self.rows.is_empty() {
                model.append_rows(self.rows.iter().map(ProcessRecord::columns).collect());
            }
            report.inserted = self.rows.len();
            debug!("table sync (initial): {report}");
            return report;
        }

        for (index, row) in self.rows.iter_mut().enumerate() {
            let Some(&record) = by_pid.get(&row.pid) else {
                continue;
            };
            let changed = !row.volatile_eq(record);
            *row = record.clone();
            if changed {
                model.update_row(index, row.columns());
                report.updated += 1;
            }
        }

        let old_pids: HashSet<u32> = self.rows.iter().map(|row| row.pid).collect();
        let added: Vec<ProcessRecord> = order
            .iter()
            .filter(|pid| !old_pids.contains(*pid))
            .filter_map(|pid| by_pid.get(pid).map(|&record| record.clone()))
            .collect();
        if !added.is_empty() {
            model.append_rows(added.iter().map(ProcessRecord::columns).collect());
            report.inserted = added.len();
            self.rows.extend(added);
        }

        // Highest position first so earlier indices stay valid
        let stale: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !by_pid.contains_key(&row.pid))
            .map(|(index, _)| index)
            .collect();
        for &index in stale.iter().rev() {
            model.remove_row(index);
            self.rows.remove(index);
            report.removed += 1;
        }

        debug!("table sync: {report}");
        report
    }
}
