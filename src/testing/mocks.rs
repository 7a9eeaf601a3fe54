use crate::display::{Columns, RowHandle, TableModel, TableStore, TreeModel, TreeStore};
use crate::process::{ProcessRecord, SnapshotSource};
use std::collections::VecDeque;

/// One mutating call made against a model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelCall {
    Insert { parent: Option<RowHandle>, row: RowHandle },
    /// `children` counts rows still attached below `row` when it went.
    Remove { row: RowHandle, depth: usize, children: usize },
    Update { row: RowHandle, unchanged: bool },
    Move { row: RowHandle, to: Option<RowHandle> },
}

/// Tree model that forwards to a [`TreeStore`] and logs every mutation.
#[derive(Debug, Default)]
pub struct RecordingTreeModel {
    pub store: TreeStore,
    pub calls: Vec<ModelCall>,
}

impl RecordingTreeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_calls(&mut self) -> Vec<ModelCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn inserts(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, ModelCall::Insert { .. })).count()
    }

    pub fn removes(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, ModelCall::Remove { .. })).count()
    }

    /// Updates that actually changed content.
    pub fn content_updates(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ModelCall::Update { unchanged: false, .. }))
            .count()
    }
}

impl TreeModel for RecordingTreeModel {
    fn insert_row(&mut self, parent: Option<RowHandle>, columns: Columns) -> RowHandle {
        let row = self.store.insert_row(parent, columns);
        self.calls.push(ModelCall::Insert { parent, row });
        row
    }

    fn remove_row(&mut self, row: RowHandle) {
        let depth = self.store.depth(row);
        let children = self.store.children(Some(row)).len();
        self.calls.push(ModelCall::Remove { row, depth, children });
        self.store.remove_row(row);
    }

    fn update_columns(&mut self, row: RowHandle, columns: Columns) {
        let unchanged = self.store.columns(row) == Some(&columns);
        self.calls.push(ModelCall::Update { row, unchanged });
        self.store.update_columns(row, columns);
    }

    fn children(&self, parent: Option<RowHandle>) -> Vec<RowHandle> {
        self.store.children(parent)
    }

    fn parent_of(&self, row: RowHandle) -> Option<RowHandle> {
        self.store.parent_of(row)
    }

    fn move_row(&mut self, row: RowHandle, new_parent: Option<RowHandle>) {
        self.calls.push(ModelCall::Move { row, to: new_parent });
        self.store.move_row(row, new_parent);
    }
}

/// One mutating call made against a table model.
#[derive(Debug, Clone, PartialEq)]
pub enum TableCall {
    Append(usize),
    Update(usize),
    Remove(usize),
}

/// Table model that forwards to a [`TableStore`] and logs every mutation.
#[derive(Debug, Default)]
pub struct RecordingTableModel {
    pub store: TableStore,
    pub calls: Vec<TableCall>,
}

impl RecordingTableModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_calls(&mut self) -> Vec<TableCall> {
        std::mem::take(&mut self.calls)
    }
}

impl TableModel for RecordingTableModel {
    fn append_rows(&mut self, rows: Vec<Columns>) {
        self.calls.push(TableCall::Append(rows.len()));
        self.store.append_rows(rows);
    }

    fn update_row(&mut self, index: usize, columns: Columns) {
        self.calls.push(TableCall::Update(index));
        self.store.update_row(index, columns);
    }

    fn remove_row(&mut self, index: usize) {
        self.calls.push(TableCall::Remove(index));
        self.store.remove_row(index);
    }

    fn row_count(&self) -> usize {
        self.store.row_count()
    }
}

/// Serves queued snapshots, then empty ones once the queue runs dry.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    queue: VecDeque<Vec<ProcessRecord>>,
    pub taken: usize,
}

impl ScriptedSource {
    pub fn new(snapshots: Vec<Vec<ProcessRecord>>) -> Self {
        Self {
            queue: snapshots.into(),
            taken: 0,
        }
    }
}

impl SnapshotSource for ScriptedSource {
    fn snapshot(&mut self) -> Vec<ProcessRecord> {
        self.taken += 1;
        self.queue.pop_front().unwrap_or_default()
    }
}
