use super::{Columns, ModelEvent, TableModel};
use log::debug;

/// In-memory [`TableModel`] that records every change notification.
#[derive(Debug, Default)]
pub struct TableStore {
    rows: Vec<Columns>,
    events: Vec<ModelEvent>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Columns] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Columns> {
        self.rows.get(index)
    }

    pub fn events(&self) -> &[ModelEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ModelEvent> {
        std::mem::take(&mut self.events)
    }
}

impl TableModel for TableStore {
    fn append_rows(&mut self, rows: Vec<Columns>) {
        if rows.is_empty() {
            return;
        }
        let first = self.rows.len();
        self.rows.extend(rows);
        self.events.push(ModelEvent::RowsInserted {
            parent: None,
            first,
            last: self.rows.len() - 1,
        });
    }

    fn update_row(&mut self, index: usize, columns: Columns) {
        let Some(row) = self.rows.get_mut(index) else {
            debug!("update_row: index {index} out of range");
            return;
        };
        *row = columns;
        self.events.push(ModelEvent::DataChanged {
            parent: None,
            row: index,
            first_col: 0,
            last_col: Columns::COUNT - 1,
        });
    }

    fn remove_row(&mut self, index: usize) {
        if index >= self.rows.len() {
            debug!("remove_row: index {index} out of range");
            return;
        }
        self.rows.remove(index);
        self.events.push(ModelEvent::RowsRemoved {
            parent: None,
            first: index,
            last: index,
        });
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }
}
