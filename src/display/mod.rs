//! Display model abstraction.
//!
//! The synchronizers drive a display through [`TreeModel`] (hierarchical
//! view) or [`TableModel`] (flat view). Any GUI or TUI binds to one of these;
//! [`TreeStore`] and [`TableStore`] are the in-memory implementations.

pub mod render;
pub mod table_store;
pub mod tree_store;

pub use table_store::TableStore;
pub use tree_store::TreeStore;

#[cfg(test)]
use mockall::automock;

/// Opaque identity of one displayed row. Stable for the row's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Pid,
    Cpu,
    Memory,
    DiskRead,
    DiskWrite,
    Gpu,
    Status,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Name,
        Column::Pid,
        Column::Cpu,
        Column::Memory,
        Column::DiskRead,
        Column::DiskWrite,
        Column::Gpu,
        Column::Status,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Pid => "PID",
            Column::Cpu => "CPU %",
            Column::Memory => "Memory",
            Column::DiskRead => "Disk Read",
            Column::DiskWrite => "Disk Write",
            Column::Gpu => "GPU %",
            Column::Status => "Status",
        }
    }
}

/// Display text for every column of one row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Columns {
    pub name: String,
    pub pid: String,
    pub cpu: String,
    pub memory: String,
    pub disk_read: String,
    pub disk_write: String,
    pub gpu: String,
    pub status: String,
}

impl Columns {
    pub const COUNT: usize = Column::ALL.len();

    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Name => &self.name,
            Column::Pid => &self.pid,
            Column::Cpu => &self.cpu,
            Column::Memory => &self.memory,
            Column::DiskRead => &self.disk_read,
            Column::DiskWrite => &self.disk_write,
            Column::Gpu => &self.gpu,
            Column::Status => &self.status,
        }
    }
}

/// Change notification emitted by a model after it mutates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    RowsInserted {
        parent: Option<RowHandle>,
        first: usize,
        last: usize,
    },
    RowsRemoved {
        parent: Option<RowHandle>,
        first: usize,
        last: usize,
    },
    /// `row` is the position under `parent` (`None` for table rows).
    DataChanged {
        parent: Option<RowHandle>,
        row: usize,
        first_col: usize,
        last_col: usize,
    },
    RowMoved {
        row: RowHandle,
        from: Option<RowHandle>,
        to: Option<RowHandle>,
    },
}

/// Hierarchical display structure. `None` as a parent means the display root.
#[cfg_attr(test, automock)]
pub trait TreeModel {
    fn insert_row(&mut self, parent: Option<RowHandle>, columns: Columns) -> RowHandle;
    /// Removes the row; rows still below it go with it.
    fn remove_row(&mut self, row: RowHandle);
    fn update_columns(&mut self, row: RowHandle, columns: Columns);
    fn children(&self, parent: Option<RowHandle>) -> Vec<RowHandle>;
    fn parent_of(&self, row: RowHandle) -> Option<RowHandle>;
    /// Re-attaches `row` (with its subtree) under `new_parent`, keeping its handle.
    fn move_row(&mut self, row: RowHandle, new_parent: Option<RowHandle>);
}

/// Row-oriented display structure addressed by position.
#[cfg_attr(test, automock)]
pub trait TableModel {
    fn append_rows(&mut self, rows: Vec<Columns>);
    fn update_row(&mut self, index: usize, columns: Columns);
    fn remove_row(&mut self, index: usize);
    fn row_count(&self) -> usize;
}
