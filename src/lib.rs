pub mod commands;
pub mod config;
pub mod display;
pub mod process;
pub mod session;
pub mod sync;
pub mod tree;

pub mod testing;

// Re-export key types from modules for easier testing access
pub use display::{Columns, ModelEvent, RowHandle, TableModel, TableStore, TreeModel, TreeStore};
pub use process::{FileSource, Poller, ProcessRecord, SnapshotFilter, SnapshotSource, SysinfoSource};
pub use session::{Session, SessionReport};
pub use sync::{ReparentPolicy, SyncReport, TableSynchronizer, TreeSynchronizer};
pub use tree::{build_tree, FlatEntry, ProcessTree};
