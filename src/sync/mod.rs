pub mod table;
pub mod tree;

pub use table::*;
pub use tree::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a tree synchronizer does with a surviving process whose parent changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReparentPolicy {
    /// Move the row (and its subtree) under the new parent, keeping its handle.
    #[default]
    Move,
    /// Leave the row under the parent it was first placed under.
    Keep,
}

/// Counts of the model operations one sync pass performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub inserted: usize,
    pub updated: usize,
    pub moved: usize,
    pub removed: usize,
    /// Inserted rows whose parent could not be resolved; subset of `inserted`.
    pub fallback: usize,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.updated == 0 && self.moved == 0 && self.removed == 0
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "+{} ~{} >{} -{}",
            self.inserted, self.updated, self.moved, self.removed
        )?;
        if self.fallback > 0 {
            write!(f, " ({} at root)", self.fallback)?;
        }
        Ok(())
    }
}
