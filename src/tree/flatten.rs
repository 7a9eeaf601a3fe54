use super::builder::ProcessTree;
use crate::process::ProcessRecord;
use std::collections::VecDeque;

/// A record paired with the pid of the node it hangs under in the built tree.
///
/// `parent_pid` is the resolved parent: 0 whenever the node sits at the root,
/// even if the record itself declared some other (absent) parent.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry {
    pub record: ProcessRecord,
    pub parent_pid: u32,
}

impl FlatEntry {
    pub fn pid(&self) -> u32 {
        self.record.pid
    }
}

impl ProcessTree {
    /// Breadth-first linearization, starting at the root's children.
    pub fn flatten(&self) -> Vec<FlatEntry> {
        let mut entries = Vec::with_capacity(self.len());
        let mut queue: VecDeque<_> = self.root().children.iter().copied().collect();

        while let Some(id) = queue.pop_front() {
            let Some(node) = self.node(id) else {
                continue;
            };
            entries.push(FlatEntry {
                record: node.record.clone(),
                parent_pid: self.parent_pid(id),
            });
            queue.extend(node.children.iter().copied());
        }

        entries
    }
}
