use crate::process::ProcessRecord;
use log::{debug, warn};
use std::collections::HashMap;

/// Index of a node inside its [`ProcessTree`] arena.
pub type NodeId = usize;

/// The synthetic root always lives at index 0.
pub const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub record: ProcessRecord,
    /// Non-owning link back to the parent; `None` only for the root.
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// One poll's process hierarchy. Built from scratch every snapshot and
/// discarded once flattened.
#[derive(Debug, Clone)]
pub struct ProcessTree {
    nodes: Vec<TreeNode>,
    by_pid: HashMap<u32, NodeId>,
}

impl ProcessTree {
    fn with_root() -> Self {
        Self {
            nodes: vec![TreeNode {
                record: ProcessRecord::default(),
                parent: None,
                children: Vec::new(),
            }],
            by_pid: HashMap::new(),
        }
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[ROOT]
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn find(&self, pid: u32) -> Option<NodeId> {
        self.by_pid.get(&pid).copied()
    }

    /// Number of process nodes, excluding the synthetic root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.node(id).and_then(|node| node.parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent].parent;
        }
        depth
    }

    /// Pid of the node's parent, 0 when the parent is the synthetic root.
    pub fn parent_pid(&self, id: NodeId) -> u32 {
        match self.node(id).and_then(|node| node.parent) {
            Some(ROOT) | None => 0,
            Some(parent) => self.nodes[parent].record.pid,
        }
    }

    fn attach(&mut self, child: NodeId, parent: NodeId) {
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child].parent.take() {
            self.nodes[parent].children.retain(|&id| id != child);
        }
    }

    /// Marks every node reachable from the root.
    fn reachable(&self) -> Vec<bool> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            if !seen[id] {
                seen[id] = true;
                stack.extend(self.nodes[id].children.iter().copied());
            }
        }
        seen
    }

    /// Re-roots parent cycles. A cycle never reaches the synthetic root, so
    /// its members would otherwise vanish from the flattening.
    fn break_cycles(&mut self) {
        let mut seen = self.reachable();
        for start in 1..self.nodes.len() {
            if seen[start] {
                continue;
            }

            // Walk up until a node repeats; that node sits on the cycle.
            let mut on_path = vec![false; self.nodes.len()];
            let mut current = start;
            while !on_path[current] {
                on_path[current] = true;
                match self.nodes[current].parent {
                    Some(parent) if !seen[parent] => current = parent,
                    _ => break,
                }
            }

            warn!(
                "parent cycle through pid {} (parent {}), attaching it to the root",
                self.nodes[current].record.pid, self.nodes[current].record.parent_pid
            );
            self.detach(current);
            self.attach(current, ROOT);

            let mut stack = vec![current];
            while let Some(id) = stack.pop() {
                if !seen[id] {
                    seen[id] = true;
                    stack.extend(self.nodes[id].children.iter().copied());
                }
            }
        }
    }
}

/// Builds the hierarchy for one snapshot.
///
/// Records with pid 0 are skipped. A record whose parent is 0 or absent from
/// the snapshot hangs off the synthetic root. Duplicate pids keep the last
/// record seen.
pub fn build_tree(records: &[ProcessRecord]) -> ProcessTree {
    let mut tree = ProcessTree::with_root();

    for record in records {
        if record.pid == 0 {
            debug!("skipping record with reserved pid 0 ({})", record.name);
            continue;
        }
        match tree.by_pid.get(&record.pid) {
            Some(&id) => {
                warn!("duplicate pid {} in snapshot, keeping the last record", record.pid);
                tree.nodes[id].record = record.clone();
            }
            None => {
                tree.by_pid.insert(record.pid, tree.nodes.len());
                tree.nodes.push(TreeNode {
                    record: record.clone(),
                    parent: None,
                    children: Vec::new(),
                });
            }
        }
    }

    for id in 1..tree.nodes.len() {
        let record = &tree.nodes[id].record;
        let parent = match tree.by_pid.get(&record.parent_pid) {
            Some(&parent) if parent != id => parent,
            _ => ROOT,
        };
        tree.attach(id, parent);
    }

    tree.break_cycles();
    tree
}
