use super::{Column, Columns, ModelEvent, RowHandle, TreeModel};
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct StoreNode {
    parent: Option<RowHandle>,
    children: Vec<RowHandle>,
    columns: Columns,
}

/// In-memory [`TreeModel`] that records every change notification.
#[derive(Debug, Default)]
pub struct TreeStore {
    nodes: HashMap<RowHandle, StoreNode>,
    top_level: Vec<RowHandle>,
    next_handle: u64,
    events: Vec<ModelEvent>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, row: RowHandle) -> bool {
        self.nodes.contains_key(&row)
    }

    pub fn columns(&self, row: RowHandle) -> Option<&Columns> {
        self.nodes.get(&row).map(|node| &node.columns)
    }

    /// Number of ancestors between `row` and the display root.
    pub fn depth(&self, row: RowHandle) -> usize {
        let mut depth = 0;
        let mut current = self.parent_of(row);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent_of(parent);
        }
        depth
    }

    pub fn events(&self) -> &[ModelEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ModelEvent> {
        std::mem::take(&mut self.events)
    }

    fn siblings(&self, parent: Option<RowHandle>) -> Option<&Vec<RowHandle>> {
        match parent {
            None => Some(&self.top_level),
            Some(handle) => self.nodes.get(&handle).map(|node| &node.children),
        }
    }

    fn siblings_mut(&mut self, parent: Option<RowHandle>) -> Option<&mut Vec<RowHandle>> {
        match parent {
            None => Some(&mut self.top_level),
            Some(handle) => self.nodes.get_mut(&handle).map(|node| &mut node.children),
        }
    }

    fn position(&self, row: RowHandle) -> Option<(Option<RowHandle>, usize)> {
        let parent = self.nodes.get(&row)?.parent;
        let index = self.siblings(parent)?.iter().position(|&h| h == row)?;
        Some((parent, index))
    }

    /// Appends `row` under `parent`, or at the top level when `parent` is unknown.
    fn attach(&mut self, parent: Option<RowHandle>, row: RowHandle) -> (Option<RowHandle>, usize) {
        match parent.and_then(|handle| self.nodes.get_mut(&handle).map(|node| (handle, node))) {
            Some((handle, node)) => {
                node.children.push(row);
                (Some(handle), node.children.len() - 1)
            }
            None => {
                self.top_level.push(row);
                (None, self.top_level.len() - 1)
            }
        }
    }

    fn is_ancestor(&self, ancestor: RowHandle, row: RowHandle) -> bool {
        let mut current = Some(row);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.parent_of(handle);
        }
        false
    }
}

impl TreeModel for TreeStore {
    fn insert_row(&mut self, parent: Option<RowHandle>, columns: Columns) -> RowHandle {
        self.next_handle += 1;
        let handle = RowHandle(self.next_handle);
        let (parent, index) = self.attach(parent, handle);
        self.nodes.insert(
            handle,
            StoreNode {
                parent,
                children: Vec::new(),
                columns,
            },
        );
        self.events.push(ModelEvent::RowsInserted {
            parent,
            first: index,
            last: index,
        });
        handle
    }

    fn remove_row(&mut self, row: RowHandle) {
        let Some((parent, index)) = self.position(row) else {
            debug!("remove_row: unknown row {row:?}");
            return;
        };
        if let Some(siblings) = self.siblings_mut(parent) {
            siblings.remove(index);
        }

        let mut stack = vec![row];
        while let Some(handle) = stack.pop() {
            if let Some(node) = self.nodes.remove(&handle) {
                stack.extend(node.children);
            }
        }

        self.events.push(ModelEvent::RowsRemoved {
            parent,
            first: index,
            last: index,
        });
    }

    fn update_columns(&mut self, row: RowHandle, columns: Columns) {
        let Some((parent, index)) = self.position(row) else {
            debug!("update_columns: unknown row {row:?}");
            return;
        };
        let Some(node) = self.nodes.get_mut(&row) else {
            return;
        };

        let changed: Vec<usize> = Column::ALL
            .iter()
            .enumerate()
            .filter(|(_, &column)| node.columns.get(column) != columns.get(column))
            .map(|(i, _)| i)
            .collect();
        node.columns = columns;

        if let (Some(&first_col), Some(&last_col)) = (changed.first(), changed.last()) {
            self.events.push(ModelEvent::DataChanged {
                parent,
                row: index,
                first_col,
                last_col,
            });
        }
    }

    fn children(&self, parent: Option<RowHandle>) -> Vec<RowHandle> {
        self.siblings(parent).cloned().unwrap_or_default()
    }

    fn parent_of(&self, row: RowHandle) -> Option<RowHandle> {
        self.nodes.get(&row).and_then(|node| node.parent)
    }

    fn move_row(&mut self, row: RowHandle, new_parent: Option<RowHandle>) {
        let Some((old_parent, index)) = self.position(row) else {
            debug!("move_row: unknown row {row:?}");
            return;
        };
        if old_parent == new_parent {
            return;
        }
        if let Some(target) = new_parent {
            if !self.nodes.contains_key(&target) || self.is_ancestor(row, target) {
                debug!("move_row: refusing to move {row:?} under {target:?}");
                return;
            }
        }

        if let Some(siblings) = self.siblings_mut(old_parent) {
            siblings.remove(index);
        }
        let (new_parent, _) = self.attach(new_parent, row);
        if let Some(node) = self.nodes.get_mut(&row) {
            node.parent = new_parent;
        }

        self.events.push(ModelEvent::RowMoved {
            row,
            from: old_parent,
            to: new_parent,
        });
    }
}
