//! Property-based tests for the hierarchy builder and the synchronizers
//!
//! Snapshots are generated as pid -> parent maps so pids stay unique while
//! parents may be missing, self-referencing or cyclic.

#[cfg(test)]
use proptest::prelude::*;

#[cfg(test)]
use std::collections::BTreeMap;

#[cfg(test)]
fn arb_snapshot() -> impl Strategy<Value = BTreeMap<u32, u32>> {
    prop::collection::btree_map(1u32..60, 0u32..70, 0..40)
}

#[cfg(test)]
fn to_records(snapshot: &BTreeMap<u32, u32>, cpu: f32) -> Vec<crate::process::ProcessRecord> {
    snapshot
        .iter()
        .map(|(&pid, &parent)| crate::testing::create_test_record(pid, parent, &format!("p{pid}"), cpu, 1024))
        .collect()
}

#[cfg(test)]
mod builder_properties {
    use super::*;
    use crate::tree::build_tree;
    use std::collections::HashSet;

    proptest! {
        #[test]
        fn test_every_pid_flattened_once(snapshot in arb_snapshot()) {
            let entries = build_tree(&to_records(&snapshot, 1.0)).flatten();

            let mut pids: Vec<u32> = entries.iter().map(|e| e.pid()).collect();
            pids.sort_unstable();
            let expected: Vec<u32> = snapshot.keys().copied().collect();
            prop_assert_eq!(pids, expected);
        }

        #[test]
        fn test_unresolvable_parents_attach_to_root(snapshot in arb_snapshot()) {
            let entries = build_tree(&to_records(&snapshot, 1.0)).flatten();

            for entry in &entries {
                let declared = snapshot[&entry.pid()];
                if declared == 0 || declared == entry.pid() || !snapshot.contains_key(&declared) {
                    prop_assert_eq!(entry.parent_pid, 0);
                } else if entry.parent_pid != 0 {
                    // Only cycle breaking detaches a resolvable parent
                    prop_assert_eq!(entry.parent_pid, declared);
                }
            }
        }

        #[test]
        fn test_parents_precede_children(snapshot in arb_snapshot()) {
            let entries = build_tree(&to_records(&snapshot, 1.0)).flatten();

            let mut seen = HashSet::new();
            for entry in &entries {
                prop_assert!(entry.parent_pid == 0 || seen.contains(&entry.parent_pid));
                seen.insert(entry.pid());
            }
        }
    }
}

#[cfg(test)]
mod sync_properties {
    use super::*;
    use crate::display::TreeModel;
    use crate::sync::{ReparentPolicy, TableSynchronizer, TreeSynchronizer};
    use crate::testing::{ModelCall, RecordingTableModel, RecordingTreeModel};
    use crate::tree::build_tree;

    proptest! {
        #[test]
        fn test_surviving_rows_keep_handles(first in arb_snapshot(), second in arb_snapshot()) {
            let mut model = RecordingTreeModel::new();
            let mut sync = TreeSynchronizer::new(ReparentPolicy::Move);

            sync.sync(&build_tree(&to_records(&first, 1.0)).flatten(), &mut model);
            let before: BTreeMap<u32, _> = first
                .keys()
                .filter_map(|&pid| sync.row_for(pid).map(|row| (pid, row)))
                .collect();

            sync.sync(&build_tree(&to_records(&second, 2.0)).flatten(), &mut model);
            for (pid, row) in before {
                if second.contains_key(&pid) {
                    prop_assert_eq!(sync.row_for(pid), Some(row));
                }
            }
            prop_assert_eq!(sync.live_pids(), second.keys().copied().collect::<Vec<_>>());
        }

        #[test]
        fn test_model_mirrors_flat_parents(first in arb_snapshot(), second in arb_snapshot()) {
            let mut model = RecordingTreeModel::new();
            let mut sync = TreeSynchronizer::new(ReparentPolicy::Move);
            sync.sync(&build_tree(&to_records(&first, 1.0)).flatten(), &mut model);

            let entries = build_tree(&to_records(&second, 1.0)).flatten();
            sync.sync(&entries, &mut model);

            prop_assert_eq!(model.store.len(), entries.len());
            for entry in &entries {
                let row = sync.row_for(entry.pid());
                prop_assert!(row.is_some());
                let expected = if entry.parent_pid == 0 { None } else { sync.row_for(entry.parent_pid) };
                prop_assert_eq!(row.and_then(|row| model.parent_of(row)), expected);
            }
        }

        #[test]
        fn test_identical_snapshot_is_noop(snapshot in arb_snapshot(), keep in any::<bool>()) {
            let policy = if keep { ReparentPolicy::Keep } else { ReparentPolicy::Move };
            let mut model = RecordingTreeModel::new();
            let mut sync = TreeSynchronizer::new(policy);
            let entries = build_tree(&to_records(&snapshot, 3.5)).flatten();

            sync.sync(&entries, &mut model);
            model.take_calls();

            let report = sync.sync(&entries, &mut model);
            prop_assert!(report.is_noop());
            prop_assert_eq!(model.inserts(), 0);
            prop_assert_eq!(model.removes(), 0);
            prop_assert_eq!(model.content_updates(), 0);
        }

        #[test]
        fn test_removals_run_deepest_first(first in arb_snapshot(), second in arb_snapshot()) {
            let mut model = RecordingTreeModel::new();
            let mut sync = TreeSynchronizer::new(ReparentPolicy::Keep);
            sync.sync(&build_tree(&to_records(&first, 1.0)).flatten(), &mut model);
            model.take_calls();

            sync.sync(&build_tree(&to_records(&second, 1.0)).flatten(), &mut model);
            for call in model.take_calls() {
                if let ModelCall::Remove { children, .. } = call {
                    // Nothing may still hang below a row when it goes
                    prop_assert_eq!(children, 0);
                }
            }
        }

        #[test]
        fn test_table_matches_snapshot(first in arb_snapshot(), second in arb_snapshot()) {
            let mut model = RecordingTableModel::new();
            let mut sync = TableSynchronizer::new();
            sync.sync(&to_records(&first, 1.0), &mut model);

            let records = to_records(&second, 2.0);
            sync.sync(&records, &mut model);

            let mut shown: Vec<String> = model.store.rows().iter().map(|row| row.pid.clone()).collect();
            shown.sort();
            let mut expected: Vec<String> = records.iter().map(|r| r.pid.to_string()).collect();
            expected.sort();
            prop_assert_eq!(shown, expected);
        }
    }
}
