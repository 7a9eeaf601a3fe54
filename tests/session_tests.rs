use proctree_sync::testing::*;
use proctree_sync::{FileSource, Poller, ReparentPolicy, Session, SnapshotFilter, TreeModel};
use std::time::Duration;

#[tokio::test]
async fn test_poller_feeds_session_in_order() {
    let source = FileSource::from_snapshots(vec![init_with_child(), init_with_sibling()]);
    let mut poller = Poller::spawn(source, Duration::from_millis(5));
    let mut session = Session::default();

    let first = poller.recv().await.unwrap();
    session.apply(first);
    let init_row = session.tree_sync().row_for(1).unwrap();

    let second = poller.recv().await.unwrap();
    let report = session.apply(second);
    poller.stop();

    assert_eq!(report.tree.inserted, 1);
    assert_eq!(report.tree.removed, 1);
    assert_eq!(session.tree_sync().row_for(1), Some(init_row));
    assert_eq!(session.tree_sync().live_pids(), vec![1, 3]);
    assert_eq!(session.table_sync().len(), 2);
}

#[tokio::test]
async fn test_scripted_source_drains_to_empty_views() {
    let source = ScriptedSource::new(vec![create_realistic_snapshot()]);
    let mut poller = Poller::spawn(source, Duration::from_millis(5));
    let mut session = Session::new(ReparentPolicy::Move, SnapshotFilter::default());

    let report = session.apply(poller.recv().await.unwrap());
    assert_eq!(report.processes, 12);

    let report = session.apply(poller.recv().await.unwrap());
    assert_eq!(report.tree.removed, 12);
    assert_eq!(report.table.removed, 12);
    assert!(session.tree().is_empty());
    assert!(session.table().rows().is_empty());
}

#[tokio::test]
async fn test_stopped_poller_closes_channel() {
    let mut poller = Poller::spawn(ScriptedSource::default(), Duration::from_millis(5));
    assert!(poller.recv().await.is_some());
    poller.stop();

    let drained = tokio::time::timeout(Duration::from_secs(1), async {
        while poller.recv().await.is_some() {}
    })
    .await;
    assert!(drained.is_ok());
}

#[test]
fn test_exclude_filter_hides_matches_everywhere() {
    let filter = SnapshotFilter::new(&["^chrome".to_string()]).unwrap();
    let mut session = Session::new(ReparentPolicy::Move, filter);
    let report = session.apply(create_realistic_snapshot());

    assert_eq!(report.processes, 9);
    assert!(session.tree_sync().row_for(2400).is_none());
    assert!(session.table_sync().position(2410).is_none());
    let explorer = session.tree_sync().row_for(2000).unwrap();
    assert_eq!(session.tree().children(Some(explorer)).len(), 1);
}
