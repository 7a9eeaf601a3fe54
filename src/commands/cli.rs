use crate::config::Settings;
use crate::display::render::{render_table, render_tree};
use crate::display::{ModelEvent, RowHandle};
use crate::process::{load_snapshot, Poller, ProcessRecord, SnapshotSource, SysinfoSource};
use crate::session::{Session, SessionReport};
use crate::tree::build_tree;
use anyhow::{anyhow, Result};
use log::info;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct CliHandler;

impl CliHandler {
    pub async fn show_tree(
        settings: &Settings,
        snapshot: Option<&Path>,
        search: Option<&str>,
    ) -> Result<()> {
        let mut records = Self::take_snapshot(snapshot)?;
        if let Some(query) = search {
            records = search_with_ancestors(&records, query);
            if records.is_empty() {
                println!("No processes matching '{query}'");
                return Ok(());
            }
        }

        let mut session = Session::from_settings(settings)?;
        let report = session.apply(records);
        println!("Process tree ({} processes):", report.processes);
        print!("{}", render_tree(session.tree()));
        Ok(())
    }

    pub async fn show_table(settings: &Settings, snapshot: Option<&Path>, limit: usize) -> Result<()> {
        let records = Self::take_snapshot(snapshot)?;
        let mut session = Session::from_settings(settings)?;
        let report = session.apply(records);

        if report.processes == 0 {
            println!("No processes found");
            return Ok(());
        }
        println!(
            "Processes (showing {} of {}):",
            limit.min(report.processes),
            report.processes
        );
        print!("{}", render_table(session.table(), limit));
        Ok(())
    }

    pub async fn watch(
        settings: &Settings,
        ticks: Option<u64>,
        interval: Option<Duration>,
        print: bool,
    ) -> Result<()> {
        let interval = interval.unwrap_or_else(|| settings.refresh_interval());
        let mut session = Session::from_settings(settings)?;
        let mut poller = Poller::spawn(SysinfoSource::new(), interval);
        info!("watching processes every {} ms", interval.as_millis());

        let mut seen = 0u64;
        loop {
            if ticks.is_some_and(|limit| seen >= limit) {
                break;
            }
            tokio::select! {
                snapshot = poller.recv() => {
                    let Some(snapshot) = snapshot else {
                        break;
                    };
                    seen += 1;
                    let report = session.apply(snapshot);
                    println!("{}", format_report(seen, &report));
                    if print {
                        print!("{}", render_tree(session.tree()));
                        if settings.show_table {
                            print!("{}", render_table(session.table(), usize::MAX));
                        }
                    }
                    session.tree_mut().drain_events();
                    session.table_mut().drain_events();
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupted, stopping poller");
                    break;
                }
            }
        }

        poller.stop();
        Ok(())
    }

    pub async fn replay(settings: &Settings, paths: &[PathBuf]) -> Result<()> {
        if paths.is_empty() {
            return Err(anyhow!("replay needs at least one snapshot file"));
        }
        let snapshots = paths
            .iter()
            .map(|path| load_snapshot(path))
            .collect::<Result<Vec<_>>>()?;

        let mut session = Session::from_settings(settings)?;
        for (step, snapshot) in snapshots.into_iter().enumerate() {
            let report = session.apply(snapshot);
            println!("{}", format_report(step as u64 + 1, &report));
            for event in session.tree_mut().drain_events() {
                println!("  tree  {}", format_event(&event));
            }
            for event in session.table_mut().drain_events() {
                println!("  table {}", format_event(&event));
            }
        }

        println!("Final tree:");
        print!("{}", render_tree(session.tree()));
        if settings.show_table {
            print!("{}", render_table(session.table(), usize::MAX));
        }
        Ok(())
    }

    fn take_snapshot(snapshot: Option<&Path>) -> Result<Vec<ProcessRecord>> {
        match snapshot {
            Some(path) => load_snapshot(path),
            None => Ok(SysinfoSource::new().snapshot()),
        }
    }
}

pub fn format_report(step: u64, report: &SessionReport) -> String {
    format!(
        "poll {step}: {} processes | tree {} | table {}",
        report.processes, report.tree, report.table
    )
}

pub fn format_event(event: &ModelEvent) -> String {
    match event {
        ModelEvent::RowsInserted { parent, first, last } => {
            format!("insert {first}..={last} under {}", format_parent(*parent))
        }
        ModelEvent::RowsRemoved { parent, first, last } => {
            format!("remove {first}..={last} under {}", format_parent(*parent))
        }
        ModelEvent::DataChanged {
            parent,
            row,
            first_col,
            last_col,
        } => format!(
            "change row {row} cols {first_col}..={last_col} under {}",
            format_parent(*parent)
        ),
        ModelEvent::RowMoved { row, from, to } => format!(
            "move #{} from {} to {}",
            row.0,
            format_parent(*from),
            format_parent(*to)
        ),
    }
}

fn format_parent(parent: Option<RowHandle>) -> String {
    match parent {
        Some(handle) => format!("#{}", handle.0),
        None => "root".to_string(),
    }
}

/// Keeps matching processes together with every ancestor, so the tree
/// still shows where each match lives.
pub fn search_with_ancestors(records: &[ProcessRecord], query: &str) -> Vec<ProcessRecord> {
    let tree = build_tree(records);
    let mut keep = HashSet::new();

    for record in records.iter().filter(|record| record.matches_search(query)) {
        let mut current = tree.find(record.pid);
        while let Some(id) = current {
            let Some(node) = tree.node(id) else {
                break;
            };
            if node.record.pid == 0 || !keep.insert(node.record.pid) {
                break;
            }
            current = node.parent;
        }
    }

    records
        .iter()
        .filter(|record| keep.contains(&record.pid))
        .cloned()
        .collect()
}
