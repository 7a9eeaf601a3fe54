use crate::process::ProcessRecord;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::collections::HashMap;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use sysinfo::System;

/// Produces complete process snapshots, one per call.
pub trait SnapshotSource {
    fn snapshot(&mut self) -> Vec<ProcessRecord>;
}

/// Live snapshots from the operating system.
pub struct SysinfoSource {
    system: System,
}

impl SysinfoSource {
    pub fn new() -> Self {
        let mut system = System::new_all();
        system.refresh_all();
        Self { system }
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSource for SysinfoSource {
    fn snapshot(&mut self) -> Vec<ProcessRecord> {
        self.system.refresh_processes();
        let mut records: Vec<ProcessRecord> = self
            .system
            .processes()
            .iter()
            .map(|(&pid, process)| ProcessRecord::from_sysinfo(pid, process))
            .collect();
        records.sort_by_key(|record| record.pid);
        records
    }
}

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    process: Vec<ProcessRecord>,
}

/// Parses a TOML snapshot made of `[[process]]` tables.
pub fn parse_snapshot(text: &str) -> Result<Vec<ProcessRecord>> {
    let file: SnapshotFile = toml::from_str(text)?;
    Ok(file.process)
}

pub fn load_snapshot(path: &Path) -> Result<Vec<ProcessRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read snapshot {}", path.display()))?;
    parse_snapshot(&text).with_context(|| format!("Invalid snapshot {}", path.display()))
}

/// Replays snapshot files in order, starting over after the last one.
pub struct FileSource {
    snapshots: Vec<Vec<ProcessRecord>>,
    next: usize,
}

impl FileSource {
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let snapshots = paths
            .iter()
            .map(|path| load_snapshot(path.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_snapshots(snapshots))
    }

    pub fn from_snapshots(snapshots: Vec<Vec<ProcessRecord>>) -> Self {
        Self { snapshots, next: 0 }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl SnapshotSource for FileSource {
    fn snapshot(&mut self) -> Vec<ProcessRecord> {
        if self.snapshots.is_empty() {
            return Vec::new();
        }
        let snapshot = self.snapshots[self.next].clone();
        self.next = (self.next + 1) % self.snapshots.len();
        snapshot
    }
}

/// Drops processes whose name matches any exclude pattern.
#[derive(Debug, Default, Clone)]
pub struct SnapshotFilter {
    exclude: Vec<Regex>,
}

impl SnapshotFilter {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let exclude = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).with_context(|| format!("Invalid exclude pattern '{pattern}'"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { exclude })
    }

    pub fn is_empty(&self) -> bool {
        self.exclude.is_empty()
    }

    pub fn apply(&self, records: Vec<ProcessRecord>) -> Vec<ProcessRecord> {
        if self.exclude.is_empty() {
            return records;
        }
        let before = records.len();
        let kept: Vec<ProcessRecord> = records
            .into_iter()
            .filter(|record| !self.exclude.iter().any(|re| re.is_match(&record.name)))
            .collect();
        debug!("exclude filter dropped {} processes", before - kept.len());
        kept
    }
}

/// Collapses repeated pids: each keeps its first position and its last record.
pub fn dedup_pids(records: Vec<ProcessRecord>) -> Vec<ProcessRecord> {
    let mut index: HashMap<u32, usize> = HashMap::with_capacity(records.len());
    let mut unique: Vec<ProcessRecord> = Vec::with_capacity(records.len());
    for record in records {
        match index.get(&record.pid) {
            Some(&at) => {
                warn!("duplicate pid {} in snapshot, keeping the last record", record.pid);
                unique[at] = record;
            }
            None => {
                index.insert(record.pid, unique.len());
                unique.push(record);
            }
        }
    }
    unique
}
