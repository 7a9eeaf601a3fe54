use crate::display::Columns;
use serde::{Deserialize, Serialize};
use sysinfo::{Pid, Process};

/// One observation of a process, taken from a single snapshot.
///
/// `pid` 0 is reserved and never valid. `parent_pid` 0 means the process
/// has no known parent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessRecord {
    pub pid: u32,
    pub parent_pid: u32,
    pub name: String,
    pub cpu_usage: f32,
    pub memory: u64,
    pub disk_read_bytes: u64,
    pub disk_write_bytes: u64,
    pub gpu_usage: u32,
    pub status: String,
}

impl ProcessRecord {
    pub fn new(pid: u32, parent_pid: u32, name: &str) -> Self {
        Self {
            pid,
            parent_pid,
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn from_sysinfo(pid: Pid, process: &Process) -> Self {
        let disk = process.disk_usage();
        Self {
            pid: pid.as_u32(),
            parent_pid: process.parent().map(|p| p.as_u32()).unwrap_or(0),
            name: process.name().to_string(),
            cpu_usage: process.cpu_usage(),
            memory: process.memory(),
            disk_read_bytes: disk.read_bytes,
            disk_write_bytes: disk.written_bytes,
            // sysinfo does not expose per-process GPU counters
            gpu_usage: 0,
            status: format!("{:?}", process.status()),
        }
    }

    /// Whether the fields that change poll to poll are equal.
    pub fn volatile_eq(&self, other: &ProcessRecord) -> bool {
        self.name == other.name
            && self.cpu_usage == other.cpu_usage
            && self.memory == other.memory
            && self.disk_read_bytes == other.disk_read_bytes
            && self.disk_write_bytes == other.disk_write_bytes
            && self.gpu_usage == other.gpu_usage
            && self.status == other.status
    }

    pub fn columns(&self) -> Columns {
        Columns {
            name: self.name.clone(),
            pid: self.pid.to_string(),
            cpu: format!("{:.2}%", self.cpu_usage),
            memory: self.format_memory(),
            disk_read: format_bytes(self.disk_read_bytes),
            disk_write: format_bytes(self.disk_write_bytes),
            gpu: format!("{}%", self.gpu_usage),
            status: self.status.clone(),
        }
    }

    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();

        if let Some(pid_query) = query.strip_prefix('#') {
            // PID search: #1234
            if let Ok(search_pid) = pid_query.parse::<u32>() {
                return self.pid == search_pid;
            }
        } else if let Some(resource_query) = query.strip_prefix('>') {
            // Resource usage search: >50% for CPU, >1gb / >300mb for memory
            if let Some(cpu_query) = resource_query.strip_suffix('%') {
                if let Ok(cpu_threshold) = cpu_query.parse::<f32>() {
                    return self.cpu_usage > cpu_threshold;
                }
            } else if let Some(mem_query) = resource_query.strip_suffix("gb") {
                if let Ok(mem_threshold) = mem_query.parse::<f32>() {
                    let mem_gb = self.memory as f32 / 1024.0 / 1024.0 / 1024.0;
                    return mem_gb > mem_threshold;
                }
            } else if let Some(mem_query) = resource_query.strip_suffix("mb") {
                if let Ok(mem_threshold) = mem_query.parse::<f32>() {
                    let mem_mb = self.memory as f32 / 1024.0 / 1024.0;
                    return mem_mb > mem_threshold;
                }
            }
        }

        self.name.to_lowercase().contains(&query)
    }

    pub fn format_memory(&self) -> String {
        format_bytes(self.memory)
    }
}

pub fn format_bytes(bytes: u64) -> String {
    let kb = bytes / 1024;
    let mb = kb / 1024;
    let gb = mb / 1024;

    if gb > 0 {
        format!("{:.1}GB", mb as f64 / 1024.0)
    } else if mb > 0 {
        format!("{mb}MB")
    } else {
        format!("{kb}KB")
    }
}
