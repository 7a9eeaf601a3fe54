use crate::process::ProcessRecord;

const MB: u64 = 1024 * 1024;

/// Create test fixture for ProcessRecord
pub fn create_test_record(pid: u32, parent_pid: u32, name: &str, cpu: f32, memory: u64) -> ProcessRecord {
    ProcessRecord {
        pid,
        parent_pid,
        name: name.to_string(),
        cpu_usage: cpu,
        memory,
        disk_read_bytes: 0,
        disk_write_bytes: 0,
        gpu_usage: 0,
        status: "Running".to_string(),
    }
}

/// A desktop-like snapshot: boot chain, services, a browser with helpers
/// and one orphan whose parent already exited.
pub fn create_realistic_snapshot() -> Vec<ProcessRecord> {
    vec![
        create_test_record(4, 0, "System", 0.1, 4 * MB),
        create_test_record(120, 4, "smss.exe", 0.0, MB),
        create_test_record(480, 120, "wininit.exe", 0.0, 6 * MB),
        create_test_record(620, 480, "services.exe", 0.2, 9 * MB),
        create_test_record(900, 620, "svchost.exe", 1.5, 40 * MB),
        create_test_record(904, 620, "svchost.exe", 0.3, 18 * MB),
        create_test_record(2000, 1800, "explorer.exe", 2.4, 120 * MB),
        create_test_record(2400, 2000, "chrome.exe", 12.0, 600 * MB),
        create_test_record(2410, 2400, "chrome.exe", 4.2, 210 * MB),
        create_test_record(2420, 2400, "chrome.exe", 0.8, 95 * MB),
        create_test_record(3100, 2000, "code.exe", 6.1, 450 * MB),
        create_test_record(3150, 3100, "rust-analyzer.exe", 22.5, 900 * MB),
    ]
}

/// Two-process chain: init with one child.
pub fn init_with_child() -> Vec<ProcessRecord> {
    vec![ProcessRecord::new(1, 0, "init"), ProcessRecord::new(2, 1, "child")]
}

/// The chain after the child exited and a sibling replaced it.
pub fn init_with_sibling() -> Vec<ProcessRecord> {
    vec![ProcessRecord::new(1, 0, "init"), ProcessRecord::new(3, 1, "sibling")]
}

/// `depth` processes each parented on the previous one, rooted at pid 1.
pub fn create_chain(depth: u32) -> Vec<ProcessRecord> {
    (1..=depth)
        .map(|pid| create_test_record(pid, pid - 1, &format!("proc_{pid}"), 0.0, MB))
        .collect()
}

/// `count` processes fanned out under a handful of parents, for benchmarks.
pub fn create_wide_snapshot(count: u32) -> Vec<ProcessRecord> {
    (1..=count)
        .map(|pid| {
            let parent = if pid <= 8 { 0 } else { pid % 8 + 1 };
            create_test_record(pid, parent, &format!("worker_{pid}"), (pid % 100) as f32, pid as u64 * MB)
        })
        .collect()
}

/// Same pids as `records`, with every cpu reading shifted.
pub fn with_cpu_shift(records: &[ProcessRecord], delta: f32) -> Vec<ProcessRecord> {
    records
        .iter()
        .cloned()
        .map(|mut record| {
            record.cpu_usage += delta;
            record
        })
        .collect()
}

/// Renders records in the `[[process]]` snapshot file format.
pub fn snapshot_toml(records: &[ProcessRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "[[process]]\npid = {}\nparent_pid = {}\nname = \"{}\"\ncpu_usage = {:?}\nmemory = {}\nstatus = \"{}\"\n\n",
            record.pid, record.parent_pid, record.name, record.cpu_usage, record.memory, record.status
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::parse_snapshot;

    #[test]
    fn test_snapshot_toml_parses_back() {
        let records = create_realistic_snapshot();
        let parsed = parse_snapshot(&snapshot_toml(&records)).unwrap();
        assert_eq!(parsed.len(), records.len());
        assert_eq!(parsed[6].parent_pid, 1800);
        assert_eq!(parsed[11].name, "rust-analyzer.exe");
    }

    #[test]
    fn test_wide_snapshot_parents_exist() {
        let records = create_wide_snapshot(100);
        for record in records.iter().filter(|r| r.parent_pid != 0) {
            assert!(records.iter().any(|r| r.pid == record.parent_pid));
        }
    }
}
