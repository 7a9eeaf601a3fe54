use assert_cmd::Command;
use predicates::prelude::*;
use proctree_sync::testing::{init_with_child, init_with_sibling, snapshot_toml};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A scratch directory holding an empty settings file path and snapshots.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Workspace {
            dir: TempDir::new().unwrap(),
        }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("proctree").unwrap();
        cmd.arg("--config").arg(self.dir.path().join("settings.toml"));
        cmd
    }
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("proctree").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Live process tree"))
        .stdout(predicate::str::contains("Usage: proctree"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("tree"))
        .stdout(predicate::str::contains("table"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("replay"))
        .stdout(predicate::str::contains("--reparent"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("proctree").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("proctree"));
}

#[test]
fn test_tree_from_snapshot() {
    let ws = Workspace::new();
    let snapshot = ws.write("a.toml", &snapshot_toml(&init_with_child()));

    let output = ws.command().arg("tree").arg("--snapshot").arg(&snapshot).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    insta::assert_snapshot!(stdout, @r###"
    Process tree (2 processes):
    init [1] 0.00% 0KB
    └── child [2] 0.00% 0KB
    "###);
}

#[test]
fn test_tree_search_keeps_ancestors() {
    let ws = Workspace::new();
    let snapshot = ws.write("a.toml", &snapshot_toml(&init_with_child()));

    ws.command()
        .args(["tree", "--search", "child", "--snapshot"])
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("init [1]"))
        .stdout(predicate::str::contains("└── child [2]"));
}

#[test]
fn test_tree_search_without_match() {
    let ws = Workspace::new();
    let snapshot = ws.write("a.toml", &snapshot_toml(&init_with_child()));

    ws.command()
        .args(["tree", "--search", "nginx", "--snapshot"])
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("No processes matching 'nginx'"));
}

#[test]
fn test_table_from_snapshot() {
    let ws = Workspace::new();
    let snapshot = ws.write("a.toml", &snapshot_toml(&init_with_child()));

    ws.command()
        .args(["table", "--limit", "1", "--snapshot"])
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processes (showing 1 of 2):"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("child").not());
}

#[test]
fn test_replay_reports_each_pass() {
    let ws = Workspace::new();
    let first = ws.write("a.toml", &snapshot_toml(&init_with_child()));
    let second = ws.write("b.toml", &snapshot_toml(&init_with_sibling()));

    ws.command()
        .arg("replay")
        .arg(&first)
        .arg(&second)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "poll 1: 2 processes | tree +2 ~0 >0 -0 | table +2 ~0 >0 -0",
        ))
        .stdout(predicate::str::contains(
            "poll 2: 2 processes | tree +1 ~0 >0 -1 | table +1 ~0 >0 -1",
        ))
        .stdout(predicate::str::contains("└── sibling [3]"));
}

#[test]
fn test_replay_requires_snapshots() {
    let ws = Workspace::new();
    ws.command().arg("replay").assert().failure();
}

#[test]
fn test_invalid_snapshot_fails() {
    let ws = Workspace::new();
    let snapshot = ws.write("bad.toml", "[[process]]\npid = \"one\"\n");

    ws.command()
        .arg("tree")
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid snapshot"));
}

#[test]
fn test_invalid_settings_fail() {
    let ws = Workspace::new();
    ws.write("settings.toml", "exclude = [\"(unclosed\"]\n");
    let snapshot = ws.write("a.toml", &snapshot_toml(&init_with_child()));

    ws.command()
        .arg("tree")
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid exclude pattern"));
}

#[test]
fn test_watch_stops_after_ticks() {
    let ws = Workspace::new();
    ws.command()
        .args(["watch", "--ticks", "2", "--interval", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("poll 1:"))
        .stdout(predicate::str::contains("poll 2:"))
        .stdout(predicate::str::contains("poll 3:").not());
}
