//! CLI integration tests.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    fn db(&self) -> String {
        self.dir.path().join("storage.db").display().to_string()
    }

    /// `roverdb` isolated from the user's home and environment.
    fn roverdb(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("roverdb");
        cmd.env("HOME", self.dir.path())
            .env_remove("ROVERDB_DATABASE")
            .env_remove("RUST_LOG")
            .current_dir(self.dir.path())
            .args(["--db", &self.db()]);
        cmd
    }
}

#[test]
fn help_lists_command_groups() {
    cargo_bin_cmd!("roverdb")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("modules"))
        .stdout(predicate::str::contains("bans"))
        .stdout(predicate::str::contains("meta"));
}

#[test]
fn version_names_the_binary() {
    cargo_bin_cmd!("roverdb")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("roverdb"));
}

#[test]
fn init_writes_config_and_creates_tables() {
    let ws = Workspace::new();
    let config = ws.dir.path().join("conf").join("config.toml");

    ws.roverdb()
        .arg("--config")
        .arg(&config)
        .args(["--json", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"config_written\":true"))
        .stdout(predicate::str::contains("meta_stats"));

    let written = std::fs::read_to_string(&config).unwrap();
    assert!(written.contains("[database]"));
    assert!(written.contains("flush_threshold = 500"));
}

#[test]
fn init_does_not_persist_overrides() {
    let ws = Workspace::new();
    let config = ws.dir.path().join("config.toml");
    let from_env = ws.dir.path().join("env.db").display().to_string();

    ws.roverdb()
        .env("ROVERDB_DATABASE", &from_env)
        .arg("--config")
        .arg(&config)
        .arg("init")
        .assert()
        .success();

    let written = std::fs::read_to_string(&config).unwrap();
    assert!(written.contains("~/.roverdb/storage.db"));
    assert!(!written.contains(&ws.db()));
    assert!(!written.contains(&from_env));
    assert!(std::path::Path::new(&ws.db()).exists());
}

#[test]
fn registered_modules_are_listed() {
    let ws = Workspace::new();
    ws.roverdb()
        .args(["modules", "register", "LeafeatorBot"])
        .assert()
        .success();
    ws.roverdb()
        .args(["modules", "register", "LeafeatorBot"])
        .assert()
        .success();

    ws.roverdb()
        .args(["--json", "modules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"LeafeatorBot\""))
        .stdout(predicate::str::contains("\"id\":1"))
        .stdout(predicate::str::contains("\"id\":2").not());
}

#[test]
fn ban_lifecycle_through_the_cli() {
    let ws = Workspace::new();
    ws.roverdb()
        .args(["modules", "register", "LeafeatorBot"])
        .assert()
        .success();
    ws.roverdb()
        .args(["bans", "add", "user", "MioMoto", "--module", "LeafeatorBot"])
        .assert()
        .success();
    ws.roverdb()
        .args(["bans", "add", "subreddit", "dota2"])
        .assert()
        .success();

    ws.roverdb()
        .args(["bans", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MioMoto"))
        .stdout(predicate::str::contains("global"));

    ws.roverdb()
        .args(["--json", "bans", "remove", "user", "MioMoto"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"removed\":1"));

    ws.roverdb()
        .args(["--json", "bans", "list", "user"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"bans\":[]"));
}

#[test]
fn module_bans_need_a_registered_module() {
    let ws = Workspace::new();
    ws.roverdb()
        .args(["bans", "add", "user", "MioMoto", "--module", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("module 'ghost' is not registered"));
}

#[test]
fn purge_requires_confirmation() {
    let ws = Workspace::new();
    ws.roverdb()
        .args(["bans", "add", "user", "MioMoto"])
        .assert()
        .success();
    ws.roverdb()
        .args(["bans", "purge", "user"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
    ws.roverdb()
        .args(["--json", "bans", "purge", "user", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"removed\":1"));
}

#[test]
fn empty_meta_day_reports_zero() {
    let ws = Workspace::new();
    ws.roverdb()
        .args(["--json", "meta", "show", "--day", "2026-10-18"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"recorded\":false"))
        .stdout(predicate::str::contains("\"seen_comments\":0"))
        .stdout(predicate::str::contains("\"rate\":null"));
}

#[test]
fn cleanup_on_empty_database_removes_nothing() {
    let ws = Workspace::new();
    ws.roverdb()
        .args(["--json", "storage", "cleanup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"storage_removed\":0"))
        .stdout(predicate::str::contains("\"updates_removed\":0"));
}

#[test]
fn oversized_ages_are_rejected_without_panicking() {
    let ws = Workspace::new();
    ws.roverdb()
        .args(["stats", "karma", "--days", "4000000000"])
        .assert()
        .code(2);
    ws.roverdb()
        .args(["storage", "cleanup", "--older-than", "18446744073709551615"])
        .assert()
        .code(2);
}

#[test]
fn stats_summary_on_empty_database() {
    let ws = Workspace::new();
    ws.roverdb()
        .args(["--json", "stats", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"command\":\"stats.summary\""))
        .stdout(predicate::str::contains("\"modules\":[]"));
}

#[test]
fn quiet_mode_silences_listings() {
    let ws = Workspace::new();
    ws.roverdb()
        .args(["--quiet", "modules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn missing_explicit_config_fails() {
    let ws = Workspace::new();
    ws.roverdb()
        .args(["--config", "nope.toml", "modules", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn invalid_config_value_is_reported() {
    let ws = Workspace::new();
    let config = ws.dir.path().join("bad.toml");
    std::fs::write(&config, "[database]\npool_size = 0\n").unwrap();

    ws.roverdb()
        .arg("--config")
        .arg(&config)
        .args(["modules", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value for pool_size"));
}
