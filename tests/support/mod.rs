use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A throwaway store directory plus an empty config file, so tests never
/// touch the user's real data or config.
pub struct TestBoard {
    dir: TempDir,
}

impl TestBoard {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        fs::create_dir_all(dir.path().join("store")).expect("store dir");
        fs::write(dir.path().join("taskboard.toml"), "").expect("config file");
        Self { dir }
    }

    pub fn store_dir(&self) -> PathBuf {
        self.dir.path().join("store")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("taskboard.toml")
    }

    pub fn write_config(&self, contents: &str) {
        fs::write(self.config_path(), contents).expect("write config");
    }

    pub fn write_key(&self, key: &str, contents: &str) {
        fs::write(self.store_dir().join(format!("{key}.json")), contents).expect("write key");
    }

    pub fn read_key(&self, key: &str) -> Option<Value> {
        let path = self.store_dir().join(format!("{key}.json"));
        read_json(&path)
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskboard").expect("binary");
        cmd.env_remove("TASKBOARD_STORE")
            .env_remove("TASKBOARD_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--store")
            .arg(self.store_dir())
            .arg("--config")
            .arg(self.config_path());
        cmd
    }

    /// Run with `--json`, assert success and return the envelope
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json envelope")
    }

    pub fn login(&self, name: &str) {
        let first = name.split_whitespace().next().unwrap_or("user").to_lowercase();
        let email = format!("{first}@example.com");
        self.cmd()
            .args(["user", "login", name, "--email", &email])
            .assert()
            .success();
    }

    /// Create a task and return its id
    pub fn new_task(&self, title: &str, extra: &[&str]) -> String {
        let mut args = vec!["task", "new", title, "--due", "2025-05-10"];
        if !extra.contains(&"--priority") {
            args.extend_from_slice(&["--priority", "Medium"]);
        }
        args.extend_from_slice(extra);
        let value = self.json(&args);
        value["data"]["id"].as_str().expect("task id").to_string()
    }
}

fn read_json(path: &Path) -> Option<Value> {
    let contents = fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}
