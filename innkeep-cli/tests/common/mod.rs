//! Shared helpers for CLI integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin;
use std::process::Command;
use tempfile::TempDir;

/// A temporary data directory with a seeded catalog.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    /// Creates a fresh environment and initializes the database.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let env = Self { dir };
        let status = env
            .cmd()
            .arg("init")
            .status()
            .expect("init should run");
        assert!(status.success(), "init failed");
        env
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Builds a command with the data directory preset.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("innkeep"));
        cmd.arg("--data-dir").arg(self.data_dir());
        cmd
    }

    /// Writes and loads the standard test catalog: Deluxe (rooms 101,
    /// 102), Single (room 201), and the SPRING10 promo.
    pub fn seed_catalog(&self) -> PathBuf {
        let catalog = self.data_dir().join("catalog.yaml");
        std::fs::write(
            &catalog,
            r#"room_types:
  - id: 1
    name: Deluxe
    nightly_rate: 10000
    max_guests: 3
  - id: 2
    name: Single
    nightly_rate: 6000
    max_guests: 1
rooms:
  - id: 101
    room_type_id: 1
    room_number: "101"
    floor: 1
  - id: 102
    room_type_id: 1
    room_number: "102"
    floor: 1
  - id: 201
    room_type_id: 2
    room_number: "201"
    floor: 2
promo_codes:
  - code: SPRING10
    rule: !percent 10
"#,
        )
        .unwrap();

        let output = self
            .cmd()
            .args(["seed", "--file"])
            .arg(&catalog)
            .output()
            .expect("seed should run");
        assert!(
            output.status.success(),
            "seed failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        catalog
    }
}

/// A stay starting 30 days from now, within the default booking horizon.
pub fn future_stay() -> (String, String) {
    let check_in = chrono::Utc::now().date_naive() + chrono::Duration::days(30);
    let check_out = check_in + chrono::Duration::days(2);
    (check_in.to_string(), check_out.to_string())
}
