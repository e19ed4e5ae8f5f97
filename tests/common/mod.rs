#![allow(dead_code)]

use chrono::NaiveDate;
use sprintdeck::catalogue;
use sprintdeck::engine::Engine;
use sprintdeck::store::LocalStore;
use std::process::Output;
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        sprintdeck::logging::init_test_logging();
    });
}

/// Engine over an unbacked in-memory store.
pub fn test_engine() -> Engine {
    init_test_logging();
    Engine::load(Box::new(LocalStore::in_memory()), catalogue::thirty_day_sprint())
        .expect("load engine")
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

/// A temp directory acting as an `sd` project root for CLI tests.
pub struct SdWorkspace {
    pub dir: TempDir,
}

impl SdWorkspace {
    pub fn new() -> Self {
        init_test_logging();
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    /// Run `sd` in the workspace with a fixed actor identity.
    pub fn run<I, S>(&self, args: I) -> Output
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        assert_cmd::Command::cargo_bin("sd")
            .expect("sd binary")
            .current_dir(self.dir.path())
            .env("SPRINTDECK_ACTOR", "Jordan")
            .env_remove("SPRINTDECK_DIR")
            .args(args)
            .output()
            .expect("run sd")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn assert_success(output: &Output, context: &str) {
    assert!(
        output.status.success(),
        "{context} failed: stdout={} stderr={}",
        stdout(output),
        stderr(output)
    );
}
