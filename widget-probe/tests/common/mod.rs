//! Shared helpers for the probe integration tests
//!
//! The stub window manager is a shell script that reads how many clicks a
//! `CountingEngine` has delivered and prints the color the widget would show.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use widget_probe::platforms::{ButtonPhase, InputEngine, PointerEvent};
use widget_probe::{ProbeError, QueryCommand};

const STUB_WINDOW_MANAGER: &str = r#"#!/bin/sh
clicks=$(cat "$(dirname "$0")/clicks" 2>/dev/null || echo 0)
case $((clicks % 2)) in
  0) echo "  red  " ;;
  1) echo "blue" ;;
esac
"#;

/// A temp directory holding the stub client and its click counter.
pub struct StubWindowManager {
    dir: TempDir,
}

impl StubWindowManager {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("yabai"), STUB_WINDOW_MANAGER).expect("Failed to write stub");
        Self { dir }
    }

    pub fn counter_path(&self) -> PathBuf {
        self.dir.path().join("clicks")
    }

    /// Runs the stub through `sh` so the script never needs the exec bit.
    pub fn query_command(&self) -> QueryCommand {
        let script = self.dir.path().join("yabai");
        QueryCommand::new(
            "sh",
            [
                script.to_string_lossy().into_owned(),
                "-m".to_string(),
                "query".to_string(),
                "--widget".to_string(),
            ],
        )
    }

    pub fn engine(&self) -> CountingEngine {
        CountingEngine::new(self.counter_path())
    }
}

/// Counts completed clicks into a file the stub reads.
pub struct CountingEngine {
    counter: PathBuf,
    clicks: AtomicUsize,
}

impl CountingEngine {
    pub fn new(counter: impl AsRef<Path>) -> Self {
        Self {
            counter: counter.as_ref().to_path_buf(),
            clicks: AtomicUsize::new(0),
        }
    }

    pub fn clicks(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }
}

impl InputEngine for CountingEngine {
    fn post(&self, event: PointerEvent) -> Result<(), ProbeError> {
        if event.phase == ButtonPhase::Release {
            let clicks = self.clicks.fetch_add(1, Ordering::SeqCst) + 1;
            fs::write(&self.counter, clicks.to_string())?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Route probe logs to the test output. Safe to call from every test.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
        )
        .with_test_writer()
        .try_init();
}

/// A query command that always exits 1 with `no such process` on stderr.
pub fn failing_query_command() -> QueryCommand {
    QueryCommand::new("sh", ["-c", "echo 'no such process' >&2; exit 1"])
}
