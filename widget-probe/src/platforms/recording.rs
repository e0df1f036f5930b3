//! In-memory input engine.
//!
//! `RecordingEngine` keeps every event it is handed instead of posting it to
//! the OS. The CLI uses it for `--dry-run`, and the tests use it to check the
//! shape and timing of injected clicks.

use crate::platforms::{InputEngine, PointerEvent};
use crate::ProbeError;
use std::sync::Mutex;
use std::time::Instant;
use tracing::debug;

/// An event captured by [`RecordingEngine`] together with when it arrived.
#[derive(Debug, Clone, Copy)]
pub struct RecordedEvent {
    pub event: PointerEvent,
    pub at: Instant,
}

#[derive(Debug, Default)]
pub struct RecordingEngine {
    events: Mutex<Vec<RecordedEvent>>,
    fail_with: Option<String>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose every post fails with a platform error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail_with: Some(message.into()),
        }
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InputEngine for RecordingEngine {
    fn post(&self, event: PointerEvent) -> Result<(), ProbeError> {
        if let Some(message) = &self.fail_with {
            return Err(ProbeError::PlatformError(message.clone()));
        }
        debug!(?event, "Recording pointer event");
        let recorded = RecordedEvent {
            event,
            at: Instant::now(),
        };
        match self.events.lock() {
            Ok(mut events) => events.push(recorded),
            Err(poisoned) => poisoned.into_inner().push(recorded),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
