use crate::{ProbeError, ScreenPoint};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonPhase {
    Press,
    Release,
}

/// A single synthetic pointer event handed to the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub button: MouseButton,
    pub point: ScreenPoint,
    pub phase: ButtonPhase,
}

impl PointerEvent {
    pub fn press(point: ScreenPoint) -> Self {
        Self {
            button: MouseButton::Left,
            point,
            phase: ButtonPhase::Press,
        }
    }

    pub fn release(point: ScreenPoint) -> Self {
        Self {
            button: MouseButton::Left,
            point,
            phase: ButtonPhase::Release,
        }
    }
}

/// The common trait that all platform-specific input engines must implement
pub trait InputEngine: Send + Sync {
    /// Submit one pointer event to the system-wide input pipeline.
    ///
    /// Returning `Ok` only means the event was built and posted. Whether any
    /// window received it (the OS may drop it for lack of permission) is not
    /// observable here.
    fn post(&self, event: PointerEvent) -> Result<(), ProbeError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

#[cfg(target_os = "macos")]
pub mod macos;
pub mod recording;

pub use recording::RecordingEngine;

/// Create the appropriate engine for the current platform
pub fn create_engine() -> Result<Arc<dyn InputEngine>, ProbeError> {
    #[cfg(target_os = "macos")]
    {
        Ok(Arc::new(macos::MacOSEngine::new()))
    }
    #[cfg(not(target_os = "macos"))]
    {
        Err(ProbeError::UnsupportedPlatform(
            "synthetic pointer events are only implemented on macOS".to_string(),
        ))
    }
}

/// Height in points of the main display.
pub fn main_display_height() -> Result<f64, ProbeError> {
    #[cfg(target_os = "macos")]
    {
        macos::main_display_height()
    }
    #[cfg(not(target_os = "macos"))]
    {
        Err(ProbeError::UnsupportedPlatform(
            "display detection is only implemented on macOS".to_string(),
        ))
    }
}
