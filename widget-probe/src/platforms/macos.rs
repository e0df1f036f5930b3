use crate::platforms::{ButtonPhase, InputEngine, MouseButton, PointerEvent};
use crate::ProbeError;
use core_graphics::display::CGDisplay;
use core_graphics::event::{CGEvent, CGEventTapLocation, CGEventType, CGMouseButton};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;
use tracing::debug;

/// Posts mouse events through Quartz at the HID tap.
///
/// Posting needs the Accessibility (or Input Monitoring) permission. Without
/// it CoreGraphics accepts the event and drops it silently.
#[derive(Debug, Default)]
pub struct MacOSEngine;

impl MacOSEngine {
    pub fn new() -> Self {
        Self
    }
}

impl InputEngine for MacOSEngine {
    fn post(&self, event: PointerEvent) -> Result<(), ProbeError> {
        let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState).map_err(|_| {
            ProbeError::PlatformError("Failed to create event source".to_string())
        })?;

        let (event_type, label) = match (event.button, event.phase) {
            (MouseButton::Left, ButtonPhase::Press) => (CGEventType::LeftMouseDown, "down"),
            (MouseButton::Left, ButtonPhase::Release) => (CGEventType::LeftMouseUp, "up"),
        };
        let point = CGPoint::new(f64::from(event.point.x), f64::from(event.point.y));

        let mouse_event = CGEvent::new_mouse_event(source, event_type, point, CGMouseButton::Left)
            .map_err(|_| {
                ProbeError::PlatformError(format!("Failed to create mouse {} event", label))
            })?;
        mouse_event.post(CGEventTapLocation::HID);

        debug!("Mouse {} at {}", label, event.point);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "quartz"
    }
}

pub(crate) fn main_display_height() -> Result<f64, ProbeError> {
    let bounds = CGDisplay::main().bounds();
    if !bounds.size.height.is_finite() || bounds.size.height <= 0.0 {
        return Err(ProbeError::PlatformError(
            "Main display reported an empty frame".to_string(),
        ));
    }
    Ok(bounds.size.height)
}
