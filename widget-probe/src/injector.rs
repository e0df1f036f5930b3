use crate::platforms::{InputEngine, PointerEvent};
use crate::{ProbeError, ScreenPoint};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Time the button is held between press and release.
pub const DEFAULT_PRESS_DURATION: Duration = Duration::from_millis(10);

const MIN_PRESS_DURATION: Duration = Duration::from_millis(1);

/// Synthesizes left-button clicks through an [`InputEngine`].
#[derive(Clone)]
pub struct EventInjector {
    engine: Arc<dyn InputEngine>,
    press_duration: Duration,
}

impl EventInjector {
    pub fn new(engine: Arc<dyn InputEngine>) -> Self {
        Self {
            engine,
            press_duration: DEFAULT_PRESS_DURATION,
        }
    }

    /// Durations below 1 ms are raised to 1 ms.
    pub fn with_press_duration(mut self, press_duration: Duration) -> Self {
        self.press_duration = press_duration.max(MIN_PRESS_DURATION);
        self
    }

    pub fn press_duration(&self) -> Duration {
        self.press_duration
    }

    /// Press and release the left button at `point`.
    ///
    /// Blocks the calling thread for the press duration.
    #[instrument(skip(self), fields(engine = self.engine.name()))]
    pub fn click(&self, point: ScreenPoint) -> Result<(), ProbeError> {
        self.engine.post(PointerEvent::press(point))?;
        std::thread::sleep(self.press_duration);
        self.engine.post(PointerEvent::release(point))?;

        debug!(
            hold_ms = self.press_duration.as_millis() as u64,
            "Performed simulated mouse click at {}", point
        );
        Ok(())
    }
}

impl std::fmt::Debug for EventInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventInjector")
            .field("engine", &self.engine.name())
            .field("press_duration", &self.press_duration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::{ButtonPhase, RecordingEngine};

    #[test]
    fn test_click_emits_press_then_release() {
        let engine = Arc::new(RecordingEngine::new());
        let injector = EventInjector::new(engine.clone());
        let point = ScreenPoint::new(35, 760);

        injector.click(point).unwrap();

        let events = engine.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event.phase, ButtonPhase::Press);
        assert_eq!(events[1].event.phase, ButtonPhase::Release);
        assert_eq!(events[0].event.point, point);
        assert_eq!(events[1].event.point, point);
        assert!(events[1].at.duration_since(events[0].at) >= DEFAULT_PRESS_DURATION);
    }

    #[test]
    fn test_off_screen_points_pass_through() {
        let engine = Arc::new(RecordingEngine::new());
        let injector = EventInjector::new(engine.clone());
        let point = ScreenPoint::new(-100, 100_000);

        injector.click(point).unwrap();

        assert!(engine.events().iter().all(|e| e.event.point == point));
    }

    #[test]
    fn test_zero_press_duration_is_clamped() {
        let injector = EventInjector::new(Arc::new(RecordingEngine::new()))
            .with_press_duration(Duration::ZERO);
        assert!(injector.press_duration() > Duration::ZERO);
    }

    #[test]
    fn test_repeated_clicks_never_fail() {
        let engine = Arc::new(RecordingEngine::new());
        let injector =
            EventInjector::new(engine.clone()).with_press_duration(Duration::from_millis(1));
        let point = ScreenPoint::new(30, 720);

        for _ in 0..25 {
            assert!(injector.click(point).is_ok());
        }
        assert_eq!(engine.len(), 50);
    }

    #[test]
    fn test_engine_error_propagates() {
        let injector = EventInjector::new(Arc::new(RecordingEngine::failing("denied")));
        let result = injector.click(ScreenPoint::new(0, 0));
        assert!(matches!(result, Err(ProbeError::PlatformError(_))));
    }
}
