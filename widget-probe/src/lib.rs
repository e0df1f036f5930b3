//! Click-then-query probe for the window manager's space widget
//!
//! This crate injects synthetic left clicks at a screen point and asks the
//! window manager, through its command-line client, what state the widget
//! reports before and after each click.

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

pub mod driver;
pub mod errors;
pub mod geometry;
pub mod injector;
pub mod platforms;
pub mod query;

pub use driver::{run_sequence, ProbeReport, SequenceConfig, WaitStrategy};
pub use errors::{ProbeError, Result};
pub use geometry::{ScreenPoint, WidgetGeometry};
pub use injector::EventInjector;
pub use query::{QueryCommand, QueryOutcome, StateQuery, WidgetStateProbe};

/// An input engine paired with a widget query.
pub struct WidgetProbe {
    injector: EventInjector,
    query: Arc<dyn StateQuery>,
}

impl WidgetProbe {
    /// Probe using the platform's input engine.
    #[instrument(skip(query))]
    pub fn new(query: WidgetStateProbe) -> Result<Self> {
        let start = Instant::now();
        info!("Initializing input engine");

        let engine = platforms::create_engine()?;

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            engine = engine.name(),
            "Input engine initialized"
        );

        Ok(Self {
            injector: EventInjector::new(engine),
            query: Arc::new(query),
        })
    }

    pub fn with_parts(injector: EventInjector, query: Arc<dyn StateQuery>) -> Self {
        Self { injector, query }
    }

    pub fn with_press_duration(mut self, press_duration: std::time::Duration) -> Self {
        self.injector = self.injector.with_press_duration(press_duration);
        self
    }

    #[instrument(skip(self))]
    pub fn click(&self, point: ScreenPoint) -> Result<()> {
        let start = Instant::now();

        self.injector.click(point)?;

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "Click injected"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn query(&self) -> QueryOutcome {
        self.query.query().await
    }

    /// Run the sequence at `config.point`. Clicks block the executor thread
    /// for the press duration.
    #[instrument(skip(self, config, out), fields(point = %config.point))]
    pub async fn run<W: Write + ?Sized>(
        &self,
        config: &SequenceConfig,
        out: &mut W,
    ) -> Result<ProbeReport> {
        let start = Instant::now();
        info!(wait = ?config.wait, "Starting probe sequence");

        let report = run_sequence(self.query.as_ref(), &self.injector, config, out).await?;

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            initial = %report.initial,
            after_first_click = %report.after_first_click,
            after_second_click = %report.after_second_click,
            "Probe sequence completed"
        );

        Ok(report)
    }
}

impl Clone for WidgetProbe {
    fn clone(&self) -> Self {
        Self {
            injector: self.injector.clone(),
            query: self.query.clone(),
        }
    }
}
