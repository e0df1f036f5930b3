//! The click-then-query sequence.
//!
//! One run queries the widget, clicks it, queries again, clicks a second time
//! and queries a last time, printing a progress line at each step. Nothing is
//! asserted: the printed states are for a human to compare.

use crate::injector::EventInjector;
use crate::query::{QueryOutcome, StateQuery};
use crate::{Result, ScreenPoint};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Pause after a click before the state is read back.
pub const DEFAULT_SETTLE_AFTER_CLICK: Duration = Duration::from_millis(100);

/// Pause before the second click so any color transition can finish.
pub const DEFAULT_SETTLE_BETWEEN_CLICKS: Duration = Duration::from_millis(500);

/// How the driver waits for the window manager to react to a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Sleep for `settle_after_click`, then query once.
    #[default]
    Fixed,
    /// Query every `poll_interval` until the state differs from the one seen
    /// before the click, or `timeout` runs out. The last outcome is reported
    /// either way.
    UntilChanged {
        timeout: Duration,
        poll_interval: Duration,
    },
}

/// Configuration for one probe run
#[derive(Debug, Clone)]
pub struct SequenceConfig {
    /// Where both clicks land
    pub point: ScreenPoint,

    pub settle_after_click: Duration,

    pub settle_between_clicks: Duration,

    pub wait: WaitStrategy,
}

impl SequenceConfig {
    pub fn new(point: ScreenPoint) -> Self {
        Self {
            point,
            settle_after_click: DEFAULT_SETTLE_AFTER_CLICK,
            settle_between_clicks: DEFAULT_SETTLE_BETWEEN_CLICKS,
            wait: WaitStrategy::default(),
        }
    }
}

/// States observed during one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub point: ScreenPoint,
    pub initial: QueryOutcome,
    pub after_first_click: QueryOutcome,
    pub after_second_click: QueryOutcome,
}

/// Run the full sequence, writing progress lines to `out`.
///
/// Click failures are logged and the run carries on. The only error is a
/// failed write to `out`.
///
/// Each click blocks the executor thread for the injector's press duration.
pub async fn run_sequence<Q, W>(
    query: &Q,
    injector: &EventInjector,
    config: &SequenceConfig,
    out: &mut W,
) -> Result<ProbeReport>
where
    Q: StateQuery + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "Testing space widget click functionality...")?;

    let initial = query.query().await;
    writeln!(out, "Initial widget state: {}", initial)?;

    writeln!(out, "Clicking at position {}...", config.point)?;
    click_and_log(injector, config.point);

    let after_first_click = settle(query, config, &initial).await;
    writeln!(out, "Widget state after click: {}", after_first_click)?;

    tokio::time::sleep(config.settle_between_clicks).await;
    writeln!(out, "Clicking again at position {}...", config.point)?;
    click_and_log(injector, config.point);

    let after_second_click = settle(query, config, &after_first_click).await;
    writeln!(out, "Widget state after second click: {}", after_second_click)?;
    out.flush()?;

    Ok(ProbeReport {
        point: config.point,
        initial,
        after_first_click,
        after_second_click,
    })
}

fn click_and_log(injector: &EventInjector, point: ScreenPoint) {
    if let Err(e) = injector.click(point) {
        warn!(error = %e, %point, "Click could not be injected");
    }
}

async fn settle<Q>(query: &Q, config: &SequenceConfig, before: &QueryOutcome) -> QueryOutcome
where
    Q: StateQuery + ?Sized,
{
    match config.wait {
        WaitStrategy::Fixed => {
            tokio::time::sleep(config.settle_after_click).await;
            query.query().await
        }
        WaitStrategy::UntilChanged {
            timeout,
            poll_interval,
        } => {
            let deadline = Instant::now() + timeout;
            let mut polls = 0u32;
            loop {
                tokio::time::sleep(poll_interval).await;
                let outcome = query.query().await;
                polls += 1;
                if outcome != *before {
                    info!(polls, "Widget state changed");
                    return outcome;
                }
                if Instant::now() >= deadline {
                    warn!(
                        polls,
                        timeout_ms = timeout.as_millis() as u64,
                        "Widget state did not change before timeout"
                    );
                    return outcome;
                }
                debug!(polls, "Widget state unchanged, polling again");
            }
        }
    }
}
