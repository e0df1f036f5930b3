use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use widget_probe::platforms::{self, RecordingEngine};
use widget_probe::query::DEFAULT_QUERY_PROGRAM;
use widget_probe::{
    EventInjector, ProbeReport, QueryCommand, ScreenPoint, SequenceConfig, WaitStrategy, WidgetGeometry,
    WidgetProbe, WidgetStateProbe,
};

#[derive(Parser, Debug)]
#[command(name = "widget-probe")]
#[command(about = "Click the space widget and show the state the window manager reports")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Horizontal click position in screen points
    #[arg(long, allow_hyphen_values = true)]
    x: Option<i32>,

    /// Vertical click position in screen points
    #[arg(long, allow_hyphen_values = true)]
    y: Option<i32>,

    /// Click the center of the space widget on a display this tall
    #[arg(long, conflicts_with_all = ["x", "y"])]
    display_height: Option<f64>,

    /// Window manager client used for the widget query
    #[arg(long, env = "WIDGET_PROBE_QUERY_BIN", default_value = DEFAULT_QUERY_PROGRAM)]
    query_bin: String,

    /// Give up on a single query after this many milliseconds
    #[arg(long)]
    query_timeout_ms: Option<u64>,

    /// Wait after each click before querying
    #[arg(long, default_value = "100")]
    settle_ms: u64,

    /// Wait between the first result and the second click
    #[arg(long, default_value = "500")]
    between_ms: u64,

    /// Time the button is held down
    #[arg(long, default_value = "10")]
    press_ms: u64,

    /// Poll after each click until the state changes, for at most this long
    #[arg(long)]
    poll_timeout_ms: Option<u64>,

    /// Interval between polls when --poll-timeout-ms is set
    #[arg(long, default_value = "50")]
    poll_interval_ms: u64,

    /// Record the clicks instead of sending them to the OS
    #[arg(long)]
    dry_run: bool,

    /// Print the observed states as JSON instead of progress lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn resolve_point(&self, detect_height: impl FnOnce() -> Result<f64>) -> Result<ScreenPoint> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => return Ok(ScreenPoint::new(x, y)),
            (None, None) => {}
            _ => bail!("--x and --y must be given together"),
        }

        let height = match self.display_height {
            Some(height) => height,
            None => detect_height()
                .context("Could not detect the main display; pass --x/--y or --display-height")?,
        };
        if !height.is_finite() || height <= 0.0 {
            bail!("Display height must be a positive number, got {}", height);
        }
        Ok(WidgetGeometry::space_widget(height).center())
    }

    fn sequence_config(&self, point: ScreenPoint) -> SequenceConfig {
        let wait = match self.poll_timeout_ms {
            Some(timeout_ms) => WaitStrategy::UntilChanged {
                timeout: Duration::from_millis(timeout_ms),
                poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            },
            None => WaitStrategy::Fixed,
        };
        SequenceConfig {
            point,
            settle_after_click: Duration::from_millis(self.settle_ms),
            settle_between_clicks: Duration::from_millis(self.between_ms),
            wait,
        }
    }

    fn state_probe(&self) -> WidgetStateProbe {
        WidgetStateProbe::new(QueryCommand::with_program(self.query_bin.clone()))
            .with_timeout(self.query_timeout_ms.map(Duration::from_millis))
    }
}

/// What a finished run leaves behind besides its output.
struct RunSummary {
    report: ProbeReport,
    /// Pointer events captured by `--dry-run`.
    recorded_events: Option<usize>,
}

/// Build the probe the flags describe and run it, writing progress lines or
/// the JSON report to `out`.
async fn run<W: Write + ?Sized>(
    cli: &Cli,
    detect_height: impl FnOnce() -> Result<f64>,
    out: &mut W,
) -> Result<RunSummary> {
    let point = cli.resolve_point(detect_height)?;
    let config = cli.sequence_config(point);

    let recorder = cli.dry_run.then(|| Arc::new(RecordingEngine::new()));
    let probe = match &recorder {
        Some(engine) => WidgetProbe::with_parts(
            EventInjector::new(engine.clone()),
            Arc::new(cli.state_probe()),
        ),
        None => WidgetProbe::new(cli.state_probe())
            .context("Failed to initialize the input engine")?,
    }
    .with_press_duration(Duration::from_millis(cli.press_ms));

    info!(%point, query = %cli.query_bin, dry_run = cli.dry_run, "Probing widget");

    let report = if cli.json {
        let report = probe.run(&config, &mut std::io::sink()).await?;
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        report
    } else {
        probe.run(&config, out).await?
    };

    Ok(RunSummary {
        report,
        recorded_events: recorder.map(|engine| engine.len()),
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut stdout = std::io::stdout().lock();
    let summary = run(&cli, || Ok(platforms::main_display_height()?), &mut stdout).await?;

    if let Some(events) = summary.recorded_events {
        info!(events, "Dry run recorded pointer events");
    }
    let report = &summary.report;
    let outcomes = [
        &report.initial,
        &report.after_first_click,
        &report.after_second_click,
    ];
    if outcomes.iter().any(|outcome| !outcome.is_state()) {
        warn!("At least one widget query failed");
    }

    Ok(())
}
