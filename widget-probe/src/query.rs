use serde::{Serialize, Serializer};
use std::fmt;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Program invoked when no other query command is configured.
pub const DEFAULT_QUERY_PROGRAM: &str = "bin/yabai";

/// Flags that put the window manager's client into widget query mode.
pub const DEFAULT_QUERY_ARGS: [&str; 3] = ["-m", "query", "--widget"];

/// The argument vector used to ask the window manager for the widget state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl QueryCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Default widget query flags against a different client binary.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self::new(program, DEFAULT_QUERY_ARGS)
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for QueryCommand {
    fn default() -> Self {
        Self::with_program(DEFAULT_QUERY_PROGRAM)
    }
}

/// What a single widget query produced.
///
/// The state text is opaque: it is whatever the window manager printed,
/// trimmed, and is never parsed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    State(String),
    Failed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },
    /// The command could not be started or did not finish in time.
    Unavailable(String),
}

impl QueryOutcome {
    pub fn is_state(&self) -> bool {
        matches!(self, QueryOutcome::State(_))
    }

    pub fn state(&self) -> Option<&str> {
        match self {
            QueryOutcome::State(state) => Some(state),
            _ => None,
        }
    }
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOutcome::State(state) => f.write_str(state),
            QueryOutcome::Failed {
                command,
                exit_code,
                stderr,
            } => {
                match exit_code {
                    Some(code) => write!(
                        f,
                        "Error: command '{}' returned non-zero exit status {}",
                        command, code
                    )?,
                    None => write!(f, "Error: command '{}' was terminated by a signal", command)?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }
                Ok(())
            }
            QueryOutcome::Unavailable(detail) => write!(f, "Error: {}", detail),
        }
    }
}

impl Serialize for QueryOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Anything the driver can ask for the widget's current state.
#[async_trait::async_trait]
pub trait StateQuery: Send + Sync {
    async fn query(&self) -> QueryOutcome;
}

/// Runs the external query command and reports its output verbatim.
#[derive(Debug, Clone, Default)]
pub struct WidgetStateProbe {
    command: QueryCommand,
    timeout: Option<Duration>,
}

impl WidgetStateProbe {
    pub fn new(command: QueryCommand) -> Self {
        Self {
            command,
            timeout: None,
        }
    }

    /// Bound each query. Without a timeout a hung window manager blocks the
    /// run forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[instrument(skip(self), fields(command = %self.command.command_line()))]
    pub async fn query(&self) -> QueryOutcome {
        let start = Instant::now();
        let command_line = self.command.command_line();

        let mut command = tokio::process::Command::new(&self.command.program);
        command
            .args(&self.command.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, command.output()).await {
                Ok(output) => output,
                Err(_) => {
                    warn!(timeout_ms = limit.as_millis() as u64, "Widget query timed out");
                    return QueryOutcome::Unavailable(format!(
                        "command '{}' timed out after {} ms",
                        command_line,
                        limit.as_millis()
                    ));
                }
            },
            None => command.output().await,
        };

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "Failed to run widget query");
                return QueryOutcome::Unavailable(format!(
                    "failed to run '{}': {}",
                    command_line, e
                ));
            }
        };

        let outcome = if output.status.success() {
            QueryOutcome::State(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            QueryOutcome::Failed {
                command: command_line,
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
        };

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            exit_code = output.status.code(),
            success = outcome.is_state(),
            "Widget query completed"
        );

        outcome
    }
}

#[async_trait::async_trait]
impl StateQuery for WidgetStateProbe {
    async fn query(&self) -> QueryOutcome {
        WidgetStateProbe::query(self).await
    }
}
