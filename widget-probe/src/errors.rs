use thiserror::Error;

/// Errors raised while setting up or driving a probe run.
///
/// Query failures are not represented here; they travel as
/// [`QueryOutcome`](crate::QueryOutcome) values.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Platform-specific error: {0}")]
    PlatformError(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;
