//! Error types for ev-output.

use thiserror::Error;

/// Errors that can occur when exporting or rendering a run.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("nothing to render: no steps have been recorded")]
    NoSteps,

    #[error("frames per second must be positive")]
    InvalidFps,

    #[error("invalid render options: {0}")]
    InvalidOptions(String),

    #[error("video encoder failed: {0}")]
    Encoder(String),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
