//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors produced by `ev-core`.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("unsupported coordinate reference system {0:?}")]
    UnsupportedCrs(String),

    #[error("coordinate ({x}, {y}) is outside the valid range of {crs}")]
    OutOfRange { crs: crate::Crs, x: f64, y: f64 },
}

/// Shorthand result type for `ev-core`.
pub type CoreResult<T> = Result<T, CoreError>;
