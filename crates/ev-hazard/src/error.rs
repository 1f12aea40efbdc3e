//! Hazard-subsystem error type.

use thiserror::Error;

use ev_core::CoreError;

/// Errors produced by `ev-hazard`.
#[derive(Debug, Error)]
pub enum HazardError {
    #[error("hazard zone has no polygons")]
    EmptyHazard,

    #[error("polygon {polygon}: {reason}")]
    InvalidPolygon { polygon: String, reason: String },

    #[error("candidate {index} has non-finite coordinates")]
    InvalidCandidate { index: usize },

    #[error("cannot bring {what} into the network's reference frame: {source}")]
    Crs {
        what:   &'static str,
        #[source]
        source: CoreError,
    },

    #[error("geometry parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type HazardResult<T> = Result<T, HazardError>;
