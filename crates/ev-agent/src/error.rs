use thiserror::Error;

use ev_core::{AgentId, NodeId};
use ev_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("{agent}: no path from {from} to target {to}")]
    NoRoute { agent: AgentId, from: NodeId, to: NodeId },

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type NavResult<T> = Result<T, NavError>;
