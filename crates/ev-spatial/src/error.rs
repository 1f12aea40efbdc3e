//! Spatial-subsystem error type.

use thiserror::Error;

use ev_core::{GeoPoint, NodeId};

/// Errors produced by `ev-spatial`.
///
/// Every load-time variant aborts network construction; there is no
/// partially loaded network.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("external node id {0} not found in network")]
    UnknownExternalId(i64),

    #[error("duplicate external node id {0}")]
    DuplicateNode(i64),

    #[error("node {external} has invalid position {pos}")]
    InvalidNode { external: i64, pos: GeoPoint },

    #[error("duplicate edge {from} -> {to} with key {key}")]
    DuplicateEdge { from: NodeId, to: NodeId, key: u32 },

    #[error("invalid edge {from} -> {to}: {reason}")]
    InvalidEdge { from: NodeId, to: NodeId, reason: String },

    #[error("network parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
