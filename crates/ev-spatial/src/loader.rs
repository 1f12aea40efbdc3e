//! CSV road-network loader.
//!
//! # CSV format
//!
//! Two files.  `nodes.csv` has one row per node:
//!
//! ```csv
//! id,lat,lon
//! 101,53.4801,-2.2420
//! 102,53.4805,-2.2415
//! ```
//!
//! `edges.csv` has one row per **directed** edge:
//!
//! ```csv
//! from,to,key,length_m
//! 101,102,0,58.3
//! 102,101,0,58.3
//! 101,102,1,
//! ```
//!
//! `id`, `from` and `to` are the source's own node identifiers (e.g. OSM
//! ids).  `key` distinguishes parallel edges and may be left empty (or the
//! column omitted) to number them automatically.  An empty `length_m` is
//! filled with the haversine distance between the endpoints.
//!
//! Any malformed row fails the whole load.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ev_core::{GeoPoint, NodeId};

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::{SpatialError, SpatialResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:  i64,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:     i64,
    to:       i64,
    #[serde(default)]
    key:      Option<u32>,
    #[serde(default)]
    length_m: Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a road network from a pair of CSV files.
pub fn load_network_csv(nodes: &Path, edges: &Path) -> SpatialResult<RoadNetwork> {
    let nodes_file = std::fs::File::open(nodes)?;
    let edges_file = std::fs::File::open(edges)?;
    let network = load_network_reader(nodes_file, edges_file)?;
    log::info!(
        "loaded network from {} / {}: {} nodes, {} edges",
        nodes.display(),
        edges.display(),
        network.node_count(),
        network.edge_count(),
    );
    Ok(network)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`).
pub fn load_network_reader<N: Read, E: Read>(nodes: N, edges: E) -> SpatialResult<RoadNetwork> {
    let mut builder = RoadNetworkBuilder::new();
    let mut by_external: HashMap<i64, NodeId> = HashMap::new();

    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut node_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(nodes);
    for (line, result) in node_reader.deserialize::<NodeRecord>().enumerate() {
        let row = result.map_err(|e| parse_error("nodes", line, e))?;
        let id = builder.add_node_with_id(row.id, GeoPoint::new(row.lat, row.lon));
        if by_external.insert(row.id, id).is_some() {
            return Err(SpatialError::DuplicateNode(row.id));
        }
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let mut edge_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(edges);
    for (line, result) in edge_reader.deserialize::<EdgeRecord>().enumerate() {
        let row = result.map_err(|e| parse_error("edges", line, e))?;
        let from = *by_external
            .get(&row.from)
            .ok_or(SpatialError::UnknownExternalId(row.from))?;
        let to = *by_external
            .get(&row.to)
            .ok_or(SpatialError::UnknownExternalId(row.to))?;

        let length_m = match row.length_m {
            Some(len) => len,
            None => match (builder.node_pos(from), builder.node_pos(to)) {
                (Some(a), Some(b)) => a.distance_m(b),
                _ => return Err(SpatialError::NodeNotFound(from)),
            },
        };

        match row.key {
            Some(key) => builder.add_keyed_edge(from, to, key, length_m),
            None => {
                builder.add_directed_edge(from, to, length_m);
            }
        }
    }

    builder.build()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `line` is the 0-based data row; report it 1-based after the header.
fn parse_error(file: &str, line: usize, e: csv::Error) -> SpatialError {
    SpatialError::Parse(format!("{file} row {}: {e}", line + 2))
}
