//! OSM PBF loader — enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use ev_spatial::osm::load_walk_network_pbf;
//!
//! let network = load_walk_network_pbf(Path::new("town.osm.pbf"))?;
//! ```
//!
//! # What is loaded
//!
//! Every `highway=*` way a pedestrian may use (see [`is_walkable`]).  The
//! graph is **unsimplified**: every way node becomes a network node, and
//! every consecutive pair of way nodes becomes one edge in each direction,
//! since one-way restrictions do not bind pedestrians.  Node ids are the OSM
//! ids, so a target can be given as an OSM node id.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use osmpbf::{Element, ElementReader};

use ev_core::{GeoPoint, NodeId};

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::SpatialError;

// ── Public entry point ────────────────────────────────────────────────────────

/// Load a pedestrian road network from an OSM PBF file.
///
/// # Errors
///
/// Returns [`SpatialError::Osm`] when the file cannot be opened or parsed,
/// or when a way references a node missing from the file.
pub fn load_walk_network_pbf(path: &Path) -> Result<RoadNetwork, SpatialError> {
    // ── Phase 1: collect all OSM nodes + walkable ways in one pass ────────
    let reader = ElementReader::from_path(path).map_err(|e| SpatialError::Osm(e.to_string()))?;

    let mut all_nodes: HashMap<i64, GeoPoint> = HashMap::new();
    let mut ways: Vec<Vec<i64>> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
            }
            Element::DenseNode(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
            }
            Element::Way(w) => {
                let tags: Vec<(&str, &str)> = w.tags().collect();
                if is_walkable(&tags) {
                    ways.push(w.refs().collect());
                }
            }
            _ => {}
        })
        .map_err(|e| SpatialError::Osm(e.to_string()))?;

    // ── Phase 2: road-referenced node ids, sorted for stable NodeIds ─────
    let road_node_ids: BTreeSet<i64> = ways.iter().flatten().copied().collect();

    // ── Phase 3: build network ────────────────────────────────────────────
    let mut builder = RoadNetworkBuilder::with_capacity(road_node_ids.len(), road_node_ids.len() * 2);
    let mut osm_to_ev: HashMap<i64, NodeId> = HashMap::with_capacity(road_node_ids.len());

    for osm_id in &road_node_ids {
        let pos = all_nodes
            .get(osm_id)
            .copied()
            .ok_or_else(|| SpatialError::Osm(format!("way references missing node {osm_id}")))?;
        osm_to_ev.insert(*osm_id, builder.add_node_with_id(*osm_id, pos));
    }
    drop(all_nodes);

    for way in &ways {
        for window in way.windows(2) {
            let (from, to) = (osm_to_ev[&window[0]], osm_to_ev[&window[1]]);
            if from == to {
                continue;
            }
            let len_m = match (builder.node_pos(from), builder.node_pos(to)) {
                (Some(a), Some(b)) => a.distance_m(b),
                _ => continue,
            };
            builder.add_road(from, to, len_m);
        }
    }

    let network = builder.build()?;
    log::info!(
        "loaded OSM walk network from {}: {} nodes, {} edges",
        path.display(),
        network.node_count(),
        network.edge_count(),
    );
    Ok(network)
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

/// `true` for ways a pedestrian can use.
///
/// Any `highway` value counts except ones that are not (yet, or any longer)
/// real roads, and ways explicitly closed to foot traffic.
fn is_walkable(tags: &[(&str, &str)]) -> bool {
    let tag = |key: &str| tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);

    let Some(highway) = tag("highway") else {
        return false;
    };
    if matches!(
        highway,
        "proposed" | "construction" | "abandoned" | "platform" | "raceway" | "bus_guideway"
    ) {
        return false;
    }
    if matches!(tag("foot"), Some("no")) {
        return false;
    }
    !matches!(tag("access"), Some("private" | "no"))
}
