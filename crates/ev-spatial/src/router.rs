//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Navigators call routing via the [`Router`] trait, so a different search
//! (A*, hazard-weighted costs) can be dropped in without touching the
//! simulation core.
//!
//! # Cost units
//!
//! Costs are walking time in **milliseconds** (u64) internally, derived from
//! edge length and the router's walking speed.  `Route` exposes seconds and
//! metres.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ev_core::{EdgeId, NodeId};

use crate::network::RoadNetwork;
use crate::SpatialError;

/// Typical unhurried pedestrian speed, m/s.
pub const WALK_SPEED_MPS: f64 = 1.4;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: an ordered list of `EdgeId`s.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Origin node (kept so that a trivial route still knows where it is).
    pub from: NodeId,
    /// Edges to traverse in order, from source to destination.
    pub edges: Vec<EdgeId>,
    /// Cumulative walking time in seconds.
    pub total_travel_secs: f64,
    /// Cumulative length in metres.
    pub total_length_m: f64,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Nodes visited in order, including origin and destination.
    pub fn nodes(&self, network: &RoadNetwork) -> Vec<NodeId> {
        std::iter::once(self.from)
            .chain(self.edges.iter().map(|e| network.edge_to[e.index()]))
            .collect()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
pub trait Router {
    /// Compute a route from `from` to `to`.
    ///
    /// `from == to` yields an empty route; an unreachable `to` yields
    /// [`SpatialError::NoRoute`].
    fn route(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
    ) -> Result<Route, SpatialError>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR multigraph.
///
/// Parallel edges are all relaxed, so the cheapest one wins.
#[derive(Debug, Clone, Copy)]
pub struct DijkstraRouter {
    pub speed_mps: f64,
}

impl DijkstraRouter {
    pub fn walking() -> Self {
        Self { speed_mps: WALK_SPEED_MPS }
    }
}

impl Default for DijkstraRouter {
    fn default() -> Self {
        Self::walking()
    }
}

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
    ) -> Result<Route, SpatialError> {
        for node in [from, to] {
            if !network.contains(node) {
                return Err(SpatialError::NodeNotFound(node));
            }
        }
        dijkstra(network, from, to, self.speed_mps)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

#[inline]
fn edge_cost_ms(network: &RoadNetwork, edge: EdgeId, speed_mps: f64) -> u64 {
    (network.edge_length_m[edge.index()] / speed_mps * 1000.0).round() as u64
}

fn dijkstra(
    network:   &RoadNetwork,
    from:      NodeId,
    to:        NodeId,
    speed_mps: f64,
) -> Result<Route, SpatialError> {
    if from == to {
        return Ok(Route { from, edges: vec![], total_travel_secs: 0.0, total_length_m: 0.0 });
    }

    let n = network.node_count();
    let mut dist      = vec![u64::MAX; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0;

    // Min-heap: (cost, node). Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_edge, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost.saturating_add(edge_cost_ms(network, edge, speed_mps));

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(
    network:   &RoadNetwork,
    prev_edge: &[EdgeId],
    from:      NodeId,
    to:        NodeId,
    total_ms:  u64,
) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();
    let total_length_m = edges.iter().map(|e| network.edge_length_m[e.index()]).sum();
    Route {
        from,
        edges,
        total_travel_secs: total_ms as f64 / 1000.0,
        total_length_m,
    }
}
