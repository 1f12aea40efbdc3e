//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph is a directed **multigraph** in Compressed Sparse Row (CSR)
//! format.  Given a `NodeId n`, its outgoing edges occupy the `EdgeId` range
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! Edges are sorted by `(from, to, key)`.  Parallel edges between the same
//! pair of nodes are distinguished by `key`, numbered from 0 in insertion
//! order unless the source supplies explicit keys.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  It is
//! bulk-loaded once in [`RoadNetworkBuilder::build`] and never updated.

use std::collections::{HashMap, HashSet};

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ev_core::{EdgeId, GeoPoint, NodeId};

use crate::{SpatialError, SpatialResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Good enough for snapping
    /// a start point to its nearest node within one town.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road multigraph in CSR format plus a spatial index for node
/// snapping.
///
/// Topology is fixed after [`RoadNetworkBuilder::build`]; nothing here is
/// mutated during a run.  Node occupancy lives in
/// [`NetworkGrid`](crate::NetworkGrid).
#[derive(Debug)]
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// External identifier of each node (OSM id, CSV id).  Indexed by `NodeId`.
    pub node_external_id: Vec<i64>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    pub edge_from: Vec<NodeId>,
    pub edge_to:   Vec<NodeId>,

    /// Parallel-edge key; `(from, to, key)` is unique.
    pub edge_key: Vec<u32>,

    /// Length of each edge in metres.
    pub edge_length_m: Vec<f64>,

    external_index: HashMap<i64, NodeId>,
    spatial_idx:    RTree<NodeEntry>,
}

impl RoadNetwork {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// `true` if `node` is a node of this network.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// All node ids in index order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_count() as u32).map(NodeId)
    }

    /// Position of `node`, or `None` if it is not in the network.
    #[inline]
    pub fn position(&self, node: NodeId) -> Option<GeoPoint> {
        self.node_pos.get(node.index()).copied()
    }

    // ── External ids ──────────────────────────────────────────────────────

    /// External id of `node` (the id used by the source file).
    #[inline]
    pub fn external_id(&self, node: NodeId) -> Option<i64> {
        self.node_external_id.get(node.index()).copied()
    }

    /// Resolve an external id to the dense `NodeId`.
    pub fn node_by_external_id(&self, external: i64) -> Option<NodeId> {
        self.external_index.get(&external).copied()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// A contiguous index range; nothing is allocated.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node`, counting parallel edges separately.
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// All parallel edges from `from` to `to`, in key order.
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(from).filter(move |e| self.edge_to[e.index()] == to)
    }

    /// Lat/lon bounding box `(min, max)` of all nodes, or `None` if empty.
    pub fn bounds(&self) -> Option<(GeoPoint, GeoPoint)> {
        let first = *self.node_pos.first()?;
        Some(self.node_pos.iter().fold((first, first), |(lo, hi), p| {
            (
                GeoPoint::new(lo.lat.min(p.lat), lo.lon.min(p.lon)),
                GeoPoint::new(hi.lat.max(p.lat), hi.lon.max(p.lon)),
            )
        }))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest road node to `pos`.
    ///
    /// Equidistant nodes resolve to the lowest `NodeId`.  Returns `None` only
    /// if the network has no nodes.
    pub fn nearest_node(&self, pos: GeoPoint) -> Option<NodeId> {
        let mut iter = self
            .spatial_idx
            .nearest_neighbor_iter_with_distance_2(&[pos.lat, pos.lon]);
        let (first, best_d2) = iter.next()?;
        let mut best = first.id;
        for (entry, d2) in iter {
            if d2 > best_d2 {
                break;
            }
            best = best.min(entry.id);
        }
        Some(best)
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Nodes and edges may be added in any order.  `build()` validates the whole
/// graph, sorts edges for the CSR arrays, and bulk-loads the R-tree.  Any
/// invalid node or edge fails the build; there is no partial network.
///
/// # Example
///
/// ```
/// use ev_core::GeoPoint;
/// use ev_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(53.480, -2.240));
/// let c = b.add_node(GeoPoint::new(53.481, -2.240));
/// b.add_road(a, c, 111.0);
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
#[derive(Default)]
pub struct RoadNetworkBuilder {
    nodes:        Vec<GeoPoint>,
    external_ids: Vec<i64>,
    raw_edges:    Vec<RawEdge>,
    /// Next automatic key per `(from, to)` pair.
    next_key:     HashMap<(NodeId, NodeId), u32>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    key:      u32,
    length_m: f64,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:        Vec::with_capacity(nodes),
            external_ids: Vec::with_capacity(nodes),
            raw_edges:    Vec::with_capacity(edges),
            next_key:     HashMap::new(),
        }
    }

    /// Add a node whose external id equals its index, and return its
    /// `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.external_ids.push(id.0 as i64);
        id
    }

    /// Add a node carrying the source's identifier.  Duplicate external ids
    /// are reported by [`build`](Self::build).
    pub fn add_node_with_id(&mut self, external: i64, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.external_ids.push(external);
        id
    }

    /// Add a **directed** edge, assigning the next free parallel-edge key for
    /// this `(from, to)` pair.  Returns the key.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) -> u32 {
        let slot = self.next_key.entry((from, to)).or_insert(0);
        let key = *slot;
        *slot += 1;
        self.raw_edges.push(RawEdge { from, to, key, length_m });
        key
    }

    /// Add a directed edge with an explicit key from the source.
    pub fn add_keyed_edge(&mut self, from: NodeId, to: NodeId, key: u32, length_m: f64) {
        let slot = self.next_key.entry((from, to)).or_insert(0);
        *slot = (*slot).max(key.saturating_add(1));
        self.raw_edges.push(RawEdge { from, to, key, length_m });
    }

    /// Convenience: add edges in **both directions** for an undirected road
    /// segment.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64) {
        self.add_directed_edge(a, b, length_m);
        self.add_directed_edge(b, a, length_m);
    }

    /// Position of a node added earlier, if any (used by loaders to derive
    /// edge lengths).
    pub fn node_pos(&self, id: NodeId) -> Option<GeoPoint> {
        self.nodes.get(id.index()).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Validate and consume the builder, producing a [`RoadNetwork`].
    ///
    /// Time complexity: O(E log E) for edge sort + O(N log N) for R-tree bulk
    /// load, where N = nodes, E = edges.
    pub fn build(self) -> SpatialResult<RoadNetwork> {
        let node_count = self.nodes.len();

        // ── Validate nodes ────────────────────────────────────────────────
        let mut external_index = HashMap::with_capacity(node_count);
        for (i, (&pos, &external)) in self.nodes.iter().zip(&self.external_ids).enumerate() {
            if !pos.is_valid() {
                return Err(SpatialError::InvalidNode { external, pos });
            }
            if external_index.insert(external, NodeId(i as u32)).is_some() {
                return Err(SpatialError::DuplicateNode(external));
            }
        }

        // ── Validate edges ────────────────────────────────────────────────
        let mut seen: HashSet<(NodeId, NodeId, u32)> = HashSet::with_capacity(self.raw_edges.len());
        for e in &self.raw_edges {
            for end in [e.from, e.to] {
                if end.index() >= node_count {
                    return Err(SpatialError::NodeNotFound(end));
                }
            }
            if !e.length_m.is_finite() || e.length_m < 0.0 {
                return Err(SpatialError::InvalidEdge {
                    from:   e.from,
                    to:     e.to,
                    reason: format!("length {} is not a finite non-negative number", e.length_m),
                });
            }
            if !seen.insert((e.from, e.to, e.key)) {
                return Err(SpatialError::DuplicateEdge { from: e.from, to: e.to, key: e.key });
            }
        }

        // Sort edges by (source, target, key) for CSR construction.
        let mut raw = self.raw_edges;
        raw.sort_unstable_by_key(|e| (e.from.0, e.to.0, e.key));

        let edge_from:     Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_key:      Vec<u32>    = raw.iter().map(|e| e.key).collect();
        let edge_length_m: Vec<f64>    = raw.iter().map(|e| e.length_m).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.lat, pos.lon],
                id:    NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        Ok(RoadNetwork {
            node_pos: self.nodes,
            node_external_id: self.external_ids,
            node_out_start,
            edge_from,
            edge_to,
            edge_key,
            edge_length_m,
            external_index,
            spatial_idx,
        })
    }
}
