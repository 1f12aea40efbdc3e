//! Unit tests for ev-spatial.
//!
//! All tests use a hand-crafted network so they run without any map file.

#[cfg(test)]
mod helpers {
    use ev_core::{GeoPoint, NodeId};
    use crate::{RoadNetwork, RoadNetworkBuilder};

    /// Build a small grid network for testing.
    ///
    /// Nodes (lat, lon):
    ///   0:(0,0)  1:(0,1)  2:(0,2)
    ///   3:(1,0)           4:(1,2)
    ///
    /// Undirected edges: 0-1, 1-2, 0-3, 2-4, 3-4
    ///
    /// Shortest path 0→4 (by length):
    ///   0→1→2→4 = 300 m  vs  0→3→4 = 600 m
    pub fn grid_network() -> (RoadNetwork, [NodeId; 5]) {
        let mut b = RoadNetworkBuilder::new();

        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 1.0));
        let n2 = b.add_node(GeoPoint::new(0.0, 2.0));
        let n3 = b.add_node(GeoPoint::new(1.0, 0.0));
        let n4 = b.add_node(GeoPoint::new(1.0, 2.0));

        b.add_road(n0, n1, 100.0);
        b.add_road(n1, n2, 100.0);
        b.add_road(n2, n4, 100.0);
        b.add_road(n0, n3, 500.0); // long road
        b.add_road(n3, n4, 100.0);

        (b.build().unwrap(), [n0, n1, n2, n3, n4])
    }
}

// ── Builder & network structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use ev_core::{GeoPoint, NodeId};
    use crate::{RoadNetworkBuilder, SpatialError};

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new().build().unwrap();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
        assert!(net.bounds().is_none());
    }

    #[test]
    fn single_road() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(53.0, -2.0));
        let c = b.add_node(GeoPoint::new(53.1, -2.0));
        b.add_road(a, c, 1_000.0);
        let net = b.build().unwrap();
        assert_eq!(net.node_count(), 2);
        assert_eq!(net.edge_count(), 2); // bidirectional
    }

    #[test]
    fn csr_out_degrees() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        assert_eq!(net.out_degree(n0), 2); // n0→n1, n0→n3
        assert_eq!(net.out_degree(n1), 2);
        assert_eq!(net.out_degree(n2), 2);
        assert_eq!(net.out_degree(n3), 2);
        assert_eq!(net.out_degree(n4), 2);
        for e in net.out_edges(n0) {
            assert_eq!(net.edge_from[e.index()], n0);
        }
    }

    #[test]
    fn parallel_edges_get_distinct_keys() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        assert_eq!(b.add_directed_edge(a, c, 100.0), 0);
        assert_eq!(b.add_directed_edge(a, c, 80.0), 1);
        let net = b.build().unwrap();

        let keys: Vec<u32> = net.edges_between(a, c).map(|e| net.edge_key[e.index()]).collect();
        assert_eq!(keys, vec![0, 1]);
        assert_eq!(net.out_degree(a), 2);
        assert_eq!(net.out_degree(c), 0);
    }

    #[test]
    fn explicit_key_advances_automatic_keys() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_keyed_edge(a, c, 3, 10.0);
        assert_eq!(b.add_directed_edge(a, c, 10.0), 4);
    }

    #[test]
    fn duplicate_key_rejected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_keyed_edge(a, c, 0, 10.0);
        b.add_keyed_edge(a, c, 0, 12.0);
        assert!(matches!(b.build(), Err(SpatialError::DuplicateEdge { key: 0, .. })));
    }

    #[test]
    fn dangling_edge_rejected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        b.add_directed_edge(a, NodeId(9), 10.0);
        assert!(matches!(b.build(), Err(SpatialError::NodeNotFound(NodeId(9)))));
    }

    #[test]
    fn negative_length_rejected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, -1.0);
        assert!(matches!(b.build(), Err(SpatialError::InvalidEdge { .. })));
    }

    #[test]
    fn invalid_position_rejected() {
        let mut b = RoadNetworkBuilder::new();
        b.add_node_with_id(77, GeoPoint::new(120.0, 0.0));
        assert!(matches!(b.build(), Err(SpatialError::InvalidNode { external: 77, .. })));
    }

    #[test]
    fn duplicate_external_id_rejected() {
        let mut b = RoadNetworkBuilder::new();
        b.add_node_with_id(5, GeoPoint::new(0.0, 0.0));
        b.add_node_with_id(5, GeoPoint::new(0.0, 1.0));
        assert!(matches!(b.build(), Err(SpatialError::DuplicateNode(5))));
    }

    #[test]
    fn external_ids_resolve() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node_with_id(9_001, GeoPoint::new(0.0, 0.0));
        let c = b.add_node_with_id(-4, GeoPoint::new(0.0, 1.0));
        let net = b.build().unwrap();
        assert_eq!(net.node_by_external_id(9_001), Some(a));
        assert_eq!(net.node_by_external_id(-4), Some(c));
        assert_eq!(net.node_by_external_id(1), None);
        assert_eq!(net.external_id(c), Some(-4));
    }

    #[test]
    fn bounds_cover_all_nodes() {
        let (net, _) = super::helpers::grid_network();
        let (lo, hi) = net.bounds().unwrap();
        assert_eq!(lo, GeoPoint::new(0.0, 0.0));
        assert_eq!(hi, GeoPoint::new(1.0, 2.0));
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use ev_core::GeoPoint;
    use crate::RoadNetworkBuilder;

    #[test]
    fn snap_exact_position() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        assert_eq!(net.nearest_node(GeoPoint::new(0.0, 0.0)), Some(n0));
    }

    #[test]
    fn snap_nearest() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        assert_eq!(net.nearest_node(GeoPoint::new(0.0, 0.4)), Some(n0));
        assert_eq!(net.nearest_node(GeoPoint::new(0.0, 0.6)), Some(n1));
    }

    #[test]
    fn equidistant_resolves_to_lowest_index() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        // (0, 0.5) is exactly between n0 and n1.
        assert_eq!(net.nearest_node(GeoPoint::new(0.0, 0.5)), Some(n0));
        // (0.5, 0.5) is equidistant from n0, n1 and n3.
        assert_eq!(net.nearest_node(GeoPoint::new(0.5, 0.5)), Some(n0));
    }

    #[test]
    fn equidistant_prefers_lower_index_regardless_of_insert_order() {
        let mut b = RoadNetworkBuilder::new();
        let hi = b.add_node(GeoPoint::new(0.0, 1.0));
        let lo = b.add_node(GeoPoint::new(0.0, -1.0));
        let net = b.build().unwrap();
        assert_eq!(net.nearest_node(GeoPoint::new(0.0, 0.0)), Some(hi.min(lo)));
    }

    #[test]
    fn empty_network_returns_none() {
        let net = RoadNetworkBuilder::new().build().unwrap();
        assert!(net.nearest_node(GeoPoint::new(0.0, 0.0)).is_none());
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{load_network_reader, SpatialError};

    const NODES: &str = "id,lat,lon\n10,0.0,0.0\n20,0.0,0.001\n30,0.001,0.001\n";

    #[test]
    fn loads_nodes_and_edges() {
        let edges = "from,to,key,length_m\n10,20,0,111.0\n20,10,0,111.0\n20,30,0,\n";
        let net = load_network_reader(Cursor::new(NODES), Cursor::new(edges)).unwrap();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.edge_count(), 3);
        let n20 = net.node_by_external_id(20).unwrap();
        let n30 = net.node_by_external_id(30).unwrap();
        let e = net.edges_between(n20, n30).next().unwrap();
        // Missing length is derived from coordinates (~111 m for 0.001° lat).
        assert!((net.edge_length_m[e.index()] - 111.2).abs() < 0.5);
    }

    #[test]
    fn key_column_optional() {
        let edges = "from,to,length_m\n10,20,5.0\n10,20,6.0\n";
        let net = load_network_reader(Cursor::new(NODES), Cursor::new(edges)).unwrap();
        let (a, b) = (net.node_by_external_id(10).unwrap(), net.node_by_external_id(20).unwrap());
        assert_eq!(net.edges_between(a, b).count(), 2);
    }

    #[test]
    fn unknown_node_fails_whole_load() {
        let edges = "from,to,key,length_m\n10,20,0,1.0\n10,99,0,1.0\n";
        let err = load_network_reader(Cursor::new(NODES), Cursor::new(edges)).unwrap_err();
        assert!(matches!(err, SpatialError::UnknownExternalId(99)));
    }

    #[test]
    fn malformed_row_fails() {
        let nodes = "id,lat,lon\n10,0.0,zero\n";
        let err = load_network_reader(Cursor::new(nodes), Cursor::new("from,to\n")).unwrap_err();
        assert!(matches!(err, SpatialError::Parse(msg) if msg.contains("row 2")));
    }

    #[test]
    fn duplicate_node_id_fails() {
        let nodes = "id,lat,lon\n10,0.0,0.0\n10,0.0,1.0\n";
        let err = load_network_reader(Cursor::new(nodes), Cursor::new("from,to\n")).unwrap_err();
        assert!(matches!(err, SpatialError::DuplicateNode(10)));
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use ev_core::{GeoPoint, NodeId};
    use crate::{DijkstraRouter, RoadNetworkBuilder, Router, SpatialError};

    #[test]
    fn trivial_same_node() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let r = DijkstraRouter::walking().route(&net, n0, n0).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.nodes(&net), vec![n0]);
        assert_eq!(r.total_travel_secs, 0.0);
    }

    #[test]
    fn shortest_path_correct() {
        let (net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        let route = DijkstraRouter::walking().route(&net, n0, n4).unwrap();

        assert_eq!(route.nodes(&net), vec![n0, n1, n2, n4]);
        assert_eq!(route.total_length_m, 300.0);
        // 300 m at 1.4 m/s.
        assert!((route.total_travel_secs - 300.0 / 1.4).abs() < 0.01);
    }

    #[test]
    fn cheapest_parallel_edge_is_used() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0);
        b.add_directed_edge(a, c, 40.0);
        let net = b.build().unwrap();
        let route = DijkstraRouter::walking().route(&net, a, c).unwrap();
        assert_eq!(route.edges.len(), 1);
        assert_eq!(net.edge_key[route.edges[0].index()], 1);
        assert_eq!(route.total_length_m, 40.0);
    }

    #[test]
    fn no_route_disconnected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(1.0, 0.0));
        let net = b.build().unwrap();
        let result = DijkstraRouter::walking().route(&net, a, c);
        assert!(matches!(result, Err(SpatialError::NoRoute { .. })));
    }

    #[test]
    fn directed_one_way_blocks_return() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0);
        let net = b.build().unwrap();
        assert!(DijkstraRouter::walking().route(&net, a, c).is_ok());
        assert!(DijkstraRouter::walking().route(&net, c, a).is_err());
    }

    #[test]
    fn unknown_node_is_an_error() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let result = DijkstraRouter::walking().route(&net, n0, NodeId(50));
        assert!(matches!(result, Err(SpatialError::NodeNotFound(NodeId(50)))));
    }
}

// ── Occupancy ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use ev_core::{AgentId, NodeId};
    use crate::{NetworkGrid, SpatialError};

    #[test]
    fn place_and_move() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        let mut grid = NetworkGrid::new(&net);
        grid.place_agent(AgentId(0), n0).unwrap();
        grid.place_agent(AgentId(1), n0).unwrap();
        assert_eq!(grid.occupants(n0), &[AgentId(0), AgentId(1)]);

        grid.move_agent(AgentId(0), n0, n1).unwrap();
        assert_eq!(grid.occupants(n0), &[AgentId(1)]);
        assert_eq!(grid.occupants(n1), &[AgentId(0)]);
        assert_eq!(grid.agent_count(), 2);
        assert_eq!(grid.occupied_nodes().collect::<Vec<_>>(), vec![n0, n1]);
    }

    #[test]
    fn move_to_same_node_is_noop() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let mut grid = NetworkGrid::new(&net);
        grid.place_agent(AgentId(3), n0).unwrap();
        grid.move_agent(AgentId(3), n0, n0).unwrap();
        assert_eq!(grid.occupancy(n0), 1);
    }

    #[test]
    fn unknown_node_rejected() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let mut grid = NetworkGrid::new(&net);
        assert!(matches!(
            grid.place_agent(AgentId(0), NodeId(99)),
            Err(SpatialError::NodeNotFound(_))
        ));
        grid.place_agent(AgentId(0), n0).unwrap();
        assert!(grid.move_agent(AgentId(0), n0, NodeId(99)).is_err());
        // A failed move leaves the agent where it was.
        assert_eq!(grid.occupants(n0), &[AgentId(0)]);
        assert_eq!(grid.occupancy(NodeId(99)), 0);
    }
}
