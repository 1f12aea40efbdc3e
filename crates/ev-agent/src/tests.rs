//! Unit tests for ev-agent.

#[cfg(test)]
mod helpers {
    use ev_core::{GeoPoint, NodeId};
    use ev_spatial::{RoadNetwork, RoadNetworkBuilder};

    /// Same shape as the ev-spatial test grid, plus an island node 5.
    ///
    ///   0 ─ 1 ─ 2
    ///   │       │
    ///   3 ───── 4        5 (no edges)
    ///
    /// Fastest 0→4 is 0→1→2→4 (300 m) rather than 0→3→4 (600 m).
    pub fn grid_network() -> (RoadNetwork, [NodeId; 6]) {
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 1.0));
        let n2 = b.add_node(GeoPoint::new(0.0, 2.0));
        let n3 = b.add_node(GeoPoint::new(1.0, 0.0));
        let n4 = b.add_node(GeoPoint::new(1.0, 2.0));
        let n5 = b.add_node(GeoPoint::new(5.0, 5.0));
        b.add_road(n0, n1, 100.0);
        b.add_road(n1, n2, 100.0);
        b.add_road(n2, n4, 100.0);
        b.add_road(n0, n3, 500.0);
        b.add_road(n3, n4, 100.0);
        (b.build().unwrap(), [n0, n1, n2, n3, n4, n5])
    }
}

// ── ShortestPathNavigator ─────────────────────────────────────────────────────

#[cfg(test)]
mod shortest {
    use ev_core::{AgentId, SimRng, Step};
    use ev_spatial::NetworkGrid;

    use super::helpers::grid_network;
    use crate::{NavContext, NavError, Navigator, PathState, ShortestPathNavigator};

    #[test]
    fn plan_follows_fastest_path() {
        let (net, [n0, n1, n2, _, n4, _]) = grid_network();
        let grid = NetworkGrid::new(&net);
        let ctx = NavContext::new(Step::ZERO, &net, &grid, n4);

        let state = ShortestPathNavigator::walking().plan(AgentId(0), n0, &ctx).unwrap();
        assert_eq!(state, PathState { path: vec![n0, n1, n2, n4], cursor: 0 });
        assert_eq!(state.remaining(), &[n1, n2, n4]);
    }

    #[test]
    fn one_node_per_activation_then_stays() {
        let (net, [n0, n1, n2, _, n4, _]) = grid_network();
        let grid = NetworkGrid::new(&net);
        let ctx = NavContext::new(Step(1), &net, &grid, n4);
        let nav = ShortestPathNavigator::walking();
        let mut rng = SimRng::new(0);

        let agent = AgentId(0);
        let mut state = nav.plan(agent, n0, &ctx).unwrap();
        let mut pos = n0;
        let mut visited = vec![];
        for _ in 0..5 {
            pos = nav.advance(agent, pos, &mut state, &ctx, &mut rng).unwrap();
            visited.push(pos);
        }
        assert_eq!(visited, vec![n1, n2, n4, n4, n4]);
    }

    #[test]
    fn start_on_target_never_moves() {
        let (net, [.., n4, _]) = grid_network();
        let grid = NetworkGrid::new(&net);
        let ctx = NavContext::new(Step(1), &net, &grid, n4);
        let nav = ShortestPathNavigator::walking();

        let mut state = nav.plan(AgentId(0), n4, &ctx).unwrap();
        assert!(state.remaining().is_empty());
        let next = nav.advance(AgentId(0), n4, &mut state, &ctx, &mut SimRng::new(0)).unwrap();
        assert_eq!(next, n4);
    }

    #[test]
    fn replans_when_off_path() {
        let (net, [n0, _, _, n3, n4, _]) = grid_network();
        let grid = NetworkGrid::new(&net);
        let ctx = NavContext::new(Step(1), &net, &grid, n4);
        let nav = ShortestPathNavigator::walking();

        let mut state = nav.plan(AgentId(0), n0, &ctx).unwrap();
        // Pretend the agent was moved to n3 by something else.
        let next = nav.advance(AgentId(0), n3, &mut state, &ctx, &mut SimRng::new(0)).unwrap();
        assert_eq!(next, n4);
        assert_eq!(state.path, vec![n3, n4]);
    }

    #[test]
    fn unreachable_target_is_an_error() {
        let (net, [n0, .., n5]) = grid_network();
        let grid = NetworkGrid::new(&net);
        let ctx = NavContext::new(Step::ZERO, &net, &grid, n5);

        let err = ShortestPathNavigator::walking().plan(AgentId(7), n0, &ctx).unwrap_err();
        match err {
            NavError::NoRoute { agent, from, to } => {
                assert_eq!(agent, AgentId(7));
                assert_eq!(from, n0);
                assert_eq!(to, n5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_target_is_a_spatial_error() {
        let (net, [n0, ..]) = grid_network();
        let grid = NetworkGrid::new(&net);
        let ctx = NavContext::new(Step::ZERO, &net, &grid, ev_core::NodeId(99));

        let err = ShortestPathNavigator::walking().plan(AgentId(0), n0, &ctx).unwrap_err();
        assert!(matches!(err, NavError::Spatial(_)));
    }
}

// ── StayPut ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stay {
    use ev_core::{AgentId, SimRng, Step};
    use ev_spatial::NetworkGrid;

    use super::helpers::grid_network;
    use crate::{NavContext, Navigator, StayPut};

    #[test]
    fn never_moves() {
        let (net, [n0, .., n4, _]) = grid_network();
        let grid = NetworkGrid::new(&net);
        let ctx = NavContext::new(Step(3), &net, &grid, n4);
        let mut state = StayPut.plan(AgentId(0), n0, &ctx).unwrap();
        let next = StayPut.advance(AgentId(0), n0, &mut state, &ctx, &mut SimRng::new(1)).unwrap();
        assert_eq!(next, n0);
    }
}
