//! Shortest-path walking: the default navigator.
//!
//! # Behaviour
//!
//! - **Planning**: the fastest walking path from the agent's node to the
//!   target, via the configured [`Router`] (Dijkstra at 1.4 m/s by default).
//! - **Movement**: one node along the path per activation, whatever the edge
//!   length.
//! - **Arrival**: an agent on the target stays there.  Combined with the
//!   rule above this makes the number of agents at the target
//!   non-decreasing over a run.
//! - **Re-planning**: if the agent is not where its path says it should be,
//!   the path is recomputed from its actual node.
//! - **No path**: [`NavError::NoRoute`].  There is no fallback.

use ev_core::{AgentId, NodeId, SimRng};
use ev_spatial::{DijkstraRouter, Router, SpatialError};

use crate::{NavContext, NavError, NavResult, Navigator};

/// Per-agent state for [`ShortestPathNavigator`].
#[derive(Debug, Clone, PartialEq)]
pub struct PathState {
    /// Nodes from the planning origin to the target, inclusive.
    pub path:   Vec<NodeId>,
    /// Index into `path` of the node the agent is on.
    pub cursor: usize,
}

impl PathState {
    /// Nodes still to visit, excluding the current one.
    pub fn remaining(&self) -> &[NodeId] {
        self.path.get(self.cursor + 1..).unwrap_or(&[])
    }
}

/// Walks each agent along its precomputed fastest path.
#[derive(Debug, Clone, Default)]
pub struct ShortestPathNavigator<R: Router = DijkstraRouter> {
    pub router: R,
}

impl ShortestPathNavigator<DijkstraRouter> {
    /// Dijkstra at walking speed.
    pub fn walking() -> Self {
        Self { router: DijkstraRouter::walking() }
    }
}

impl<R: Router> ShortestPathNavigator<R> {
    pub fn with_router(router: R) -> Self {
        Self { router }
    }

    fn plan_from(&self, agent: AgentId, pos: NodeId, ctx: &NavContext<'_>) -> NavResult<PathState> {
        let route = match self.router.route(ctx.network, pos, ctx.target) {
            Ok(route) => route,
            Err(SpatialError::NoRoute { from, to }) => {
                return Err(NavError::NoRoute { agent, from, to });
            }
            Err(e) => return Err(e.into()),
        };
        Ok(PathState { path: route.nodes(ctx.network), cursor: 0 })
    }
}

impl<R: Router> Navigator for ShortestPathNavigator<R> {
    type State = PathState;

    fn plan(&self, agent: AgentId, pos: NodeId, ctx: &NavContext<'_>) -> NavResult<PathState> {
        self.plan_from(agent, pos, ctx)
    }

    fn advance(
        &self,
        agent: AgentId,
        pos:   NodeId,
        state: &mut PathState,
        ctx:   &NavContext<'_>,
        _rng:  &mut SimRng,
    ) -> NavResult<NodeId> {
        if pos == ctx.target {
            return Ok(pos);
        }
        if state.path.get(state.cursor) != Some(&pos) || state.remaining().is_empty() {
            log::debug!("{agent} off its path at {pos}; re-planning");
            *state = self.plan_from(agent, pos, ctx)?;
        }
        match state.remaining().first() {
            Some(&next) => {
                state.cursor += 1;
                Ok(next)
            }
            None => Ok(pos),
        }
    }
}
