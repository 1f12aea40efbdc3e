//! Fluent builder for constructing an [`Evacuation`].

use ev_agent::{NavContext, Navigator};
use ev_core::{AgentId, NodeId, SimRng, Step};
use ev_hazard::{CandidateSet, HazardFilter, HazardZone};
use ev_spatial::{NetworkGrid, RoadNetwork};

use crate::{Agent, DataCollector, Evacuation, RandomActivation, RunState, SimError, SimResult};

enum TargetChoice {
    External(i64),
    Node(NodeId),
}

/// Fluent builder for [`Evacuation<N>`].
///
/// # Required inputs
///
/// - [`RoadNetwork`] — the walkable network
/// - [`HazardZone`] — who is at risk
/// - [`CandidateSet`] — proposed start points
/// - `N: Navigator` — how agents move (e.g. [`ev_agent::ShortestPathNavigator`])
///
/// # Optional inputs
///
/// | Method                | Default                                    |
/// |-----------------------|--------------------------------------------|
/// | `.target(id)`         | Uniformly random node from the seeded RNG  |
/// | `.target_node(node)`  | (same)                                     |
/// | `.seed(s)`            | Fresh entropy (logged, so a run can be replayed) |
///
/// # Example
///
/// ```rust,ignore
/// let mut run = EvacuationBuilder::new(network, hazard, candidates, ShortestPathNavigator::walking())
///     .target(3_402_118_772)
///     .seed(7)
///     .build()?;
/// ```
pub struct EvacuationBuilder<N: Navigator> {
    network:    RoadNetwork,
    hazard:     HazardZone,
    candidates: CandidateSet,
    navigator:  N,
    target:     Option<TargetChoice>,
    seed:       Option<u64>,
}

impl<N: Navigator> EvacuationBuilder<N> {
    pub fn new(
        network:    RoadNetwork,
        hazard:     HazardZone,
        candidates: CandidateSet,
        navigator:  N,
    ) -> Self {
        Self {
            network,
            hazard,
            candidates,
            navigator,
            target: None,
            seed:   None,
        }
    }

    /// Evacuate to the node with this external id (as in the network source).
    pub fn target(mut self, external_id: i64) -> Self {
        self.target = Some(TargetChoice::External(external_id));
        self
    }

    /// Evacuate to this node.
    pub fn target_node(mut self, node: NodeId) -> Self {
        self.target = Some(TargetChoice::Node(node));
        self
    }

    /// Seed for every random choice in the run.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Filter, choose the target, place agents, and plan their routes.
    ///
    /// # Errors
    ///
    /// Every failure here is a construction failure; see [`SimError`].
    pub fn build(self) -> SimResult<Evacuation<N>> {
        let Self { network, hazard, candidates, navigator, target, seed } = self;

        if network.is_empty() {
            return Err(SimError::EmptyNetwork);
        }
        if candidates.is_empty() {
            return Err(SimError::NoCandidates);
        }

        // ── Hazard filter ─────────────────────────────────────────────────
        let hazard = HazardFilter::new(&hazard)?;
        let kept = hazard.apply(&candidates)?;
        if kept.is_empty() {
            return Err(SimError::NoAgentsInHazard { candidates: candidates.len() });
        }

        // ── Target ────────────────────────────────────────────────────────
        let mut rng = match seed {
            Some(s) => SimRng::new(s),
            None => SimRng::from_entropy(),
        };
        let target = match target {
            Some(TargetChoice::External(id)) => network
                .node_by_external_id(id)
                .ok_or_else(|| SimError::InvalidTarget(id.to_string()))?,
            Some(TargetChoice::Node(node)) => {
                if !network.contains(node) {
                    return Err(SimError::InvalidTarget(node.to_string()));
                }
                node
            }
            None => NodeId(rng.gen_range(0..network.node_count() as u32)),
        };

        // ── Placement ─────────────────────────────────────────────────────
        let mut grid = NetworkGrid::new(&network);
        let mut schedule = RandomActivation::new(rng);
        let mut agents = Vec::with_capacity(kept.len());

        for (i, origin) in kept.into_iter().enumerate() {
            let id = AgentId(i as u32);
            let pos = network.nearest_node(origin.position).ok_or(SimError::EmptyNetwork)?;
            grid.place_agent(id, pos)?;
            schedule.add(id);

            let ctx = NavContext::new(Step::ZERO, &network, &grid, target);
            let nav = navigator
                .plan(id, pos, &ctx)
                .map_err(|source| SimError::Placement { agent: id, source })?;
            agents.push(Agent { id, pos, origin, nav });
        }

        log::info!(
            "placed {} agents from {} candidates; target {} (external id {}); seed {}",
            agents.len(),
            candidates.len(),
            target,
            network.external_id(target).unwrap_or(-1),
            schedule.seed(),
        );

        Ok(Evacuation {
            collector: DataCollector::new(agents.len()),
            network,
            hazard,
            target,
            agents,
            grid,
            navigator,
            schedule,
            state: RunState::NotStarted,
        })
    }
}
