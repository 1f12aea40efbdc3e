//! The `Navigator` trait — the route/movement extension point.

use ev_core::{AgentId, NodeId, SimRng};

use crate::{NavContext, NavResult};

/// Pluggable route planning and movement.
///
/// The run owns one `Self::State` per agent and hands it back on every call,
/// so implementations keep no per-agent data themselves.
///
/// # Contract
///
/// - [`plan`][Self::plan] is called exactly once per agent, right after the
///   agent is placed on its start node.  An error aborts construction.
/// - [`advance`][Self::advance] is called exactly once per agent per step and
///   returns the agent's node after this unit of time (its current node if
///   it did not move).  The node must exist in `ctx.network`.  An error
///   fails the whole step.
///
/// Randomness must come from `rng`, the run's single seeded source; anything
/// else breaks run reproducibility.
pub trait Navigator {
    /// Per-agent navigation state.
    type State;

    fn plan(
        &self,
        agent: AgentId,
        pos:   NodeId,
        ctx:   &NavContext<'_>,
    ) -> NavResult<Self::State>;

    fn advance(
        &self,
        agent: AgentId,
        pos:   NodeId,
        state: &mut Self::State,
        ctx:   &NavContext<'_>,
        rng:   &mut SimRng,
    ) -> NavResult<NodeId>;
}
