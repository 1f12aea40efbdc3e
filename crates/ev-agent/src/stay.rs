//! A navigator whose agents never move.

use ev_core::{AgentId, NodeId, SimRng};

use crate::{NavContext, NavResult, Navigator};

/// Agents stay on their start node forever.
///
/// Useful in tests, and for measuring how many people start at the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct StayPut;

impl Navigator for StayPut {
    type State = ();

    fn plan(&self, _agent: AgentId, _pos: NodeId, _ctx: &NavContext<'_>) -> NavResult<()> {
        Ok(())
    }

    fn advance(
        &self,
        _agent: AgentId,
        pos:    NodeId,
        _state: &mut (),
        _ctx:   &NavContext<'_>,
        _rng:   &mut SimRng,
    ) -> NavResult<NodeId> {
        Ok(pos)
    }
}
