//! Read-only run state passed to every navigator call.

use ev_core::{NodeId, Step};
use ev_spatial::{NetworkGrid, RoadNetwork};

/// What a [`Navigator`](crate::Navigator) may look at.
///
/// Built by the run for each call; all borrows end before the run applies
/// the returned move.
pub struct NavContext<'a> {
    /// The step being executed ([`Step::ZERO`] during placement).
    pub step: Step,

    pub network: &'a RoadNetwork,

    /// Occupancy as of this activation, including moves already made by
    /// agents activated earlier in the same step.
    pub grid: &'a NetworkGrid,

    /// The evacuation destination, fixed for the run.
    pub target: NodeId,
}

impl<'a> NavContext<'a> {
    #[inline]
    pub fn new(step: Step, network: &'a RoadNetwork, grid: &'a NetworkGrid, target: NodeId) -> Self {
        Self { step, network, grid, target }
    }
}
