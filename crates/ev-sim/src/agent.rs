//! A simulated person.

use ev_core::{AgentId, NodeId};
use ev_hazard::FilteredCandidate;

/// One evacuee.  Created once at placement and never removed.
///
/// `S` is the navigator's per-agent state; the run owns it and passes it to
/// the navigator on every activation.
#[derive(Debug, Clone)]
pub struct Agent<S> {
    pub id:     AgentId,
    /// Current node.  Always a node of the run's network.
    pub pos:    NodeId,
    /// The candidate this agent was created from.
    pub origin: FilteredCandidate,
    pub(crate) nav: S,
}

impl<S> Agent<S> {
    pub fn nav_state(&self) -> &S {
        &self.nav
    }
}
