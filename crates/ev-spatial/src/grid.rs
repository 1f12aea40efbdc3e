//! Node occupancy: which agents currently stand on which network node.
//!
//! Topology lives in [`RoadNetwork`] and is immutable; occupancy changes
//! every step, so it is kept in its own `NodeId`-indexed table owned by the
//! run.

use ev_core::{AgentId, NodeId};

use crate::{RoadNetwork, SpatialError, SpatialResult};

/// Per-node occupant lists, indexed by `NodeId`.
///
/// Within a node, occupants are kept in arrival order.
#[derive(Debug, Clone, Default)]
pub struct NetworkGrid {
    occupants: Vec<Vec<AgentId>>,
}

impl NetworkGrid {
    /// An empty grid sized for `network`.
    pub fn new(network: &RoadNetwork) -> Self {
        Self { occupants: vec![Vec::new(); network.node_count()] }
    }

    pub fn node_count(&self) -> usize {
        self.occupants.len()
    }

    /// Put `agent` on `node`.
    pub fn place_agent(&mut self, agent: AgentId, node: NodeId) -> SpatialResult<()> {
        self.occupants
            .get_mut(node.index())
            .ok_or(SpatialError::NodeNotFound(node))?
            .push(agent);
        Ok(())
    }

    /// Remove `agent` from `node`.  Returns `false` if it was not there.
    pub fn remove_agent(&mut self, agent: AgentId, node: NodeId) -> bool {
        let Some(list) = self.occupants.get_mut(node.index()) else {
            return false;
        };
        match list.iter().position(|&a| a == agent) {
            Some(i) => {
                list.remove(i);
                true
            }
            None => false,
        }
    }

    /// Move `agent` from `from` to `to`.  A move to the same node is a no-op.
    pub fn move_agent(&mut self, agent: AgentId, from: NodeId, to: NodeId) -> SpatialResult<()> {
        if from == to {
            return Ok(());
        }
        if to.index() >= self.occupants.len() {
            return Err(SpatialError::NodeNotFound(to));
        }
        self.remove_agent(agent, from);
        self.place_agent(agent, to)
    }

    /// Agents currently on `node` (empty for unknown nodes).
    pub fn occupants(&self, node: NodeId) -> &[AgentId] {
        self.occupants.get(node.index()).map_or(&[], Vec::as_slice)
    }

    /// Number of agents on `node`.
    #[inline]
    pub fn occupancy(&self, node: NodeId) -> usize {
        self.occupants(node).len()
    }

    /// Nodes with at least one occupant, in `NodeId` order.
    pub fn occupied_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.occupants
            .iter()
            .enumerate()
            .filter(|(_, list)| !list.is_empty())
            .map(|(i, _)| NodeId(i as u32))
    }

    /// Total number of placed agents.
    pub fn agent_count(&self) -> usize {
        self.occupants.iter().map(Vec::len).sum()
    }
}
