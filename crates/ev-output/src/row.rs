//! Plain data row types written by output backends.

use ev_sim::{AgentRecord, ModelRecord};
use ev_spatial::RoadNetwork;

/// One agent's node at the start of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentPositionRow {
    pub step:        u64,
    pub agent_id:    u32,
    /// Dense node index.
    pub node:        u32,
    /// The node's id in the network source; `-1` if unknown.
    pub external_id: i64,
    pub evacuated:   bool,
}

impl AgentPositionRow {
    pub fn from_record(record: &AgentRecord, network: &RoadNetwork) -> Self {
        Self {
            step:        record.step.0,
            agent_id:    record.agent.0,
            node:        record.position.0,
            external_id: network.external_id(record.position).unwrap_or(-1),
            evacuated:   record.at_target,
        }
    }
}

/// The model-level series: agents at the target at the start of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSeriesRow {
    pub step:      u64,
    pub evacuated: u64,
}

impl From<&ModelRecord> for ModelSeriesRow {
    fn from(record: &ModelRecord) -> Self {
        Self { step: record.step.0, evacuated: record.evacuated as u64 }
    }
}
