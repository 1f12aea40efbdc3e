use thiserror::Error;

use ev_agent::NavError;
use ev_core::{AgentId, NodeId, Step};
use ev_hazard::HazardError;
use ev_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("hazard error: {0}")]
    Hazard(#[from] HazardError),

    #[error("road network has no nodes")]
    EmptyNetwork,

    #[error("no candidate start points were supplied")]
    NoCandidates,

    #[error("none of the {candidates} candidate start points lie inside the hazard")]
    NoAgentsInHazard { candidates: usize },

    #[error("target {0} is not a node of the road network")]
    InvalidTarget(String),

    #[error("{agent}: initial route planning failed: {source}")]
    Placement {
        agent:  AgentId,
        #[source]
        source: NavError,
    },

    #[error("{agent} failed to move at {step}: {source}")]
    Navigation {
        agent:  AgentId,
        step:   Step,
        #[source]
        source: NavError,
    },

    #[error("{agent} moved to {node} at {step}, which is not a network node")]
    InvalidMove { agent: AgentId, step: Step, node: NodeId },

    #[error("run failed at {step}; rebuild the evacuation to continue")]
    RunFailed { step: Step },
}

pub type SimResult<T> = Result<T, SimError>;
