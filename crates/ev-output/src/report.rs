//! Aggregate metrics over a collected run.

use std::fmt;

use ev_core::Step;
use ev_sim::DataCollector;

/// Headline numbers for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvacuationSummary {
    pub agents:          usize,
    pub steps_recorded:  usize,
    /// Agents at the target at the last recorded step.
    pub final_evacuated: usize,
    pub peak_evacuated:  usize,
    /// First recorded step at which every agent was at the target.
    pub all_evacuated_at: Option<Step>,
}

impl EvacuationSummary {
    pub fn from_collector(collector: &DataCollector) -> Self {
        let agents = collector.agent_series().agent_count();
        let model = collector.model_series();
        Self {
            agents,
            steps_recorded:   model.len(),
            final_evacuated:  model.last().map_or(0, |m| m.evacuated),
            peak_evacuated:   model.iter().map(|m| m.evacuated).max().unwrap_or(0),
            all_evacuated_at: model
                .iter()
                .find(|m| agents > 0 && m.evacuated == agents)
                .map(|m| m.step),
        }
    }

    /// Share of agents at the target at the last recorded step.
    pub fn evacuated_fraction(&self) -> f64 {
        if self.agents == 0 {
            return 0.0;
        }
        self.final_evacuated as f64 / self.agents as f64
    }
}

impl fmt::Display for EvacuationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} agents evacuated after {} recorded steps ({:.1}%), peak {}",
            self.final_evacuated,
            self.agents,
            self.steps_recorded,
            self.evacuated_fraction() * 100.0,
            self.peak_evacuated,
        )?;
        match self.all_evacuated_at {
            Some(step) => write!(f, ", everyone out by {step}"),
            None => Ok(()),
        }
    }
}
