//! Random activation: every agent once per step, in a fresh order each time.

use ev_core::{AgentId, SimRng, Step};

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Built; no step taken yet.
    NotStarted,
    /// Inside `step()`.
    StepInProgress { step: Step },
    /// `steps` steps have completed.
    Completed { steps: u64 },
    /// A step failed.  The run accepts no further steps.
    Failed { step: Step },
}

/// Per-step activation order drawn from the run's single seeded source.
///
/// Each permutation is drawn from the registered agents in id order, so no
/// ordering carries over from one step to the next.
#[derive(Debug)]
pub struct RandomActivation {
    rng:    SimRng,
    agents: Vec<AgentId>,
    steps:  u64,
}

impl RandomActivation {
    pub fn new(rng: SimRng) -> Self {
        Self { rng, agents: Vec::new(), steps: 0 }
    }

    /// Register `agent` for activation from the next step on.
    pub fn add(&mut self, agent: AgentId) {
        self.agents.push(agent);
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Completed steps so far; also the index of the next step.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn current_step(&self) -> Step {
        Step(self.steps)
    }

    /// A fresh uniformly random permutation of all registered agents.
    pub fn permutation(&mut self) -> Vec<AgentId> {
        let mut order = self.agents.clone();
        order.sort_unstable();
        self.rng.shuffle(&mut order);
        order
    }

    pub(crate) fn advance(&mut self) {
        self.steps += 1;
    }

    pub fn rng_mut(&mut self) -> &mut SimRng {
        &mut self.rng
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}
