//! Progress logging layered over another observer.

use ev_core::Step;
use ev_sim::{AgentRecord, ModelRecord, SimObserver};

/// Forwards every hook to `inner` and logs progress about ten times a run.
pub struct Progress<O: SimObserver> {
    inner:     O,
    every:     u64,
    evacuated: usize,
    agents:    usize,
}

impl<O: SimObserver> Progress<O> {
    pub fn new(inner: O, total_steps: u64) -> Self {
        Self { inner, every: (total_steps / 10).max(1), evacuated: 0, agents: 0 }
    }

    pub fn inner_mut(&mut self) -> &mut O {
        &mut self.inner
    }
}

impl<O: SimObserver> SimObserver for Progress<O> {
    fn on_step_start(&mut self, step: Step) {
        self.inner.on_step_start(step);
    }

    fn on_record(&mut self, step: Step, model: &ModelRecord, agents: &[AgentRecord]) {
        self.evacuated = model.evacuated;
        self.agents = agents.len();
        self.inner.on_record(step, model, agents);
    }

    fn on_step_end(&mut self, step: Step, moved: usize) {
        if step.0 % self.every == 0 {
            log::info!("{step}: {}/{} at target, {moved} moved", self.evacuated, self.agents);
        }
        self.inner.on_step_end(step, moved);
    }

    fn on_sim_end(&mut self, steps: u64) {
        self.inner.on_sim_end(steps);
    }
}
