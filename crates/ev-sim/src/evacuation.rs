//! The `Evacuation` run object and its step loop.

use ev_agent::{NavContext, Navigator};
use ev_core::{NodeId, Step};
use ev_hazard::HazardFilter;
use ev_spatial::{NetworkGrid, RoadNetwork};

use crate::{
    Agent, DataCollector, ModelRecord, NoopObserver, RandomActivation, RunState, SimError,
    SimObserver, SimResult, TimeSeries,
};

/// One evacuation run.
///
/// Owns the network, the agents, their occupancy, and the collected series.
/// Agents reach the run only through the [`Navigator`], which sees a
/// read-only [`NavContext`] and returns the node to move to.
///
/// Create via [`EvacuationBuilder`][crate::EvacuationBuilder].
pub struct Evacuation<N: Navigator> {
    pub(crate) network:   RoadNetwork,
    pub(crate) hazard:    HazardFilter,
    pub(crate) target:    NodeId,
    pub(crate) agents:    Vec<Agent<N::State>>,
    pub(crate) grid:      NetworkGrid,
    pub(crate) navigator: N,
    pub(crate) schedule:  RandomActivation,
    pub(crate) collector: DataCollector,
    pub(crate) state:     RunState,
}

impl<N: Navigator> Evacuation<N> {
    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advance one step.
    pub fn step(&mut self) -> SimResult<()> {
        self.step_with(&mut NoopObserver)
    }

    /// Advance one step, reporting to `observer`.
    ///
    /// # Errors
    ///
    /// A navigator failure or an invalid move fails the step.  Agents
    /// activated before the failure keep their new nodes, and the run is left
    /// in [`RunState::Failed`]: every later call returns
    /// [`SimError::RunFailed`].
    pub fn step_with<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        if let RunState::Failed { step } = self.state {
            return Err(SimError::RunFailed { step });
        }
        let now = self.schedule.current_step();
        self.state = RunState::StepInProgress { step: now };
        observer.on_step_start(now);

        // ── ① Collect before anyone moves ─────────────────────────────────
        self.collector.collect(now, self.target, self.agents.iter().map(|a| (a.id, a.pos)));
        if let Some((model, records)) = self.collector.latest() {
            observer.on_record(now, model, records);
        }

        // ── ②③ Activate in a fresh random order ───────────────────────────
        let moved = match self.activate_all(now) {
            Ok(moved) => moved,
            Err(e) => {
                log::error!("{now} failed: {e}");
                self.state = RunState::Failed { step: now };
                return Err(e);
            }
        };

        self.schedule.advance();
        self.state = RunState::Completed { steps: self.schedule.steps() };
        log::debug!(
            "{now}: {moved} agents moved, {} at target",
            self.grid.occupancy(self.target),
        );
        observer.on_step_end(now, moved);
        Ok(())
    }

    /// Run `steps` steps in sequence and return the whole agent series.
    pub fn run(&mut self, steps: u64) -> SimResult<&TimeSeries> {
        self.run_with(steps, &mut NoopObserver)
    }

    /// [`run`][Self::run] with observer callbacks.
    ///
    /// `on_sim_end` fires only if every step succeeded.
    pub fn run_with<O: SimObserver>(&mut self, steps: u64, observer: &mut O) -> SimResult<&TimeSeries> {
        for _ in 0..steps {
            self.step_with(observer)?;
        }
        observer.on_sim_end(self.schedule.steps());
        Ok(self.collector.agent_series())
    }

    fn activate_all(&mut self, now: Step) -> SimResult<usize> {
        let order = self.schedule.permutation();
        let mut moved = 0;

        for id in order {
            let agent = &mut self.agents[id.index()];
            let from = agent.pos;

            let next = {
                let ctx = NavContext::new(now, &self.network, &self.grid, self.target);
                self.navigator
                    .advance(id, from, &mut agent.nav, &ctx, self.schedule.rng_mut())
                    .map_err(|source| SimError::Navigation { agent: id, step: now, source })?
            };
            if !self.network.contains(next) {
                return Err(SimError::InvalidMove { agent: id, step: now, node: next });
            }
            if next != from {
                self.grid.move_agent(id, from, next)?;
                agent.pos = next;
                moved += 1;
            }
        }
        Ok(moved)
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    /// The hazard in the network's frame.
    pub fn hazard(&self) -> &HazardFilter {
        &self.hazard
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Agents in `AgentId` order.
    pub fn agents(&self) -> &[Agent<N::State>] {
        &self.agents
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn grid(&self) -> &NetworkGrid {
        &self.grid
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Completed steps.
    pub fn steps_taken(&self) -> u64 {
        self.schedule.steps()
    }

    /// The seed behind every random choice in this run.
    pub fn seed(&self) -> u64 {
        self.schedule.seed()
    }

    /// Agents on the target node right now.
    pub fn evacuated(&self) -> usize {
        self.grid.occupancy(self.target)
    }

    pub fn collector(&self) -> &DataCollector {
        &self.collector
    }

    pub fn model_series(&self) -> &[ModelRecord] {
        self.collector.model_series()
    }

    pub fn agent_series(&self) -> &TimeSeries {
        self.collector.agent_series()
    }
}
