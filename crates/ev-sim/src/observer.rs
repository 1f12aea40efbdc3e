//! Run observer trait for progress reporting and streaming output.

use ev_core::Step;

use crate::{AgentRecord, ModelRecord};

/// Callbacks invoked by [`Evacuation::step_with`][crate::Evacuation::step_with]
/// and [`Evacuation::run_with`][crate::Evacuation::run_with].
///
/// All methods default to no-ops.
///
/// # Example — progress logger
///
/// ```rust,ignore
/// struct Progress;
///
/// impl SimObserver for Progress {
///     fn on_step_end(&mut self, step: Step, moved: usize) {
///         log::info!("{step}: {moved} agents moved");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the start of each step, before collection.
    fn on_step_start(&mut self, _step: Step) {}

    /// Called right after the collector has recorded `step`.
    ///
    /// `agents` holds one record per agent in `AgentId` order.
    fn on_record(&mut self, _step: Step, _model: &ModelRecord, _agents: &[AgentRecord]) {}

    /// Called after every agent has been activated.
    ///
    /// `moved` counts agents whose node changed this step.
    fn on_step_end(&mut self, _step: Step, _moved: usize) {}

    /// Called once at the end of [`run_with`][crate::Evacuation::run_with].
    ///
    /// `steps` is the total number of steps completed by the run.
    fn on_sim_end(&mut self, _steps: u64) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
