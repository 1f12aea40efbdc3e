//! `SeriesOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use ev_core::Step;
use ev_sim::{AgentRecord, ModelRecord, SimObserver};
use ev_spatial::RoadNetwork;

use crate::row::{AgentPositionRow, ModelSeriesRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that writes each step's records as soon as they are
/// collected.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After the run returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SeriesOutputObserver<W: OutputWriter> {
    writer:       W,
    external_ids: Vec<i64>,
    last_error:   Option<OutputError>,
}

impl<W: OutputWriter> SeriesOutputObserver<W> {
    /// `network` is only read here, for the node external ids.
    pub fn new(writer: W, network: &RoadNetwork) -> Self {
        Self {
            writer,
            external_ids: network.node_external_id.clone(),
            last_error:   None,
        }
    }

    /// Take the stored write error (if any) after the run returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SeriesOutputObserver<W> {
    fn on_record(&mut self, _step: Step, model: &ModelRecord, agents: &[AgentRecord]) {
        let rows: Vec<AgentPositionRow> = agents
            .iter()
            .map(|r| AgentPositionRow {
                step:        r.step.0,
                agent_id:    r.agent.0,
                node:        r.position.0,
                external_id: self.external_ids.get(r.position.index()).copied().unwrap_or(-1),
                evacuated:   r.at_target,
            })
            .collect();

        let result = self.writer.write_positions(&rows);
        self.store_err(result);
        let result = self.writer.write_model(&ModelSeriesRow::from(model));
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _steps: u64) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
