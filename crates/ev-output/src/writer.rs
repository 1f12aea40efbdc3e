//! The `OutputWriter` trait implemented by all backend writers.

use ev_sim::DataCollector;
use ev_spatial::RoadNetwork;

use crate::{AgentPositionRow, ModelSeriesRow, OutputResult};

/// Trait implemented by the CSV and SQLite writers.
pub trait OutputWriter {
    /// Write a batch of agent position rows.
    fn write_positions(&mut self, rows: &[AgentPositionRow]) -> OutputResult<()>;

    /// Write one model-series row.
    fn write_model(&mut self, row: &ModelSeriesRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Write everything `collector` holds to `writer`, step by step, and finish.
pub fn export_series<W: OutputWriter>(
    writer:    &mut W,
    network:   &RoadNetwork,
    collector: &DataCollector,
) -> OutputResult<()> {
    let series = collector.agent_series();
    for model in collector.model_series() {
        let rows: Vec<AgentPositionRow> = series
            .at_step(model.step)
            .iter()
            .map(|r| AgentPositionRow::from_record(r, network))
            .collect();
        writer.write_positions(&rows)?;
        writer.write_model(&ModelSeriesRow::from(model))?;
    }
    writer.finish()
}
