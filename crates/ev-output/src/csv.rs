//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `agent_positions.csv` — `step,agent_id,node,external_id,evacuated`
//! - `model_series.csv` — `step,evacuated`

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentPositionRow, ModelSeriesRow, OutputError, OutputResult};

pub const POSITIONS_FILE: &str = "agent_positions.csv";
pub const MODEL_FILE: &str = "model_series.csv";

/// Writes the two series as CSV.
///
/// Generic over the sink so that runs can be compared in memory.
pub struct CsvWriter<W: Write = File> {
    positions: Writer<W>,
    model:     Writer<W>,
    finished:  bool,
}

impl CsvWriter<File> {
    /// Create (or truncate) the two CSV files in `dir` and write the headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        Self::from_writers(
            File::create(dir.join(POSITIONS_FILE))?,
            File::create(dir.join(MODEL_FILE))?,
        )
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn from_writers(positions: W, model: W) -> OutputResult<Self> {
        let mut positions = Writer::from_writer(positions);
        positions.write_record(["step", "agent_id", "node", "external_id", "evacuated"])?;

        let mut model = Writer::from_writer(model);
        model.write_record(["step", "evacuated"])?;

        Ok(Self { positions, model, finished: false })
    }

    /// Flush and hand back the two sinks (positions, model).
    pub fn into_inner(mut self) -> OutputResult<(W, W)> {
        self.finish()?;
        let positions = self.positions.into_inner().map_err(|e| OutputError::Io(e.into_error()))?;
        let model = self.model.into_inner().map_err(|e| OutputError::Io(e.into_error()))?;
        Ok((positions, model))
    }
}

impl<W: Write> OutputWriter for CsvWriter<W> {
    fn write_positions(&mut self, rows: &[AgentPositionRow]) -> OutputResult<()> {
        for row in rows {
            self.positions.write_record(&[
                row.step.to_string(),
                row.agent_id.to_string(),
                row.node.to_string(),
                row.external_id.to_string(),
                (row.evacuated as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_model(&mut self, row: &ModelSeriesRow) -> OutputResult<()> {
        self.model.write_record(&[row.step.to_string(), row.evacuated.to_string()])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.positions.flush()?;
        self.model.flush()?;
        Ok(())
    }
}
