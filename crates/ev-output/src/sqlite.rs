//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `agent_positions` and `model_series`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AgentPositionRow, ModelSeriesRow, OutputResult};

/// Writes the two series to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and recreate both tables empty.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             DROP TABLE IF EXISTS agent_positions;
             DROP TABLE IF EXISTS model_series;
             CREATE TABLE agent_positions (
                 step        INTEGER NOT NULL,
                 agent_id    INTEGER NOT NULL,
                 node        INTEGER NOT NULL,
                 external_id INTEGER NOT NULL,
                 evacuated   INTEGER NOT NULL,
                 PRIMARY KEY (step, agent_id)
             );
             CREATE TABLE model_series (
                 step      INTEGER PRIMARY KEY,
                 evacuated INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_positions(&mut self, rows: &[AgentPositionRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_positions \
                 (step, agent_id, node, external_id, evacuated) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.step as i64,
                    row.agent_id,
                    row.node,
                    row.external_id,
                    row.evacuated as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_model(&mut self, row: &ModelSeriesRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO model_series (step, evacuated) VALUES (?1, ?2)",
            rusqlite::params![row.step as i64, row.evacuated as i64],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
