//! `ev-output` — everything that reads a finished (or partial) run.
//!
//! Nothing here affects the simulation; every function takes the network and
//! the collected series read-only.
//!
//! | Module      | Contents                                                       |
//! |-------------|----------------------------------------------------------------|
//! | [`row`]     | `AgentPositionRow`, `ModelSeriesRow`                           |
//! | [`writer`]  | `OutputWriter` trait, `export_series`                          |
//! | [`csv`]     | `CsvWriter` — `agent_positions.csv`, `model_series.csv`        |
//! | [`sqlite`]  | `SqliteWriter` — `output.db` (feature `sqlite`)                |
//! | [`observer`]| `SeriesOutputObserver` — streams rows while the run executes   |
//! | [`report`]  | `EvacuationSummary`                                            |
//! | [`render`]  | Frame renderer, `FrameSink`, `FfmpegSink`, `PngSequenceSink`   |
//!
//! # Usage
//!
//! ```rust,ignore
//! use ev_output::{CsvWriter, SeriesOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SeriesOutputObserver::new(writer, run.network());
//! run.run_with(100, &mut obs)?;
//! if let Some(e) = obs.take_error() { log::error!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod render;
pub mod report;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SeriesOutputObserver;
pub use render::{render, render_frames, FfmpegSink, FrameSink, PngSequenceSink, RenderOptions, Renderer};
pub use report::EvacuationSummary;
pub use row::{AgentPositionRow, ModelSeriesRow};
pub use writer::{export_series, OutputWriter};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
