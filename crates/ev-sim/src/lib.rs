//! `ev-sim` — the evacuation run.
//!
//! # Step loop
//!
//! ```text
//! build():
//!   filter candidates against the hazard      (ev-hazard)
//!   choose the target (supplied, or uniform from the seeded RNG)
//!   for each kept candidate, in input order:
//!     snap to nearest node, place on the grid, Navigator::plan
//!
//! step():
//!   ① Collect  — record every agent's node and the evacuated count
//!   ② Shuffle  — fresh random permutation of all agents
//!   ③ Activate — Navigator::advance for each agent in that order,
//!                moving it on the grid immediately
//! ```
//!
//! Collection happens before any agent moves, so the record for step `t`
//! (counting from 0) shows positions after `t` completed steps.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ev_agent::ShortestPathNavigator;
//! use ev_sim::EvacuationBuilder;
//!
//! let mut run = EvacuationBuilder::new(network, hazard, candidates, ShortestPathNavigator::walking())
//!     .seed(42)
//!     .build()?;
//! let series = run.run(100)?;
//! ```

pub mod agent;
pub mod builder;
pub mod collector;
pub mod error;
pub mod evacuation;
pub mod observer;
pub mod schedule;


pub use agent::Agent;
pub use builder::EvacuationBuilder;
pub use collector::{AgentRecord, DataCollector, ModelRecord, TimeSeries};
pub use error::{SimError, SimResult};
pub use evacuation::Evacuation;
pub use observer::{NoopObserver, SimObserver};
pub use schedule::{RandomActivation, RunState};
