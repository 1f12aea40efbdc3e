//! `ev-agent` — how agents move.
//!
//! The simulation core never decides where an agent goes.  It asks a
//! [`Navigator`] twice: once at placement to build the agent's private
//! navigation state, and once per activation to advance the agent by one
//! unit of simulated time.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`context`]   | `NavContext<'a>` — read-only run state for one call        |
//! | [`navigator`] | `Navigator` trait                                          |
//! | [`shortest`]  | `ShortestPathNavigator` — walk the fastest path, one node per step |
//! | [`stay`]      | `StayPut` — never moves                                    |
//! | [`error`]     | `NavError`, `NavResult<T>`                                 |

pub mod context;
pub mod error;
pub mod navigator;
pub mod shortest;
pub mod stay;

#[cfg(test)]
mod tests;

pub use context::NavContext;
pub use error::{NavError, NavResult};
pub use navigator::Navigator;
pub use shortest::{PathState, ShortestPathNavigator};
pub use stay::StayPut;
