//! `ev-core` — foundational types for the flood evacuation simulator.
//!
//! This crate is a dependency of every other `ev-*` crate.  It intentionally
//! has no `ev-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `EdgeId`                         |
//! | [`geo`]         | `GeoPoint`, haversine distance                        |
//! | [`crs`]         | `Crs` — supported reference frames and reprojection   |
//! | [`step`]        | `Step` — discrete simulation time                     |
//! | [`rng`]         | `SimRng` (the run's single seedable source)           |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod crs;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod step;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use crs::Crs;
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{AgentId, EdgeId, NodeId};
pub use rng::SimRng;
pub use step::Step;
