//! `ev-hazard` — who is at risk.
//!
//! A run only simulates people who start inside the flood hazard.  This crate
//! holds the hazard polygons and the candidate start points, brings both into
//! the road network's reference frame, and applies the containment test.
//!
//! # Modules
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`zone`]      | `HazardZone` — validated hazard polygons                  |
//! | [`candidate`] | `CandidateSet`, `FilteredCandidate`                       |
//! | [`frame`]     | Frame resolution and polygon reprojection                 |
//! | [`filter`]    | `HazardFilter` — the boundary-inclusive containment join  |
//! | [`loader`]    | CSV loaders for hazards and candidates                    |
//! | [`error`]     | `HazardError`, `HazardResult`                             |
//!
//! # Boundary convention
//!
//! Containment uses `geo`'s `Intersects`, which counts a point lying on a
//! polygon's boundary as intersecting it.  That covers exterior edges,
//! exterior vertices, and the boundary of a hole.  Only a point strictly
//! inside a hole, or strictly outside the exterior ring, is dropped.

pub mod candidate;
pub mod error;
pub mod filter;
pub mod frame;
pub mod loader;
pub mod zone;


pub use candidate::{CandidateSet, FilteredCandidate};
pub use error::{HazardError, HazardResult};
pub use filter::{filter_candidates, HazardFilter};
pub use loader::{load_candidates_csv, load_candidates_reader, load_hazard_csv, load_hazard_reader};
pub use zone::HazardZone;
