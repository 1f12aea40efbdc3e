//! `ev-spatial` — road network, nearest-node index, routing, and occupancy.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR multigraph + R-tree), `RoadNetworkBuilder` |
//! | [`loader`]  | `load_network_csv`, `load_network_reader`                   |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`                   |
//! | [`grid`]    | `NetworkGrid` — agents currently on each node               |
//! | [`osm`]     | `load_walk_network_pbf` (feature = `"osm"` only)            |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `osm`   | Enables OSM PBF loading via the `osmpbf` crate.              |
//! | `serde` | Derives `Serialize`/`Deserialize` on core types.             |

pub mod error;
pub mod grid;
pub mod loader;
pub mod network;
pub mod router;

#[cfg(feature = "osm")]
pub mod osm;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use grid::NetworkGrid;
pub use loader::{load_network_csv, load_network_reader};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use router::{DijkstraRouter, Route, Router, WALK_SPEED_MPS};
