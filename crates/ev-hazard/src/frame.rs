//! Reference-frame handling for hazard and candidate geometry.
//!
//! A collection may declare its CRS or leave it unset.  Unset means "already
//! in the network's frame": the collection is used as-is and a warning is
//! logged.

use geo::{Coord, LineString, Polygon};

use ev_core::{CoreResult, Crs};

/// The frame a collection's coordinates are actually in.
pub fn resolve(declared: Option<Crs>, what: &str) -> Crs {
    match declared {
        Some(crs) => crs,
        None => {
            log::warn!("{what} has no CRS; assuming the network's frame ({})", Crs::NETWORK);
            Crs::NETWORK
        }
    }
}

/// Reproject every ring of `polygon` from `from` into `to`.
pub fn reproject_polygon(polygon: &Polygon<f64>, from: Crs, to: Crs) -> CoreResult<Polygon<f64>> {
    if from == to {
        return Ok(polygon.clone());
    }
    let exterior = reproject_ring(polygon.exterior(), from, to)?;
    let interiors = polygon
        .interiors()
        .iter()
        .map(|ring| reproject_ring(ring, from, to))
        .collect::<CoreResult<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn reproject_ring(ring: &LineString<f64>, from: Crs, to: Crs) -> CoreResult<LineString<f64>> {
    ring.coords()
        .map(|c| from.transform(to, c.x, c.y).map(Coord::from))
        .collect::<CoreResult<Vec<_>>>()
        .map(LineString::new)
}
