//! The hazard zone: one or more polygons, fixed for the whole run.

use geo::Polygon;

use ev_core::Crs;

use crate::{HazardError, HazardResult};

/// Validated hazard polygons in their declared frame.
///
/// Reprojection into the network's frame happens when a
/// [`HazardFilter`](crate::HazardFilter) is built from the zone.
#[derive(Debug, Clone)]
pub struct HazardZone {
    crs:      Option<Crs>,
    polygons: Vec<Polygon<f64>>,
}

impl HazardZone {
    /// Wrap `polygons`, declared to be in `crs` (`None` = network frame).
    ///
    /// # Errors
    ///
    /// [`HazardError::EmptyHazard`] for an empty set, and
    /// [`HazardError::InvalidPolygon`] for a polygon with fewer than three
    /// distinct exterior vertices or non-finite coordinates.
    pub fn new(crs: Option<Crs>, polygons: Vec<Polygon<f64>>) -> HazardResult<Self> {
        if polygons.is_empty() {
            return Err(HazardError::EmptyHazard);
        }
        for (i, polygon) in polygons.iter().enumerate() {
            validate_polygon(&format!("#{i}"), polygon)?;
        }
        Ok(Self { crs, polygons })
    }

    pub fn crs(&self) -> Option<Crs> {
        self.crs
    }

    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Always `false` for a constructed zone.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// Ring sanity checks shared by the constructor and the loaders.
pub(crate) fn validate_polygon(label: &str, polygon: &Polygon<f64>) -> HazardResult<()> {
    let invalid = |reason: &str| HazardError::InvalidPolygon {
        polygon: label.to_string(),
        reason:  reason.to_string(),
    };

    let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
    for ring in rings {
        if ring.coords().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(invalid("non-finite coordinate"));
        }
    }

    // `Polygon::new` closes rings, so a triangle has four coordinates.
    let mut exterior: Vec<_> = polygon.exterior().coords().copied().collect();
    exterior.dedup();
    if exterior.len() < 4 {
        return Err(invalid("exterior ring needs at least three distinct vertices"));
    }
    Ok(())
}
