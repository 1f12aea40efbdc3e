//! The hazard containment join.

use geo::{BoundingRect, Coord, Intersects, Polygon, Rect};

use ev_core::{Crs, GeoPoint};

use crate::frame;
use crate::{CandidateSet, FilteredCandidate, HazardError, HazardResult, HazardZone};

/// Hazard polygons reprojected into the network's frame, ready for testing.
#[derive(Debug, Clone)]
pub struct HazardFilter {
    polygons: Vec<Polygon<f64>>,
    bounds:   Vec<Option<Rect<f64>>>,
}

impl HazardFilter {
    /// Normalise `zone` into [`Crs::NETWORK`].
    pub fn new(zone: &HazardZone) -> HazardResult<Self> {
        let from = frame::resolve(zone.crs(), "hazard zone");
        let polygons = zone
            .polygons()
            .iter()
            .map(|p| frame::reproject_polygon(p, from, Crs::NETWORK))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| HazardError::Crs { what: "hazard zone", source })?;
        let bounds = polygons.iter().map(|p| p.bounding_rect()).collect();
        Ok(Self { polygons, bounds })
    }

    /// `true` if `(x, y)`, in the network frame, touches any hazard polygon.
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        let c = Coord { x, y };
        self.polygons
            .iter()
            .zip(&self.bounds)
            .any(|(poly, rect)| rect.is_some_and(|r| r.intersects(&c)) && poly.intersects(&c))
    }

    pub fn contains(&self, pos: GeoPoint) -> bool {
        let (x, y) = pos.xy();
        self.contains_xy(x, y)
    }

    /// Keep the candidates inside the hazard, in input order.
    ///
    /// A candidate inside several overlapping polygons is kept once.
    pub fn apply(&self, candidates: &CandidateSet) -> HazardResult<Vec<FilteredCandidate>> {
        let from = frame::resolve(candidates.crs(), "candidate set");
        let mut kept = Vec::new();
        for (index, original) in candidates.points().iter().copied().enumerate() {
            if !original.x().is_finite() || !original.y().is_finite() {
                return Err(HazardError::InvalidCandidate { index });
            }
            let (x, y) = from
                .transform(Crs::NETWORK, original.x(), original.y())
                .map_err(|source| HazardError::Crs { what: "candidate set", source })?;
            if self.contains_xy(x, y) {
                kept.push(FilteredCandidate { index, original, position: GeoPoint::from_xy(x, y) });
            }
        }
        log::info!(
            "hazard filter kept {} of {} candidates",
            kept.len(),
            candidates.len(),
        );
        Ok(kept)
    }
}

/// One-shot form of [`HazardFilter::new`] followed by [`HazardFilter::apply`].
pub fn filter_candidates(
    zone:       &HazardZone,
    candidates: &CandidateSet,
) -> HazardResult<Vec<FilteredCandidate>> {
    HazardFilter::new(zone)?.apply(candidates)
}
