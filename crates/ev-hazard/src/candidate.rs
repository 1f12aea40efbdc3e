//! Candidate start points and the filter's output records.

use geo::Point;

use ev_core::{Crs, GeoPoint};

/// Proposed agent start points, in their declared frame.
///
/// Order and duplicates are significant: each surviving entry becomes one
/// agent, in this order.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    crs:    Option<Crs>,
    points: Vec<Point<f64>>,
}

impl CandidateSet {
    pub fn new(crs: Option<Crs>, points: Vec<Point<f64>>) -> Self {
        Self { crs, points }
    }

    /// Build from raw `(x, y)` pairs (`(lon, lat)` for WGS-84).
    pub fn from_xy<I>(crs: Option<Crs>, xy: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(crs, xy.into_iter().map(Point::from).collect())
    }

    pub fn crs(&self) -> Option<Crs> {
        self.crs
    }

    pub fn points(&self) -> &[Point<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A candidate that lies inside the hazard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilteredCandidate {
    /// Position in the input [`CandidateSet`].
    pub index:    usize,
    /// The coordinate as supplied, in the candidate set's own frame.
    pub original: Point<f64>,
    /// The same point in the network's frame.
    pub position: GeoPoint,
}
