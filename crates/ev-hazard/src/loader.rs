//! CSV loaders for hazard polygons and candidate points.
//!
//! # Hazard CSV
//!
//! One row per ring vertex, rings in drawing order:
//!
//! ```csv
//! polygon_id,ring,x,y
//! levee-breach,0,-2.2430,53.4795
//! levee-breach,0,-2.2400,53.4795
//! levee-breach,0,-2.2400,53.4815
//! levee-breach,0,-2.2430,53.4815
//! ```
//!
//! `ring` 0 is the exterior; 1, 2, … are holes.  An empty `ring` (or a file
//! without the column) means 0.  Polygons keep the order in which their ids
//! first appear.  Rings need not repeat their first vertex.
//!
//! # Candidate CSV
//!
//! ```csv
//! x,y
//! -2.2415,53.4804
//! ```
//!
//! The frame of either file is supplied by the caller; neither format
//! carries one.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use geo::{Coord, LineString, Point, Polygon};
use serde::Deserialize;

use ev_core::Crs;

use crate::zone::validate_polygon;
use crate::{CandidateSet, HazardError, HazardResult, HazardZone};

#[derive(Deserialize)]
struct VertexRecord {
    polygon_id: String,
    #[serde(default)]
    ring:       Option<u32>,
    x:          f64,
    y:          f64,
}

#[derive(Deserialize)]
struct PointRecord {
    x: f64,
    y: f64,
}

// ── Hazard ────────────────────────────────────────────────────────────────────

pub fn load_hazard_csv(path: &Path, crs: Option<Crs>) -> HazardResult<HazardZone> {
    let zone = load_hazard_reader(std::fs::File::open(path)?, crs)?;
    log::info!("loaded {} hazard polygon(s) from {}", zone.len(), path.display());
    Ok(zone)
}

pub fn load_hazard_reader<R: Read>(reader: R, crs: Option<Crs>) -> HazardResult<HazardZone> {
    // polygon id -> ring number -> vertices, ids in first-seen order.
    let mut order: Vec<String> = Vec::new();
    let mut rings: HashMap<String, BTreeMap<u32, Vec<Coord<f64>>>> = HashMap::new();

    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    for (line, result) in csv_reader.deserialize::<VertexRecord>().enumerate() {
        let row = result.map_err(|e| parse_error("hazard", line, e))?;
        let entry = rings.entry(row.polygon_id.clone()).or_insert_with(|| {
            order.push(row.polygon_id.clone());
            BTreeMap::new()
        });
        entry
            .entry(row.ring.unwrap_or(0))
            .or_default()
            .push(Coord { x: row.x, y: row.y });
    }

    let mut polygons = Vec::with_capacity(order.len());
    for id in order {
        let Some(mut by_ring) = rings.remove(&id) else { continue };
        let exterior = by_ring.remove(&0).ok_or_else(|| HazardError::InvalidPolygon {
            polygon: id.clone(),
            reason:  "no exterior ring (ring 0)".to_string(),
        })?;
        let holes = by_ring.into_values().map(LineString::new).collect();
        let polygon = Polygon::new(LineString::new(exterior), holes);
        validate_polygon(&id, &polygon)?;
        polygons.push(polygon);
    }

    HazardZone::new(crs, polygons)
}

// ── Candidates ────────────────────────────────────────────────────────────────

pub fn load_candidates_csv(path: &Path, crs: Option<Crs>) -> HazardResult<CandidateSet> {
    let set = load_candidates_reader(std::fs::File::open(path)?, crs)?;
    log::info!("loaded {} candidate point(s) from {}", set.len(), path.display());
    Ok(set)
}

pub fn load_candidates_reader<R: Read>(reader: R, crs: Option<Crs>) -> HazardResult<CandidateSet> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut points = Vec::new();
    for (line, result) in csv_reader.deserialize::<PointRecord>().enumerate() {
        let row = result.map_err(|e| parse_error("candidates", line, e))?;
        points.push(Point::new(row.x, row.y));
    }
    Ok(CandidateSet::new(crs, points))
}

/// `line` is the 0-based data row; report it 1-based after the header.
fn parse_error(file: &str, line: usize, e: csv::Error) -> HazardError {
    HazardError::Parse(format!("{file} row {}: {e}", line + 2))
}
