//! Coordinate reference systems.
//!
//! The road network is always held in WGS-84.  Hazard and candidate
//! geometries may arrive in Web Mercator; they are reprojected into the
//! network's frame before any containment test.  Any other frame is rejected
//! because the containment result would be meaningless.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// WGS-84 semi-major axis, metres (the sphere radius used by EPSG:3857).
const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Web Mercator is undefined at the poles; EPSG:3857 clips latitude here.
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// A supported coordinate reference system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crs {
    /// EPSG:4326 — geographic degrees, axis order `(lon, lat)`.
    #[default]
    Wgs84,
    /// EPSG:3857 — spherical Mercator metres, axis order `(x, y)`.
    WebMercator,
}

impl Crs {
    /// The frame road networks are held in.
    pub const NETWORK: Crs = Crs::Wgs84;

    /// The EPSG code string.
    pub fn as_str(self) -> &'static str {
        match self {
            Crs::Wgs84       => "EPSG:4326",
            Crs::WebMercator => "EPSG:3857",
        }
    }

    /// Reproject `(x, y)` from `self` into `to`.
    ///
    /// Identity when both frames are equal.
    pub fn transform(self, to: Crs, x: f64, y: f64) -> CoreResult<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return Err(CoreError::OutOfRange { crs: self, x, y });
        }
        match (self, to) {
            (Crs::Wgs84, Crs::Wgs84) | (Crs::WebMercator, Crs::WebMercator) => Ok((x, y)),
            (Crs::Wgs84, Crs::WebMercator) => {
                if !(-180.0..=180.0).contains(&x) || !(-90.0..=90.0).contains(&y) {
                    return Err(CoreError::OutOfRange { crs: self, x, y });
                }
                let lat = y.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
                let mx = EARTH_RADIUS_M * x.to_radians();
                let my = EARTH_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
                Ok((mx, my))
            }
            (Crs::WebMercator, Crs::Wgs84) => {
                let lon = (x / EARTH_RADIUS_M).to_degrees();
                let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan()
                    - std::f64::consts::FRAC_PI_2)
                    .to_degrees();
                if !(-180.0..=180.0).contains(&lon) {
                    return Err(CoreError::OutOfRange { crs: self, x, y });
                }
                Ok((lon, lat))
            }
        }
    }
}

impl FromStr for Crs {
    type Err = CoreError;

    /// Accepts `EPSG:nnnn` in any case, a bare code, or a common alias.
    fn from_str(s: &str) -> CoreResult<Self> {
        let norm = s.trim().to_ascii_uppercase();
        let code = norm.strip_prefix("EPSG:").unwrap_or(&norm);
        match code {
            "4326" | "WGS84" | "WGS 84" => Ok(Crs::Wgs84),
            "3857" | "900913" | "WEBMERCATOR" | "WEB MERCATOR" => Ok(Crs::WebMercator),
            _ => Err(CoreError::UnsupportedCrs(s.to_owned())),
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
