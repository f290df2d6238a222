//! Spherical-earth geodesy primitives.
//!
//! Distances use the haversine formula on a sphere of mean radius, bearings
//! use the forward-azimuth formula. Both are approximate (not ellipsoidal),
//! which is enough for snapping fixes onto a road polyline.

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Two points closer than this on both axes are treated as the same place.
pub const FUZZY_EQUAL_THRESHOLD_DEGREES: f64 = 0.00001;

/// A geographic position in degrees, optionally carrying a heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    /// Degrees clockwise from north, 0..360.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearing: Option<f64>,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            bearing: None,
        }
    }

    /// Returns a copy of this point stamped with `bearing`.
    pub fn with_bearing(self, bearing: f64) -> Self {
        Self {
            bearing: Some(bearing),
            ..self
        }
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_m((self.lat, self.lng), (other.lat, other.lng))
    }

    /// Initial bearing towards `other` in degrees, 0..360.
    pub fn bearing_to(&self, other: &GeoPoint) -> f64 {
        initial_bearing((self.lat, self.lng), (other.lat, other.lng))
    }

    /// True when both coordinates differ by no more than
    /// [`FUZZY_EQUAL_THRESHOLD_DEGREES`].
    pub fn fuzzy_eq(&self, other: &GeoPoint) -> bool {
        (self.lat - other.lat).abs() <= FUZZY_EQUAL_THRESHOLD_DEGREES
            && (self.lng - other.lng).abs() <= FUZZY_EQUAL_THRESHOLD_DEGREES
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Calculate haversine distance between two (lat, lng) points in meters.
pub fn haversine_m(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Compute the initial bearing from `from` to `to` in degrees [0, 360).
pub fn initial_bearing(from: (f64, f64), to: (f64, f64)) -> f64 {
    let lat1 = from.0.to_radians();
    let lat2 = to.0.to_radians();
    let dlng = (to.1 - from.1).to_radians();

    let y = dlng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}
