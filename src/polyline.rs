//! Polyline representation for route geometries.
//!
//! Routes arrive as compact encoded polylines (variable-length delta
//! encoding, bias 63, 5-bit groups with a continuation bit). Decoding
//! happens once at the boundary; the rest of the crate works on the
//! decoded coordinate sequence.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};

/// Precision of the routing service's shapes (six decimal places).
pub const DEFAULT_PRECISION: f64 = 1e-6;

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    ///
    /// Each point is a (latitude, longitude) tuple.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Decodes `encoded` where each unit of the integer stream equals
    /// `precision` degrees.
    ///
    /// Fails with [`RouteError::MalformedPolyline`] when the string stops in
    /// the middle of a codeword or between the latitude and longitude of a
    /// point, holds a byte outside `?`..=`~`, or sums to a coordinate that
    /// overflows.
    pub fn decode(encoded: &str, precision: f64) -> Result<Self> {
        let factor = scale_factor(precision);
        let bytes = encoded.as_bytes();
        let mut index = 0;
        let mut lat: i64 = 0;
        let mut lng: i64 = 0;
        let mut points = Vec::new();

        while index < bytes.len() {
            lat = accumulate(lat, bytes, &mut index)?;
            lng = accumulate(lng, bytes, &mut index)?;
            points.push((lat as f64 / factor, lng as f64 / factor));
        }

        Ok(Self { points })
    }

    /// Encodes the points at `precision`, the inverse of [`Polyline::decode`].
    pub fn encode(&self, precision: f64) -> String {
        let factor = scale_factor(precision);
        let mut out = String::new();
        let mut prev_lat: i64 = 0;
        let mut prev_lng: i64 = 0;

        for &(lat, lng) in &self.points {
            let lat = (lat * factor).round() as i64;
            let lng = (lng * factor).round() as i64;
            push_value(lat - prev_lat, &mut out);
            push_value(lng - prev_lng, &mut out);
            prev_lat = lat;
            prev_lng = lng;
        }

        out
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }
}

/// Encoded bytes are `?` (63) plus a 6-bit group.
const MIN_BYTE: u8 = 63;
const MAX_BYTE: u8 = 126;

fn scale_factor(precision: f64) -> f64 {
    (1.0 / precision).round()
}

/// Adds the next delta to `value`.
fn accumulate(value: i64, bytes: &[u8], index: &mut usize) -> Result<i64> {
    let start = *index;
    let delta = next_delta(bytes, index)?;
    value
        .checked_add(delta)
        .ok_or(RouteError::MalformedPolyline { offset: start })
}

/// Reads one zig-zag encoded value starting at `index`, advancing it.
fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64> {
    let mut shift = 0;
    let mut result: i64 = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(RouteError::MalformedPolyline { offset: *index });
        };
        // More than 12 groups cannot fit an i64.
        if shift > 60 || !(MIN_BYTE..=MAX_BYTE).contains(&byte) {
            return Err(RouteError::MalformedPolyline { offset: *index });
        }
        *index += 1;

        let chunk = i64::from(byte) - 63;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn push_value(value: i64, out: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        out.push(char::from(((0x20 | (v & 0x1f)) + 63) as u8));
        v >>= 5;
    }
    out.push(char::from((v + 63) as u8));
}
