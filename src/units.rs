//! Distance units and display formatting.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const KM_TO_METERS: f64 = 1000.0;
pub const MI_TO_METERS: f64 = 1609.344;

/// Meters per mile used for display and milestone radii.
pub const METERS_IN_ONE_MILE: f64 = 1609.0;
pub const METERS_IN_ONE_FOOT: f64 = 0.3048;
pub const FEET_IN_ONE_MILE: f64 = 5280.0;

/// Distance unit the routing service reports lengths in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnits {
    #[default]
    Kilometers,
    Miles,
}

impl DistanceUnits {
    /// Parses the service's unit string. Unknown strings yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "kilometers" => Some(DistanceUnits::Kilometers),
            "miles" => Some(DistanceUnits::Miles),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnits::Kilometers => "kilometers",
            DistanceUnits::Miles => "miles",
        }
    }

    /// Converts a length in these units to whole meters.
    pub fn to_meters(&self, length: f64) -> i32 {
        let factor = match self {
            DistanceUnits::Kilometers => KM_TO_METERS,
            DistanceUnits::Miles => MI_TO_METERS,
        };
        (length * factor).round() as i32
    }
}

impl fmt::Display for DistanceUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats a distance for display.
///
/// Kilometers: one decimal place from 100 m up, whole meters below.
/// Miles: one decimal place from a tenth of a mile up, feet rounded down
/// to the nearest ten below that, exact feet under ten.
/// In `real_time` (navigation) mode very short distances read "now".
/// Zero formats as an empty string.
pub fn format_distance(meters: i32, real_time: bool, units: DistanceUnits) -> String {
    if meters == 0 {
        return String::new();
    }

    match units {
        DistanceUnits::Kilometers => format_kilometers(meters, real_time),
        DistanceUnits::Miles => format_miles(meters, real_time),
    }
}

fn format_kilometers(meters: i32, real_time: bool) -> String {
    if meters >= 100 {
        format!("{} km", one_decimal(f64::from(meters) / 1000.0))
    } else if meters > 10 || !real_time {
        format!("{} m", meters)
    } else {
        "now".to_string()
    }
}

fn format_miles(meters: i32, real_time: bool) -> String {
    let feet = f64::from(meters) / METERS_IN_ONE_FOOT;
    if feet < 10.0 {
        if real_time {
            "now".to_string()
        } else {
            format!("{} ft", feet.floor() as i64)
        }
    } else if feet < FEET_IN_ONE_MILE / 10.0 {
        format!("{} ft", (feet / 10.0).floor() as i64 * 10)
    } else {
        format!("{} mi", one_decimal(f64::from(meters) / METERS_IN_ONE_MILE))
    }
}

/// At most one decimal place, without a trailing ".0".
fn one_decimal(value: f64) -> String {
    let formatted = format!("{:.1}", value);
    match formatted.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => formatted,
    }
}
