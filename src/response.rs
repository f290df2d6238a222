//! Typed view of the routing service's route document.
//!
//! The document is parsed once into these structs; nothing downstream
//! keeps or re-reads the raw JSON.

use serde::Deserialize;

use crate::error::{Result, RouteError};

/// Status the service reports for a successful trip.
pub const STATUS_OK: i32 = 0;

/// Status reported when the document has no `trip` at all.
pub const STATUS_MISSING_TRIP: i32 = -1;

#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub trip: Option<Trip>,
}

impl RouteResponse {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn status(&self) -> i32 {
        self.trip.as_ref().map_or(STATUS_MISSING_TRIP, |trip| trip.status)
    }

    pub fn found_route(&self) -> bool {
        self.status() == STATUS_OK
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trip {
    pub status: i32,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub summary: Option<Summary>,
    #[serde(default)]
    pub locations: Vec<TripLocation>,
}

impl Trip {
    /// The first leg, which is the only one tracked.
    pub fn first_leg(&self) -> Result<&Leg> {
        self.legs.first().ok_or(RouteError::MissingField("legs"))
    }

    /// The trip summary, or the first leg's when the trip carries none.
    pub fn summary(&self) -> Result<Summary> {
        self.summary
            .or_else(|| self.legs.first().and_then(|leg| leg.summary))
            .ok_or(RouteError::MissingField("summary"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Leg {
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub maneuvers: Option<Vec<RawManeuver>>,
    #[serde(default)]
    pub summary: Option<Summary>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Summary {
    /// Route length in the trip's units.
    pub length: f64,
    /// Travel time in seconds.
    pub time: i64,
}

/// A via point echoed back by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TripLocation {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A maneuver exactly as the service reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawManeuver {
    #[serde(rename = "type")]
    pub kind: i32,
    pub instruction: String,
    /// Length in the trip's units.
    pub length: f64,
    pub begin_shape_index: usize,
    pub end_shape_index: usize,
    pub travel_mode: String,
    pub travel_type: String,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub street_names: Option<Vec<String>>,
    #[serde(default)]
    pub begin_street_names: Option<Vec<String>>,
    #[serde(default)]
    pub verbal_pre_transition_instruction: Option<String>,
    #[serde(default)]
    pub verbal_transition_alert_instruction: Option<String>,
    #[serde(default)]
    pub verbal_post_transition_instruction: Option<String>,
    #[serde(default)]
    pub transit_info: Option<TransitInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransitInfo {
    pub transit_stops: Vec<TransitStop>,
    pub headsign: String,
    pub long_name: String,
    pub short_name: String,
    pub operator_url: String,
    pub onestop_id: String,
    pub operator_onestop_id: String,
    pub operator_name: String,
    pub description: String,
    pub color: i64,
    pub text_color: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransitStop {
    #[serde(rename = "type")]
    pub kind: String,
    pub onestop_id: String,
    pub name: String,
    pub arrival_date_time: String,
    pub departure_date_time: String,
    pub is_parent_stop: bool,
    pub assumed_schedule: bool,
}
