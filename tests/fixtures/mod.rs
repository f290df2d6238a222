//! Test fixtures for turn-by-turn.
//!
//! Route documents are synthesized in the routing service's response
//! format: the shape is encoded with [`Polyline::encode`] and the rest is
//! assembled with `serde_json::json!`.

#![allow(dead_code)]

pub mod routes;

use serde_json::{Value, json};

use turn_by_turn::engine::Milestone;
use turn_by_turn::haversine::GeoPoint;
use turn_by_turn::polyline::{DEFAULT_PRECISION, Polyline};
use turn_by_turn::traits::RouteListener;

pub use routes::*;

/// A maneuver entry with only the required keys filled in.
pub fn maneuver(kind: i32, instruction: &str, length: f64, begin: usize, end: usize) -> Value {
    json!({
        "type": kind,
        "instruction": instruction,
        "length": length,
        "time": (length * 60.0).round() as i64,
        "begin_shape_index": begin,
        "end_shape_index": end,
        "travel_mode": "drive",
        "travel_type": "car"
    })
}

pub fn with_streets(mut maneuver: Value, streets: &[&str]) -> Value {
    maneuver["street_names"] = json!(streets);
    maneuver
}

/// Builds a successful route document over `points`.
pub fn route_document(points: &[(f64, f64)], maneuvers: Vec<Value>, units: &str) -> String {
    let length: f64 = maneuvers
        .iter()
        .filter_map(|m| m["length"].as_f64())
        .sum();
    let time: i64 = maneuvers.iter().filter_map(|m| m["time"].as_i64()).sum();
    let shape = Polyline::new(points.to_vec()).encode(DEFAULT_PRECISION);
    let (first, last) = (points[0], points[points.len() - 1]);

    json!({
        "trip": {
            "status": 0,
            "status_message": "Found route between points",
            "units": units,
            "language": "en-US",
            "locations": [
                {"lat": first.0, "lon": first.1, "type": "break"},
                {"lat": last.0, "lon": last.1, "type": "break"}
            ],
            "legs": [{
                "shape": shape,
                "maneuvers": maneuvers,
                "summary": {"length": length, "time": time}
            }],
            "summary": {"length": length, "time": time}
        }
    })
    .to_string()
}

/// Every callback a [`RouteListener`] can receive, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    RouteStart,
    Recalculate(GeoPoint),
    Snap { original: GeoPoint, snapped: GeoPoint },
    Milestone(usize, Milestone),
    Approach(usize),
    InstructionComplete(usize),
    Distance(i32, i32),
    RouteComplete,
}

#[derive(Debug, Default)]
pub struct RecordingListener {
    pub events: Vec<Event>,
}

impl RecordingListener {
    /// Events other than per-fix snaps and distance updates.
    pub fn navigation_events(&self) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| !matches!(e, Event::Snap { .. } | Event::Distance(..)))
            .cloned()
            .collect()
    }

    pub fn distances(&self) -> Vec<(i32, i32)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Distance(next, destination) => Some((*next, *destination)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl RouteListener for RecordingListener {
    fn on_route_start(&mut self) {
        self.events.push(Event::RouteStart);
    }

    fn on_recalculate(&mut self, fix: GeoPoint) {
        self.events.push(Event::Recalculate(fix));
    }

    fn on_snap_location(&mut self, original: GeoPoint, snapped: GeoPoint) {
        self.events.push(Event::Snap { original, snapped });
    }

    fn on_milestone_reached(&mut self, maneuver_index: usize, milestone: Milestone) {
        self.events.push(Event::Milestone(maneuver_index, milestone));
    }

    fn on_approach_instruction(&mut self, maneuver_index: usize) {
        self.events.push(Event::Approach(maneuver_index));
    }

    fn on_instruction_complete(&mut self, maneuver_index: usize) {
        self.events.push(Event::InstructionComplete(maneuver_index));
    }

    fn on_update_distance(&mut self, distance_to_next: i32, distance_to_destination: i32) {
        self.events
            .push(Event::Distance(distance_to_next, distance_to_destination));
    }

    fn on_route_complete(&mut self) {
        self.events.push(Event::RouteComplete);
    }
}
