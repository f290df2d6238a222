//! Canned routes along the equator.
//!
//! At the equator 0.005 degrees of longitude is 555.97 m, which keeps the
//! expected distances easy to work out by hand.

use serde_json::Value;

use super::{maneuver, route_document, with_streets};

/// Meters per 0.005 degrees of longitude on the equator.
pub const EQUATOR_LEG_METERS: f64 = 555.974;

/// Offset a fix this far north of the equator, about 11 m.
pub const LATERAL_OFFSET_DEGREES: f64 = 0.0001;

/// A raw fix slightly north of the equator at `lng`.
pub fn fix_at(lng: f64) -> turn_by_turn::GeoPoint {
    turn_by_turn::GeoPoint::new(LATERAL_OFFSET_DEGREES, lng)
}

pub fn equator_points(legs: usize) -> Vec<(f64, f64)> {
    (0..=legs).map(|i| (0.0, i as f64 * 0.005)).collect()
}

/// A (0,0) to (0,0.01) route with a single 1113 m maneuver.
pub fn two_waypoint_route() -> String {
    route_document(
        &[(0.0, 0.0), (0.0, 0.01)],
        vec![
            with_streets(maneuver(1, "Drive east on Equator Road.", 1.113, 0, 1), &["Equator Road"]),
            maneuver(4, "You have arrived at your destination.", 0.0, 1, 1),
        ],
        "kilometers",
    )
}

/// Four 556 m legs, two 1112 m maneuvers and arrival at (0,0.02).
pub fn four_leg_route() -> String {
    route_document(
        &equator_points(4),
        vec![
            with_streets(maneuver(1, "Drive east on First Avenue.", 1.112, 0, 2), &["First Avenue"]),
            with_streets(maneuver(8, "Continue on Second Avenue.", 1.112, 2, 4), &["Second Avenue"]),
            maneuver(4, "You have arrived at your destination.", 0.0, 4, 4),
        ],
        "kilometers",
    )
}

/// Eight legs, two 2224 m maneuvers and arrival at (0,0.04).
pub fn eight_leg_route() -> String {
    route_document(
        &equator_points(8),
        vec![
            with_streets(maneuver(1, "Drive east on Long Road.", 2.224, 0, 4), &["Long Road"]),
            with_streets(maneuver(8, "Continue on Longer Road.", 2.224, 4, 8), &["Longer Road"]),
            maneuver(4, "You have arrived at your destination.", 0.0, 8, 8),
        ],
        "kilometers",
    )
}

/// Maneuvers for [`four_leg_route`]'s geometry with a nameless one in the middle.
pub fn maneuvers_with_nameless_step() -> Vec<Value> {
    vec![
        with_streets(maneuver(1, "Drive east on First Avenue.", 0.556, 0, 1), &["First Avenue"]),
        maneuver(9, "Bear right.", 0.556, 1, 2),
        with_streets(maneuver(10, "Turn right onto Second Avenue.", 1.112, 2, 4), &["Second Avenue"]),
        maneuver(4, "You have arrived at your destination.", 0.0, 4, 4),
    ]
}
