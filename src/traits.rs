//! Seams to the collaborators around the tracking core.
//!
//! Transport and presentation live outside this crate; these traits are
//! what they implement to plug into it.

use crate::engine::Milestone;
use crate::error::Result;
use crate::haversine::GeoPoint;
use crate::request::RouteRequest;

/// Delivers the routing service's raw JSON document for a request.
pub trait RouteProvider {
    fn fetch_route(&self, request: &RouteRequest) -> Result<String>;
}

/// Receives navigation events from a [`crate::engine::RouteEngine`].
///
/// Maneuver indices refer to [`crate::route::Route::maneuvers`].
pub trait RouteListener {
    fn on_route_start(&mut self);

    /// The user left the route; a new route should be requested from `fix`.
    fn on_recalculate(&mut self, fix: GeoPoint);

    fn on_snap_location(&mut self, original: GeoPoint, snapped: GeoPoint);

    fn on_milestone_reached(&mut self, maneuver_index: usize, milestone: Milestone);

    /// The user is within alert range of the maneuver.
    fn on_approach_instruction(&mut self, maneuver_index: usize);

    fn on_instruction_complete(&mut self, maneuver_index: usize);

    /// Meters to the next maneuver and to the destination.
    fn on_update_distance(&mut self, distance_to_next: i32, distance_to_destination: i32);

    fn on_route_complete(&mut self);
}
