//! Route tracker: live navigation state over a loaded route.
//!
//! A [`Route`] is built once from the routing service's document and then
//! fed raw position fixes through [`Route::update`]. Each update snaps the
//! fix onto the current leg, advances legs and maneuvers as the user moves
//! along, and refreshes every maneuver's live distance.
//!
//! `update` takes `&mut self` and is not atomic across its steps: callers
//! receiving fixes on several threads must serialize access (a single
//! `Mutex<Route>` per active route is enough).

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::{Result, RouteError};
use crate::haversine::GeoPoint;
use crate::maneuver::{Maneuver, ManeuverKey, ShortManeuverPolicy, build_maneuvers};
use crate::polyline::{DEFAULT_PRECISION, Polyline};
use crate::response::{RouteResponse, STATUS_MISSING_TRIP, STATUS_OK, Summary, TripLocation};
use crate::snap::snap;
use crate::units::DistanceUnits;
use crate::waypoint::{RouteGeometry, Waypoint};

/// A fix this close to the final waypoint snaps straight to it.
pub const CLOSE_TO_DESTINATION_THRESHOLD_METERS: f64 = 20.0;

/// A snap this close to the end of the current leg moves on to the next leg.
pub const CLOSE_TO_NEXT_LEG_THRESHOLD_METERS: f64 = 5.0;

/// A fix further than this from its snapped position means the user is lost.
pub const LOST_THRESHOLD_METERS: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteOptions {
    pub short_maneuver_policy: ShortManeuverPolicy,
    /// Degrees per unit of the encoded shape.
    pub shape_precision: f64,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            short_maneuver_policy: ShortManeuverPolicy::Keep,
            shape_precision: DEFAULT_PRECISION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    Tracking,
    /// Terminal until a new route replaces this one.
    Lost,
}

#[derive(Debug, Clone)]
pub struct Route {
    geometry: RouteGeometry,
    maneuvers: Vec<Maneuver>,
    units: DistanceUnits,
    summary: Summary,
    language: Option<String>,
    status_message: Option<String>,
    locations: Vec<TripLocation>,
    current_leg: usize,
    current_maneuver: usize,
    total_distance_travelled: f64,
    last_snapped: Option<GeoPoint>,
    state: TrackingState,
    seen: HashSet<ManeuverKey>,
    /// Widened lost threshold before the user reaches the route, fixed at
    /// the first update that gets as far as the lost check.
    start_tolerance: Option<f64>,
}

impl Route {
    /// Parses a routing service document and loads its first leg.
    pub fn from_json(json: &str, options: RouteOptions) -> Result<Self> {
        let response = RouteResponse::from_json(json)?;
        Self::from_response(&response, options)
    }

    /// Loads the first leg of an already parsed document.
    ///
    /// A non-success status yields [`RouteError::NoRouteFound`] before any
    /// geometry is decoded.
    pub fn from_response(response: &RouteResponse, options: RouteOptions) -> Result<Self> {
        let trip = response.trip.as_ref().ok_or(RouteError::NoRouteFound {
            status: STATUS_MISSING_TRIP,
        })?;
        if trip.status != STATUS_OK {
            return Err(RouteError::NoRouteFound {
                status: trip.status,
            });
        }

        let units = match trip.units.as_deref() {
            None => DistanceUnits::default(),
            Some(value) => DistanceUnits::parse(value).unwrap_or_else(|| {
                warn!(units = value, "unknown distance units, assuming kilometers");
                DistanceUnits::default()
            }),
        };

        let leg = trip.first_leg()?;
        let shape = leg.shape.as_deref().ok_or(RouteError::MissingField("shape"))?;
        let raw_maneuvers = leg
            .maneuvers
            .as_deref()
            .ok_or(RouteError::MissingField("maneuvers"))?;
        let summary = trip.summary()?;

        let polyline = Polyline::decode(shape, options.shape_precision)?;
        let geometry = RouteGeometry::build(polyline.points());
        if geometry.is_empty() {
            return Err(RouteError::MissingField("shape"));
        }

        let maneuvers =
            build_maneuvers(raw_maneuvers, &geometry, units, options.short_maneuver_policy)?;
        if maneuvers.is_empty() {
            return Err(RouteError::MissingField("maneuvers"));
        }

        info!(
            waypoints = geometry.len(),
            maneuvers = maneuvers.len(),
            length_m = geometry.total_distance(),
            "route loaded"
        );

        let mut route = Self {
            geometry,
            maneuvers,
            units,
            summary,
            language: trip.language.clone(),
            status_message: trip.status_message.clone(),
            locations: trip.locations.clone(),
            current_leg: 0,
            current_maneuver: 0,
            total_distance_travelled: 0.0,
            last_snapped: None,
            state: TrackingState::Tracking,
            seen: HashSet::new(),
            start_tolerance: None,
        };
        route.refresh_live_distances();
        Ok(route)
    }

    /// Snaps a raw fix onto the route and updates the tracking state.
    ///
    /// Returns the snapped position, the fix itself while the user is still
    /// approaching the start of the route, or `None` once lost. Lost is
    /// terminal: every later call returns `None`.
    pub fn update(&mut self, fix: &GeoPoint) -> Option<GeoPoint> {
        if self.state == TrackingState::Lost {
            return None;
        }
        let destination = self.geometry.last()?.position;
        let start = self.geometry.first()?.position;

        let (waypoint, snapped) = loop {
            if self.current_leg >= self.geometry.len() {
                self.mark_lost("past the end of the route");
                return None;
            }

            if destination.distance_to(fix).floor() < CLOSE_TO_DESTINATION_THRESHOLD_METERS {
                return Some(self.arrive(destination));
            }

            let waypoint = self.geometry.waypoints()[self.current_leg];
            let snapped = snap(&waypoint, fix).unwrap_or(waypoint.position);
            if waypoint.position.distance_to(&snapped)
                > waypoint.leg_distance - CLOSE_TO_NEXT_LEG_THRESHOLD_METERS
            {
                self.advance_leg();
                continue;
            }
            break (waypoint, snapped);
        };

        let correction = fix.distance_to(&snapped);
        let start_tolerance = *self
            .start_tolerance
            .get_or_insert_with(|| fix.distance_to(&start) + LOST_THRESHOLD_METERS);

        if correction < LOST_THRESHOLD_METERS {
            self.last_snapped = Some(snapped);
            self.record_progress(&waypoint, &snapped);
            Some(snapped)
        } else if self.total_distance_travelled == 0.0
            && self.current_leg == 0
            && correction < start_tolerance
        {
            Some(*fix)
        } else {
            warn!(correction_m = correction, leg = self.current_leg, "lost the route");
            self.mark_lost("fix too far from the route");
            None
        }
    }

    fn arrive(&mut self, destination: GeoPoint) -> GeoPoint {
        // Everything is behind the user now, in both geometry and
        // maneuver terms, so every live distance drops to zero.
        let maneuver_total: i32 = self.maneuvers.iter().map(|m| m.distance).sum();
        let travelled = self
            .geometry
            .total_distance()
            .ceil()
            .max(f64::from(maneuver_total));
        self.total_distance_travelled = self.total_distance_travelled.max(travelled);
        self.last_snapped = Some(destination);
        self.refresh_live_distances();
        destination
    }

    fn advance_leg(&mut self) {
        self.current_leg += 1;
        debug!(leg = self.current_leg, "advanced to next leg");

        let reached_next = self
            .maneuvers
            .get(self.current_maneuver + 1)
            .is_some_and(|next| self.current_leg >= next.begin_index);
        if reached_next {
            self.current_maneuver += 1;
            debug!(maneuver = self.current_maneuver, "advanced to next maneuver");
        }
    }

    fn mark_lost(&mut self, reason: &'static str) {
        debug!(reason, leg = self.current_leg, "tracking stopped");
        self.state = TrackingState::Lost;
    }

    /// Completed legs plus the partial distance along the current one.
    fn record_progress(&mut self, waypoint: &Waypoint, snapped: &GeoPoint) {
        let travelled =
            (waypoint.cumulative_distance + waypoint.position.distance_to(snapped)).ceil();
        self.total_distance_travelled = self.total_distance_travelled.max(travelled);
        self.refresh_live_distances();
    }

    /// Recomputes every maneuver's distance-to-end from scratch.
    fn refresh_live_distances(&mut self) {
        let travelled = self.total_distance_travelled.ceil() as i32;
        let mut combined = 0;
        for maneuver in &mut self.maneuvers {
            combined += maneuver.distance;
            maneuver.live_distance_to_next = (combined - travelled).max(0);
        }
    }

    /// Moves back to the first leg. Distance travelled and the lost state
    /// are left alone.
    pub fn rewind(&mut self) {
        self.current_leg = 0;
    }

    /// Records `maneuver` as announced.
    pub fn mark_seen(&mut self, maneuver: &Maneuver) {
        self.seen.insert(maneuver.key());
    }

    pub fn has_seen(&self, maneuver: &Maneuver) -> bool {
        self.seen.contains(&maneuver.key())
    }

    pub fn seen_maneuvers(&self) -> &HashSet<ManeuverKey> {
        &self.seen
    }

    pub fn current_maneuver(&self) -> Option<&Maneuver> {
        self.maneuvers.get(self.current_maneuver)
    }

    pub fn next_maneuver(&self) -> Option<&Maneuver> {
        self.maneuvers.get(self.next_maneuver_index()?)
    }

    pub fn next_maneuver_index(&self) -> Option<usize> {
        let next = self.current_maneuver + 1;
        (next < self.maneuvers.len()).then_some(next)
    }

    pub fn current_maneuver_index(&self) -> usize {
        self.current_maneuver
    }

    pub fn current_leg(&self) -> usize {
        self.current_leg
    }

    pub fn maneuvers(&self) -> &[Maneuver] {
        &self.maneuvers
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        self.geometry.waypoints()
    }

    pub fn geometry(&self) -> Vec<GeoPoint> {
        self.geometry.positions()
    }

    pub fn start_coordinates(&self) -> Option<GeoPoint> {
        self.geometry.first().map(|w| w.position)
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn is_lost(&self) -> bool {
        self.state == TrackingState::Lost
    }

    pub fn last_snapped(&self) -> Option<GeoPoint> {
        self.last_snapped
    }

    pub fn total_distance_travelled(&self) -> f64 {
        self.total_distance_travelled
    }

    /// Meters to the end of the current maneuver.
    pub fn distance_to_next_maneuver(&self) -> Option<i32> {
        self.current_maneuver().map(|m| m.live_distance_to_next)
    }

    pub fn remaining_distance_to_destination(&self) -> Option<i32> {
        self.maneuvers.last().map(|m| m.live_distance_to_next)
    }

    /// Route length from the trip summary, in whole meters.
    pub fn total_distance(&self) -> i32 {
        self.units.to_meters(self.summary.length)
    }

    /// Route duration from the trip summary, in seconds.
    pub fn total_time(&self) -> i64 {
        self.summary.time
    }

    pub fn units(&self) -> DistanceUnits {
        self.units
    }

    /// Narrative language the service answered in, e.g. `en-US`.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Break and via points as echoed back by the service.
    pub fn locations(&self) -> &[TripLocation] {
        &self.locations
    }

    /// Counter-rotation for a north-up map on the current leg.
    pub fn current_rotation_bearing(&self) -> Option<f64> {
        let bearing = self.geometry.get(self.current_leg)?.outgoing_bearing?;
        Some(360.0 - bearing)
    }
}
