//! Navigation event engine.
//!
//! Feeds raw fixes into a [`Route`] and turns the resulting tracking state
//! into listener callbacks: snapped positions, distance updates, approach
//! milestones, maneuver transitions, arrival and loss of the route.

use tracing::{debug, info, warn};

use crate::haversine::GeoPoint;
use crate::route::Route;
use crate::traits::RouteListener;
use crate::units::METERS_IN_ONE_MILE;

/// Half-width of the window around a milestone distance.
pub const APPROACH_RADIUS_METERS: f64 = 50.0;

/// Distance to the next maneuver at which it is announced.
pub const ALERT_RADIUS_METERS: i32 = 100;

/// Snapped positions this close to the final maneuver complete the route.
pub const DESTINATION_RADIUS_METERS: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Heading towards the next maneuver, not yet announced.
    PreInstruction,
    /// The next maneuver has been announced.
    Instruction,
    Complete,
    Lost,
}

/// Distances before a maneuver at which progress is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Milestone {
    TwoMile,
    OneMile,
    QuarterMile,
}

impl Milestone {
    pub const ALL: [Milestone; 3] = [Milestone::TwoMile, Milestone::OneMile, Milestone::QuarterMile];

    pub fn distance_meters(&self) -> f64 {
        match self {
            Milestone::TwoMile => METERS_IN_ONE_MILE * 2.0,
            Milestone::OneMile => METERS_IN_ONE_MILE,
            Milestone::QuarterMile => METERS_IN_ONE_MILE / 4.0,
        }
    }
}

pub struct RouteEngine<L: RouteListener> {
    route: Route,
    listener: L,
    state: EngineState,
    /// Maneuver the user is heading for, as of the previous fix.
    upcoming: Option<usize>,
    last_milestone: Option<Milestone>,
}

impl<L: RouteListener> RouteEngine<L> {
    pub fn new(route: Route, mut listener: L) -> Self {
        listener.on_route_start();
        Self {
            route,
            listener,
            state: EngineState::PreInstruction,
            upcoming: Some(0),
            last_milestone: None,
        }
    }

    /// Replaces the route wholesale, e.g. after recalculating a lost one.
    pub fn set_route(&mut self, route: Route) {
        self.route = route;
        self.upcoming = Some(0);
        self.last_milestone = None;
        self.state = EngineState::PreInstruction;
        self.listener.on_route_start();
    }

    pub fn on_location_changed(&mut self, fix: GeoPoint) {
        if self.state == EngineState::Complete {
            return;
        }

        self.snap_location(fix);

        if self.state == EngineState::Complete {
            self.listener.on_update_distance(0, 0);
        } else {
            self.listener.on_update_distance(
                self.distance_to_next(),
                self.route.remaining_distance_to_destination().unwrap_or(0),
            );
        }

        if self.state == EngineState::Lost {
            return;
        }

        for milestone in Milestone::ALL {
            self.check_milestone(milestone);
        }

        if self.state == EngineState::PreInstruction
            && self.distance_to_next() < ALERT_RADIUS_METERS
        {
            if let Some(next) = self.route.next_maneuver_index() {
                self.listener.on_approach_instruction(next);
                self.transition(EngineState::Instruction);
                self.last_milestone = None;
            }
        }

        let next = self.route.next_maneuver_index();
        if self.upcoming != next {
            self.transition(EngineState::PreInstruction);
            if let Some(completed) = self.upcoming {
                self.listener.on_instruction_complete(completed);
            }
        }
        self.upcoming = next;
    }

    fn snap_location(&mut self, fix: GeoPoint) {
        let snapped = self.route.update(&fix);

        if let Some(snapped) = snapped {
            self.listener.on_snap_location(fix, snapped);
            if self.has_arrived(&snapped) {
                info!("route complete");
                self.transition(EngineState::Complete);
                self.listener.on_route_complete();
            }
        }

        if self.route.is_lost() {
            warn!(lat = fix.lat, lng = fix.lng, "route lost, recalculation needed");
            self.transition(EngineState::Lost);
            self.listener.on_recalculate(fix);
        }
    }

    fn has_arrived(&self, snapped: &GeoPoint) -> bool {
        self.route
            .maneuvers()
            .last()
            .is_some_and(|destination| {
                snapped.distance_to(&destination.location) < DESTINATION_RADIUS_METERS
            })
    }

    fn check_milestone(&mut self, milestone: Milestone) {
        if self.state != EngineState::PreInstruction || self.last_milestone == Some(milestone) {
            return;
        }
        let distance = f64::from(self.distance_to_next());
        if (distance - milestone.distance_meters()).abs() >= APPROACH_RADIUS_METERS {
            return;
        }
        if let Some(next) = self.route.next_maneuver_index() {
            self.listener.on_milestone_reached(next, milestone);
            self.last_milestone = Some(milestone);
        }
    }

    fn distance_to_next(&self) -> i32 {
        self.route.distance_to_next_maneuver().unwrap_or(0)
    }

    fn transition(&mut self, state: EngineState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "engine state change");
            self.state = state;
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }
}
