//! Route geometry: the decoded polyline as an ordered sequence of waypoints.

use crate::haversine::GeoPoint;

/// A vertex of the route polyline with precomputed leg data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub position: GeoPoint,
    /// Meters from the first waypoint along the route.
    pub cumulative_distance: f64,
    /// Bearing of the leg leaving this waypoint. `None` for the last one.
    pub outgoing_bearing: Option<f64>,
    /// Length of the leg leaving this waypoint, 0 for the last one.
    pub leg_distance: f64,
}

impl Waypoint {
    fn new(position: GeoPoint) -> Self {
        Self {
            position,
            cumulative_distance: 0.0,
            outgoing_bearing: None,
            leg_distance: 0.0,
        }
    }
}

/// Ordered waypoints built once when a route is loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteGeometry {
    waypoints: Vec<Waypoint>,
}

impl RouteGeometry {
    /// Builds the waypoint sequence, filling in each waypoint's bearing and
    /// leg distance as its successor is appended.
    pub fn build(points: &[(f64, f64)]) -> Self {
        let mut waypoints: Vec<Waypoint> = Vec::with_capacity(points.len());

        for &point in points {
            let mut waypoint = Waypoint::new(GeoPoint::from(point));
            if let Some(prev) = waypoints.last_mut() {
                let distance = prev.position.distance_to(&waypoint.position);
                prev.leg_distance = distance;
                prev.outgoing_bearing = Some(prev.position.bearing_to(&waypoint.position));
                waypoint.cumulative_distance = prev.cumulative_distance + distance;
            }
            waypoints.push(waypoint);
        }

        Self { waypoints }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn first(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    pub fn last(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Length of the whole polyline in meters.
    pub fn total_distance(&self) -> f64 {
        self.last().map_or(0.0, |w| w.cumulative_distance)
    }

    /// Positions of all waypoints, in order.
    pub fn positions(&self) -> Vec<GeoPoint> {
        self.waypoints.iter().map(|w| w.position).collect()
    }
}
