//! Geodesic snapper: projects a raw fix onto the leg leaving a waypoint.
//!
//! The projection is the intersection of two great circles: the route
//! circle through the waypoint along its outgoing bearing, and the circle
//! through the fix perpendicular to it. The two-circle solution has blind
//! spots (parallel circles, ambiguous or antipodal intersections), so the
//! perpendicular is tried on both sides and the whole thing is retried
//! with the route bearing reversed when the answer lands too far away.
//!
//! See <http://www.movable-type.co.uk/scripts/latlong.html> ("intersection
//! of two paths given start points and bearings").

use std::f64::consts::PI;

use tracing::trace;

use crate::haversine::GeoPoint;
use crate::waypoint::Waypoint;

/// A projection further than this from the fix is on the wrong side of the globe.
pub const CORRECTION_THRESHOLD_METERS: f64 = 1000.0;

/// Candidates whose bearing from the waypoint strays further than this
/// from the leg's bearing snapped backwards and are rejected.
pub const MAX_BEARING_DEVIATION_DEGREES: f64 = 10.0;

const CLOCKWISE_DEGREES: f64 = 90.0;
const COUNTERCLOCKWISE_DEGREES: f64 = -90.0;
const REVERSE_DEGREES: f64 = 180.0;

/// Sine of the angle between the leg and the fix below which the fix is
/// taken to be on the leg's great circle. Well under a millimetre of
/// cross-track offset per kilometre.
const ON_CIRCLE_EPSILON: f64 = 1e-7;

/// Stand-in for a zero longitude delta, in radians.
const ZERO_DELTA_LNG: f64 = 0.001;

/// Snaps `fix` onto the leg leaving `waypoint`.
///
/// Returns `None` when the waypoint has no outgoing leg or no intersection
/// could be found on either side. The returned point carries the leg's
/// bearing.
pub fn snap(waypoint: &Waypoint, fix: &GeoPoint) -> Option<GeoPoint> {
    let bearing = waypoint.outgoing_bearing?;
    let origin = waypoint.position;

    if origin.fuzzy_eq(fix) {
        return Some(fix.with_bearing(bearing));
    }

    let candidate = if on_route_circle(&origin, bearing, fix) {
        GeoPoint::new(fix.lat, fix.lng)
    } else {
        intersect(&origin, bearing, fix)?
    };
    let deviation = (bearing - origin.bearing_to(&candidate)).abs();
    let snapped = if deviation > MAX_BEARING_DEVIATION_DEGREES
        && deviation < 360.0 - MAX_BEARING_DEVIATION_DEGREES
    {
        origin
    } else {
        candidate
    };

    Some(snapped.with_bearing(bearing))
}

/// True when `fix` already lies on the great circle leaving `origin` at
/// `bearing`, ahead of or behind it. The two-circle intersection
/// degenerates there (both numerator and denominator of the distance
/// along the route vanish).
fn on_route_circle(origin: &GeoPoint, bearing: f64, fix: &GeoPoint) -> bool {
    let off_circle = (bearing - origin.bearing_to(fix)).to_radians().sin();
    off_circle.abs() < ON_CIRCLE_EPSILON
}

fn intersect(origin: &GeoPoint, bearing: f64, fix: &GeoPoint) -> Option<GeoPoint> {
    let candidate = project_either_side(origin, bearing, fix)?;
    let distance = candidate.distance_to(fix);
    if distance.round() > CORRECTION_THRESHOLD_METERS {
        trace!(distance, "projection landed across the globe, retrying reversed");
        return project_either_side(origin, bearing - REVERSE_DEGREES, fix);
    }
    Some(candidate)
}

fn project_either_side(origin: &GeoPoint, bearing: f64, fix: &GeoPoint) -> Option<GeoPoint> {
    project(origin, bearing, fix, CLOCKWISE_DEGREES)
        .or_else(|| project(origin, bearing, fix, COUNTERCLOCKWISE_DEGREES))
}

/// Intersection of the path leaving `origin` at `bearing` with the path
/// leaving `fix` at `bearing + offset`. All angles below are radians.
fn project(origin: &GeoPoint, bearing: f64, fix: &GeoPoint, offset: f64) -> Option<GeoPoint> {
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lng.to_radians();
    let lat2 = fix.lat.to_radians();
    let lon2 = fix.lng.to_radians();

    let brng13 = bearing.to_radians();
    let brng23 = (bearing + offset).to_radians();
    let d_lat = lat2 - lat1;
    let mut d_lon = lon2 - lon1;
    if d_lon == 0.0 {
        d_lon = ZERO_DELTA_LNG;
    }

    // angular distance origin -> fix
    let dist12 = 2.0
        * ((d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2))
            .sqrt()
            .min(1.0)
            .asin();
    if dist12 == 0.0 {
        return None;
    }

    // initial/final bearings between the two points
    let brng_a = clamped_acos((lat2.sin() - lat1.sin() * dist12.cos()) / (dist12.sin() * lat1.cos()));
    let brng_b = clamped_acos((lat1.sin() - lat2.sin() * dist12.cos()) / (dist12.sin() * lat2.cos()));

    let (brng12, brng21) = if (lon2 - lon1).sin() > 0.0 {
        (brng_a, 2.0 * PI - brng_b)
    } else {
        (2.0 * PI - brng_a, brng_b)
    };

    let alpha1 = (brng13 - brng12 + PI) % (2.0 * PI) - PI; // angle fix-origin-intersection
    let alpha2 = (brng21 - brng23 + PI) % (2.0 * PI) - PI; // angle origin-fix-intersection

    if alpha1.sin() == 0.0 && alpha2.sin() == 0.0 {
        return None; // infinite intersections
    }
    if alpha1.sin() * alpha2.sin() < 0.0 {
        return None; // ambiguous intersection
    }

    let alpha3 = clamped_acos(
        -alpha1.cos() * alpha2.cos() + alpha1.sin() * alpha2.sin() * dist12.cos(),
    );
    let dist13 = (dist12.sin() * alpha1.sin() * alpha2.sin())
        .atan2(alpha2.cos() + alpha1.cos() * alpha3.cos());
    let lat3 = (lat1.sin() * dist13.cos() + lat1.cos() * dist13.sin() * brng13.cos())
        .clamp(-1.0, 1.0)
        .asin();
    let d_lon13 = (brng13.sin() * dist13.sin() * lat1.cos())
        .atan2(dist13.cos() - lat1.sin() * lat3.sin());
    // normalise to -180..+180
    let lon3 = (lon1 + d_lon13 + 3.0 * PI) % (2.0 * PI) - PI;

    if !lat3.is_finite() || !lon3.is_finite() {
        return None;
    }

    Some(GeoPoint::new(lat3.to_degrees(), lon3.to_degrees()))
}

fn clamped_acos(value: f64) -> f64 {
    value.clamp(-1.0, 1.0).acos()
}
