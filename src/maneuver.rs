//! Maneuvers: the routing instructions laid over the route geometry.

use std::fmt;

use crate::error::{Result, RouteError};
use crate::haversine::GeoPoint;
use crate::response::{RawManeuver, TransitInfo};
use crate::units::{DistanceUnits, format_distance};
use crate::waypoint::RouteGeometry;

/// Maneuver type code of the "you have arrived" maneuver.
pub const MANEUVER_TYPE_DESTINATION: i32 = 4;

/// `live_distance_to_next` before the tracker has computed it.
pub const UNCOMPUTED_DISTANCE: i32 = -1;

const ARRIVED_NAME: &str = "You have arrived at your destination.";

/// What to do with maneuvers that carry no street name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShortManeuverPolicy {
    /// Keep every maneuver as reported.
    #[default]
    Keep,
    /// Drop nameless maneuvers (other than arrival and the final one) and
    /// fold their distance into the following maneuver.
    MergeForward,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TravelMode {
    #[default]
    Drive,
    Pedestrian,
    Bicycle,
    Transit,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Drive => "drive",
            TravelMode::Pedestrian => "pedestrian",
            TravelMode::Bicycle => "bicycle",
            TravelMode::Transit => "transit",
        }
    }
}

impl From<&str> for TravelMode {
    /// Unknown modes fall back to driving.
    fn from(value: &str) -> Self {
        match value {
            "pedestrian" => TravelMode::Pedestrian,
            "bicycle" => TravelMode::Bicycle,
            "transit" => TravelMode::Transit,
            _ => TravelMode::Drive,
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TravelType {
    #[default]
    Car,
    Foot,
    Road,
    Tram,
    Metro,
    Rail,
    Bus,
    Ferry,
    CableCar,
    Gondola,
    Funicular,
}

impl TravelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelType::Car => "car",
            TravelType::Foot => "foot",
            TravelType::Road => "road",
            TravelType::Tram => "tram",
            TravelType::Metro => "metro",
            TravelType::Rail => "rail",
            TravelType::Bus => "bus",
            TravelType::Ferry => "ferry",
            TravelType::CableCar => "cable_car",
            TravelType::Gondola => "gondola",
            TravelType::Funicular => "funicular",
        }
    }
}

impl From<&str> for TravelType {
    /// Unknown types fall back to car.
    fn from(value: &str) -> Self {
        match value {
            "foot" => TravelType::Foot,
            "road" => TravelType::Road,
            "tram" => TravelType::Tram,
            "metro" => TravelType::Metro,
            "rail" => TravelType::Rail,
            "bus" => TravelType::Bus,
            "ferry" => TravelType::Ferry,
            "cable_car" => TravelType::CableCar,
            "gondola" => TravelType::Gondola,
            "funicular" => TravelType::Funicular,
            _ => TravelType::Car,
        }
    }
}

impl fmt::Display for TravelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A routing instruction spanning `begin_index..=end_index` of the geometry.
#[derive(Debug, Clone)]
pub struct Maneuver {
    pub turn_type: i32,
    pub instruction: String,
    pub begin_index: usize,
    pub end_index: usize,
    /// Length of this maneuver's segment in meters, including any distance
    /// folded in from merged maneuvers.
    pub distance: i32,
    /// Meters from the current position to the end of this maneuver.
    pub live_distance_to_next: i32,
    /// Position of the begin waypoint.
    pub location: GeoPoint,
    /// Outgoing bearing at the begin waypoint, rounded up to whole degrees.
    pub bearing: i32,
    /// Seconds.
    pub time: i64,
    pub street_names: Option<Vec<String>>,
    pub begin_street_names: Option<Vec<String>>,
    pub verbal_pre_transition_instruction: Option<String>,
    pub verbal_transition_alert_instruction: Option<String>,
    pub verbal_post_transition_instruction: Option<String>,
    pub travel_mode: TravelMode,
    pub travel_type: TravelType,
    pub transit_info: Option<TransitInfo>,
}

/// Identity of a maneuver for "already announced" bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManeuverKey {
    turn_type: i32,
    bearing: i32,
    lat_bits: u64,
    lng_bits: u64,
}

impl Maneuver {
    fn from_raw(raw: &RawManeuver, units: DistanceUnits) -> Self {
        Self {
            turn_type: raw.kind,
            instruction: raw.instruction.clone(),
            begin_index: raw.begin_shape_index,
            end_index: raw.end_shape_index,
            distance: units.to_meters(raw.length),
            live_distance_to_next: UNCOMPUTED_DISTANCE,
            location: GeoPoint::default(),
            bearing: 0,
            time: raw.time,
            street_names: raw.street_names.clone(),
            begin_street_names: raw.begin_street_names.clone(),
            verbal_pre_transition_instruction: raw.verbal_pre_transition_instruction.clone(),
            verbal_transition_alert_instruction: raw.verbal_transition_alert_instruction.clone(),
            verbal_post_transition_instruction: raw.verbal_post_transition_instruction.clone(),
            travel_mode: TravelMode::from(raw.travel_mode.as_str()),
            travel_type: TravelType::from(raw.travel_type.as_str()),
            transit_info: raw.transit_info.clone(),
        }
    }

    pub fn key(&self) -> ManeuverKey {
        ManeuverKey {
            turn_type: self.turn_type,
            bearing: self.bearing,
            lat_bits: self.location.lat.to_bits(),
            lng_bits: self.location.lng.to_bits(),
        }
    }

    pub fn is_destination(&self) -> bool {
        self.turn_type == MANEUVER_TYPE_DESTINATION
    }

    /// False for both a missing and an empty street name list.
    pub fn has_street_names(&self) -> bool {
        self.street_names.as_ref().is_some_and(|names| !names.is_empty())
    }

    /// Street names joined with "/", falling back to the instruction text.
    pub fn name(&self) -> String {
        if self.is_destination() {
            return ARRIVED_NAME.to_string();
        }
        match &self.street_names {
            Some(names) if !names.is_empty() => names.join("/"),
            _ => self.instruction.clone(),
        }
    }

    pub fn begin_street_name(&self) -> String {
        self.begin_street_names
            .as_ref()
            .map(|names| names.join("/"))
            .unwrap_or_default()
    }

    pub fn formatted_distance(&self, units: DistanceUnits, real_time: bool) -> String {
        format_distance(self.distance, real_time, units)
    }

    /// Compass label for the bearing.
    ///
    /// The labels are mirrored (45..90 reads "NW") for the rotated map
    /// arrow, and only a bearing of exactly 360 reads "NE"; 315..360 has
    /// no label and yields an empty string.
    pub fn direction(&self) -> &'static str {
        let bearing = self.bearing;
        if bearing >= 315 && bearing >= 360 {
            "NE"
        } else if (270..315).contains(&bearing) {
            "E"
        } else if (225..270).contains(&bearing) {
            "SE"
        } else if (180..225).contains(&bearing) {
            "S"
        } else if (135..180).contains(&bearing) {
            "SW"
        } else if (90..135).contains(&bearing) {
            "W"
        } else if (45..90).contains(&bearing) {
            "NW"
        } else if (0..45).contains(&bearing) {
            "N"
        } else {
            ""
        }
    }

    /// Bearing bucketed down to the start of its 45° arc.
    pub fn direction_angle(&self) -> f32 {
        match self.bearing {
            315..=360 => 315.0,
            270..=314 => 270.0,
            225..=269 => 225.0,
            180..=224 => 180.0,
            135..=179 => 135.0,
            90..=134 => 90.0,
            45..=89 => 45.0,
            _ => 0.0,
        }
    }

    /// Counter-rotation for a north-up map arrow.
    pub fn rotation_bearing(&self) -> i32 {
        360 - self.bearing
    }

    pub fn verbal_pre_transition_instruction(&self) -> &str {
        self.verbal_pre_transition_instruction.as_deref().unwrap_or_default()
    }

    pub fn verbal_transition_alert_instruction(&self) -> &str {
        self.verbal_transition_alert_instruction.as_deref().unwrap_or_default()
    }

    pub fn verbal_post_transition_instruction(&self) -> &str {
        self.verbal_post_transition_instruction.as_deref().unwrap_or_default()
    }
}

impl PartialEq for Maneuver {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl fmt::Display for Maneuver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Maneuver: ({:.5}, {:.5}) {} {} LiveDistanceTo: {}",
            self.location.lat,
            self.location.lng,
            self.turn_type,
            self.name(),
            self.live_distance_to_next
        )
    }
}

/// Builds the maneuver list over an already built geometry.
///
/// Lengths are converted to meters, each maneuver takes the position and
/// (ceiling of the) outgoing bearing of its begin waypoint.
pub fn build_maneuvers(
    raw: &[RawManeuver],
    geometry: &RouteGeometry,
    units: DistanceUnits,
    policy: ShortManeuverPolicy,
) -> Result<Vec<Maneuver>> {
    let mut maneuvers = Vec::with_capacity(raw.len());
    let mut gap_distance = 0;

    for (i, raw_maneuver) in raw.iter().enumerate() {
        let begin = geometry
            .get(raw_maneuver.begin_shape_index)
            .ok_or(RouteError::ShapeIndexOutOfRange {
                index: raw_maneuver.begin_shape_index,
                len: geometry.len(),
            })?;

        let mut maneuver = Maneuver::from_raw(raw_maneuver, units);

        let is_last = i + 1 == raw.len();
        if policy == ShortManeuverPolicy::MergeForward
            && !maneuver.has_street_names()
            && !maneuver.is_destination()
            && !is_last
        {
            gap_distance += maneuver.distance;
            continue;
        }

        maneuver.distance += gap_distance;
        gap_distance = 0;
        maneuver.location = begin.position;
        maneuver.bearing = begin.outgoing_bearing.unwrap_or(0.0).ceil() as i32;
        maneuvers.push(maneuver);
    }

    Ok(maneuvers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: i32, length: f64, begin: usize, names: Option<&[&str]>) -> RawManeuver {
        RawManeuver {
            kind,
            instruction: format!("maneuver {}", begin),
            length,
            begin_shape_index: begin,
            end_shape_index: begin + 1,
            travel_mode: "drive".to_string(),
            travel_type: "car".to_string(),
            time: 10,
            street_names: names.map(|n| n.iter().map(|s| s.to_string()).collect()),
            begin_street_names: None,
            verbal_pre_transition_instruction: None,
            verbal_transition_alert_instruction: None,
            verbal_post_transition_instruction: None,
            transit_info: None,
        }
    }

    fn geometry() -> RouteGeometry {
        RouteGeometry::build(&[(0.0, 0.0), (0.0, 0.01), (0.01, 0.01), (0.01, 0.02)])
    }

    fn with_bearing(bearing: i32) -> Maneuver {
        let mut maneuver = Maneuver::from_raw(&raw(10, 0.1, 0, None), DistanceUnits::Kilometers);
        maneuver.bearing = bearing;
        maneuver
    }

    #[test]
    fn test_distance_converted_to_meters() {
        let raws = [raw(1, 1.2346, 0, Some(&["A"]))];
        let km = build_maneuvers(&raws, &geometry(), DistanceUnits::Kilometers, Default::default())
            .unwrap();
        assert_eq!(km[0].distance, 1235);
        let mi = build_maneuvers(&raws, &geometry(), DistanceUnits::Miles, Default::default())
            .unwrap();
        assert_eq!(mi[0].distance, 1987);
    }

    #[test]
    fn test_bearing_is_ceiling_of_begin_waypoint() {
        let raws = [raw(1, 1.0, 0, Some(&["A"])), raw(10, 1.0, 1, Some(&["B"]))];
        let geometry = geometry();
        let maneuvers =
            build_maneuvers(&raws, &geometry, DistanceUnits::Kilometers, Default::default())
                .unwrap();

        for maneuver in &maneuvers {
            let exact = geometry.get(maneuver.begin_index).unwrap().outgoing_bearing.unwrap();
            assert_eq!(maneuver.bearing, exact.ceil() as i32);
            assert_eq!(maneuver.location, geometry.get(maneuver.begin_index).unwrap().position);
        }
        // Due north is exactly 0°, so there is nothing to round up.
        assert_eq!(maneuvers[1].bearing, 0);
    }

    #[test]
    fn test_live_distance_starts_uncomputed() {
        let raws = [raw(1, 1.0, 0, Some(&["A"]))];
        let maneuvers =
            build_maneuvers(&raws, &geometry(), DistanceUnits::Kilometers, Default::default())
                .unwrap();
        assert_eq!(maneuvers[0].live_distance_to_next, UNCOMPUTED_DISTANCE);
    }

    #[test]
    fn test_keep_policy_keeps_nameless_maneuvers() {
        let raws = [
            raw(1, 1.0, 0, Some(&["A"])),
            raw(10, 0.0, 1, None),
            raw(4, 0.0, 3, None),
        ];
        let maneuvers = build_maneuvers(
            &raws,
            &geometry(),
            DistanceUnits::Kilometers,
            ShortManeuverPolicy::Keep,
        )
        .unwrap();
        assert_eq!(maneuvers.len(), 3);
    }

    #[test]
    fn test_merge_forward_folds_distance() {
        let raws = [
            raw(1, 1.0, 0, Some(&["A"])),
            raw(10, 0.25, 1, None),
            raw(15, 0.5, 2, Some(&["C"])),
            raw(4, 0.0, 3, None),
        ];
        let maneuvers = build_maneuvers(
            &raws,
            &geometry(),
            DistanceUnits::Kilometers,
            ShortManeuverPolicy::MergeForward,
        )
        .unwrap();

        assert_eq!(maneuvers.len(), 3);
        assert_eq!(maneuvers[1].name(), "C");
        assert_eq!(maneuvers[1].distance, 750);
        assert!(maneuvers[2].is_destination());
        let total: i32 = maneuvers.iter().map(|m| m.distance).sum();
        assert_eq!(total, 1750);
    }

    #[test]
    fn test_merge_forward_treats_empty_street_names_as_nameless() {
        let raws = [
            raw(1, 1.0, 0, Some(&["A"])),
            raw(10, 0.25, 1, Some(&[])),
            raw(15, 0.5, 2, Some(&["C"])),
            raw(4, 0.0, 3, None),
        ];
        let maneuvers = build_maneuvers(
            &raws,
            &geometry(),
            DistanceUnits::Kilometers,
            ShortManeuverPolicy::MergeForward,
        )
        .unwrap();

        assert_eq!(maneuvers.len(), 3);
        assert_eq!(maneuvers[1].name(), "C");
        assert_eq!(maneuvers[1].distance, 750);
    }

    #[test]
    fn test_empty_street_names_fall_back_to_instruction() {
        let maneuver = Maneuver::from_raw(&raw(10, 1.0, 2, Some(&[])), DistanceUnits::Kilometers);
        assert!(!maneuver.has_street_names());
        assert_eq!(maneuver.name(), "maneuver 2");
    }

    #[test]
    fn test_shape_index_out_of_range() {
        let raws = [raw(1, 1.0, 9, Some(&["A"]))];
        let err = build_maneuvers(&raws, &geometry(), DistanceUnits::Kilometers, Default::default())
            .unwrap_err();
        assert!(matches!(err, RouteError::ShapeIndexOutOfRange { index: 9, len: 4 }));
    }

    #[test]
    fn test_name() {
        let named = Maneuver::from_raw(
            &raw(10, 1.0, 0, Some(&["Main St", "Route 9"])),
            DistanceUnits::Kilometers,
        );
        assert_eq!(named.name(), "Main St/Route 9");

        let unnamed = Maneuver::from_raw(&raw(10, 1.0, 0, None), DistanceUnits::Kilometers);
        assert_eq!(unnamed.name(), "maneuver 0");

        let arrival = Maneuver::from_raw(&raw(4, 0.0, 0, None), DistanceUnits::Kilometers);
        assert_eq!(arrival.name(), "You have arrived at your destination.");
    }

    #[test]
    fn test_direction_buckets() {
        assert_eq!(with_bearing(0).direction(), "N");
        assert_eq!(with_bearing(44).direction(), "N");
        assert_eq!(with_bearing(45).direction(), "NW");
        assert_eq!(with_bearing(90).direction(), "W");
        assert_eq!(with_bearing(135).direction(), "SW");
        assert_eq!(with_bearing(180).direction(), "S");
        assert_eq!(with_bearing(225).direction(), "SE");
        assert_eq!(with_bearing(270).direction(), "E");
        assert_eq!(with_bearing(360).direction(), "NE");
    }

    #[test]
    fn test_direction_gap_below_360() {
        assert_eq!(with_bearing(315).direction(), "");
        assert_eq!(with_bearing(359).direction(), "");
    }

    #[test]
    fn test_direction_angle_and_rotation() {
        assert_eq!(with_bearing(359).direction_angle(), 315.0);
        assert_eq!(with_bearing(100).direction_angle(), 90.0);
        assert_eq!(with_bearing(10).direction_angle(), 0.0);
        assert_eq!(with_bearing(90).rotation_bearing(), 270);
    }

    #[test]
    fn test_equality_ignores_text() {
        let mut a = with_bearing(90);
        let b = with_bearing(90);
        a.instruction = "something else".to_string();
        a.live_distance_to_next = 42;
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
        assert_ne!(a, with_bearing(91));
    }

    #[test]
    fn test_travel_mode_fallbacks() {
        assert_eq!(TravelMode::from("transit"), TravelMode::Transit);
        assert_eq!(TravelMode::from("hovercraft"), TravelMode::Drive);
        assert_eq!(TravelType::from("cable_car"), TravelType::CableCar);
        assert_eq!(TravelType::from("unicycle"), TravelType::Car);
        assert_eq!(TravelType::Funicular.to_string(), "funicular");
    }
}
