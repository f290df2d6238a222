//! turn-by-turn route tracking
//!
//! Loads a routing service's route document, snaps raw position fixes onto
//! the route geometry and tracks progress through its maneuvers.

pub mod engine;
pub mod error;
pub mod haversine;
pub mod maneuver;
pub mod polyline;
pub mod request;
pub mod response;
pub mod route;
pub mod snap;
pub mod traits;
pub mod units;
pub mod valhalla;
pub mod waypoint;

pub use engine::{EngineState, Milestone, RouteEngine};
pub use error::{Result, RouteError};
pub use haversine::GeoPoint;
pub use maneuver::{Maneuver, ShortManeuverPolicy};
pub use route::{Route, RouteOptions, TrackingState};
pub use units::DistanceUnits;
