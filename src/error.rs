//! Error types for route loading and fetching.
//!
//! Losing the route while tracking is not an error; see [`crate::route::Route::update`].

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("malformed polyline at byte {offset}")]
    MalformedPolyline { offset: usize },

    #[error("invalid route JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("route response is missing `{0}`")]
    MissingField(&'static str),

    #[error("maneuver shape index {index} is outside a geometry of {len} waypoints")]
    ShapeIndexOutOfRange { index: usize, len: usize },

    #[error("no route found (status {status})")]
    NoRouteFound { status: i32 },

    #[error("routing service request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl RouteError {
    /// True for the recognized "service answered but found no route" outcome.
    pub fn is_no_route(&self) -> bool {
        matches!(self, RouteError::NoRouteFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;
