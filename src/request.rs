//! Route request payload for the routing service.
//!
//! Language and units are always explicit fields of the request; nothing
//! here reads the process locale.

use serde::Serialize;

use crate::error::Result;
use crate::units::DistanceUnits;

/// Highest `sac_scale` hiking difficulty the service accepts.
pub const MAX_HIKING_DIFFICULTY: u8 = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Costing {
    #[default]
    Auto,
    Pedestrian,
    Bicycle,
    Multimodal,
}

/// Narrative language, serialized as its BCP 47 tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Language {
    #[serde(rename = "ca-ES")]
    CaEs,
    #[serde(rename = "cs-CZ")]
    CsCz,
    #[serde(rename = "de-DE")]
    DeDe,
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "en-US-x-pirate")]
    Pirate,
    #[serde(rename = "es-ES")]
    EsEs,
    #[serde(rename = "fr-FR")]
    FrFr,
    #[serde(rename = "hi-IN")]
    HiIn,
    #[serde(rename = "it-IT")]
    ItIt,
    #[serde(rename = "ru-RU")]
    RuRu,
    #[serde(rename = "sl-SI")]
    SlSi,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestLocation {
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl RequestLocation {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ..Default::default()
        }
    }

    /// Direction of travel at this location, degrees clockwise from north.
    pub fn heading(mut self, heading: i32) -> Self {
        self.heading = Some(heading);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn address(
        mut self,
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        self.street = Some(street.into());
        self.city = Some(city.into());
        self.state = Some(state.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectionsOptions {
    pub units: DistanceUnits,
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostingOptions {
    pub pedestrian: PedestrianOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PedestrianOptions {
    pub max_hiking_difficulty: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteRequest {
    pub locations: Vec<RequestLocation>,
    pub costing: Costing,
    pub directions_options: DirectionsOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costing_options: Option<CostingOptions>,
}

impl RouteRequest {
    pub fn new(costing: Costing, directions_options: DirectionsOptions) -> Self {
        Self {
            costing,
            directions_options,
            ..Default::default()
        }
    }

    pub fn location(mut self, location: RequestLocation) -> Self {
        self.locations.push(location);
        self
    }

    /// Caps hiking trail difficulty for pedestrian routes, clamped to 0..=6.
    pub fn max_hiking_difficulty(mut self, difficulty: u8) -> Self {
        self.costing_options = Some(CostingOptions {
            pedestrian: PedestrianOptions {
                max_hiking_difficulty: difficulty.min(MAX_HIKING_DIFFICULTY),
            },
        });
        self
    }

    pub fn clear_locations(&mut self) {
        self.locations.clear();
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
