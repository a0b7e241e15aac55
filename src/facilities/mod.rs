//! Nearby healthcare facility lookup.
//!
//! Two place sources exist: [`NearbyClient`] calls a remote `/nearby`
//! service, [`OverpassProvider`] queries OpenStreetMap directly. Either way
//! [`locate_nearby`] falls back to a small built-in place list when the
//! source fails.

pub mod mock;
pub mod nearby;
pub mod nominatim;
pub mod overpass;

pub use mock::{mock_location, mock_nearby};
pub use nearby::{locate_nearby, NearbyClient, NearbyResult};
pub use nominatim::{search_location, NominatimProvider, SearchResult};
pub use overpass::OverpassProvider;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DEFAULT_SEARCH_RADIUS_M;
use crate::models::enums::FacilityCategory;

pub const MIN_RADIUS_M: u32 = 100;
pub const MAX_RADIUS_M: u32 = 50_000;

/// User agent sent to OpenStreetMap services.
pub const USER_AGENT: &str = "HealthcareLocator/1.0";

#[derive(Error, Debug)]
pub enum FacilityError {
    #[error("Invalid coordinates: lat {lat}, lon {lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },

    #[error("Radius must be between {MIN_RADIUS_M} and {MAX_RADIUS_M} meters")]
    InvalidRadius(u32),

    #[error("Missing query parameter")]
    EmptyQuery,

    #[error("Place service is not reachable at {0}")]
    Connection(String),

    #[error("Place service timed out after {0}s")]
    Timeout(u64),

    #[error("Place service returned status {0}")]
    Status(u16),

    #[error("Place service reported failure: {0}")]
    Service(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

impl FacilityError {
    pub(crate) fn from_reqwest(e: reqwest::Error, url: &str, timeout_secs: u64) -> Self {
        if e.is_connect() {
            Self::Connection(url.to_string())
        } else if e.is_timeout() {
            Self::Timeout(timeout_secs)
        } else {
            Self::HttpClient(e.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthcarePlace {
    pub id: u64,
    pub name: String,
    pub address: String,
    pub category: FacilityCategory,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    /// Rough distance from the search centre, filled in by the mock fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
}

/// A validated search centre and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchArea {
    pub lat: f64,
    pub lon: f64,
    pub radius: u32,
}

impl SearchArea {
    /// Validate coordinates and radius. `radius = None` uses the default.
    pub fn new(lat: f64, lon: f64, radius: Option<u32>) -> Result<Self, FacilityError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(FacilityError::InvalidCoordinates { lat, lon });
        }
        let radius = radius.unwrap_or(DEFAULT_SEARCH_RADIUS_M);
        if !(MIN_RADIUS_M..=MAX_RADIUS_M).contains(&radius) {
            return Err(FacilityError::InvalidRadius(radius));
        }
        Ok(Self { lat, lon, radius })
    }
}

/// A place search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Anything that can list healthcare places around a point.
pub trait PlaceSource: Send + Sync {
    fn nearby(&self, area: &SearchArea) -> Result<Vec<HealthcarePlace>, FacilityError>;
}

/// Anything that can turn a free-text query into coordinates.
pub trait LocationSearch: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<Location>, FacilityError>;
}
