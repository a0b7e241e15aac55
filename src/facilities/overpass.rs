//! OpenStreetMap Overpass place source.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use super::{FacilityError, HealthcarePlace, PlaceSource, SearchArea, USER_AGENT};
use crate::models::enums::FacilityCategory;

/// OSM amenity values queried, in query order.
const AMENITIES: &[&str] = &["hospital", "pharmacy", "clinic", "doctors"];

/// Server-side query timeout, seconds.
const QUERY_TIMEOUT_SECS: u32 = 25;

pub struct OverpassProvider {
    url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

#[derive(Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    id: u64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<Center>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct Center {
    lat: f64,
    lon: f64,
}

impl OverpassProvider {
    pub fn new(url: &str, timeout: Duration, connect_timeout: Duration) -> Result<Self, FacilityError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FacilityError::HttpClient(e.to_string()))?;
        Ok(Self {
            url: url.to_string(),
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

impl PlaceSource for OverpassProvider {
    fn nearby(&self, area: &SearchArea) -> Result<Vec<HealthcarePlace>, FacilityError> {
        let response = self
            .client
            .post(&self.url)
            .body(build_query(area))
            .send()
            .map_err(|e| FacilityError::from_reqwest(e, &self.url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FacilityError::Status(status.as_u16()));
        }

        let parsed: OverpassResponse = response
            .json()
            .map_err(|e| FacilityError::ResponseParsing(e.to_string()))?;

        let places: Vec<_> = parsed.elements.iter().filter_map(element_to_place).collect();
        tracing::debug!(
            elements = parsed.elements.len(),
            places = places.len(),
            "Overpass query answered"
        );
        Ok(places)
    }
}

/// Overpass QL for every amenity, nodes and ways, with way centres.
pub fn build_query(area: &SearchArea) -> String {
    let around = format!("(around:{},{},{})", area.radius, area.lat, area.lon);
    let mut query = format!("[out:json][timeout:{QUERY_TIMEOUT_SECS}];\n(\n");
    for amenity in AMENITIES {
        for kind in ["node", "way"] {
            query.push_str(&format!("  {kind}[\"amenity\"=\"{amenity}\"]{around};\n"));
        }
    }
    query.push_str(");\nout center;\n");
    query
}

fn category_for(amenity: Option<&str>) -> FacilityCategory {
    match amenity {
        Some("hospital") => FacilityCategory::Hospital,
        Some("pharmacy") => FacilityCategory::Pharmacy,
        _ => FacilityCategory::Clinic,
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Join `addr:*` parts, falling back to `addr:full`.
pub fn format_address(tags: &HashMap<String, String>) -> String {
    let parts: Vec<&str> = ["addr:housenumber", "addr:street", "addr:city", "addr:postcode"]
        .iter()
        .filter_map(|key| tags.get(*key).map(String::as_str))
        .collect();

    if !parts.is_empty() {
        return parts.join(", ");
    }
    tags.get("addr:full")
        .cloned()
        .unwrap_or_else(|| "Address not available".into())
}

/// Elements without coordinates or a centre are skipped.
fn element_to_place(element: &OverpassElement) -> Option<HealthcarePlace> {
    let (lat, lon) = match (element.lat, element.lon, &element.center) {
        (Some(lat), Some(lon), _) => (lat, lon),
        (_, _, Some(center)) => (center.lat, center.lon),
        _ => return None,
    };

    let category = category_for(element.tags.get("amenity").map(String::as_str));
    let non_empty = |key: &str| element.tags.get(key).filter(|v| !v.is_empty()).cloned();

    Some(HealthcarePlace {
        id: element.id,
        name: element
            .tags
            .get("name")
            .cloned()
            .unwrap_or_else(|| format!("Unnamed {}", title_case(category.as_str()))),
        address: format_address(&element.tags),
        category,
        lat,
        lon,
        phone: non_empty("phone"),
        website: non_empty("website"),
        opening_hours: non_empty("opening_hours"),
        distance_m: None,
    })
}
