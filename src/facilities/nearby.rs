use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{mock, FacilityError, HealthcarePlace, PlaceSource, SearchArea};

/// Places around a point, and whether they came from the built-in list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyResult {
    pub center: SearchArea,
    pub count: usize,
    pub places: Vec<HealthcarePlace>,
    pub fallback: bool,
}

/// Client for a remote `/nearby` service.
pub struct NearbyClient {
    url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct NearbyRequest {
    lat: f64,
    lon: f64,
    radius: u32,
}

#[derive(Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    places: Vec<HealthcarePlace>,
    error: Option<String>,
}

impl NearbyClient {
    pub fn new(url: &str, timeout: Duration, connect_timeout: Duration) -> Result<Self, FacilityError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| FacilityError::HttpClient(e.to_string()))?;
        Ok(Self {
            url: url.to_string(),
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

impl PlaceSource for NearbyClient {
    fn nearby(&self, area: &SearchArea) -> Result<Vec<HealthcarePlace>, FacilityError> {
        let body = NearbyRequest {
            lat: area.lat,
            lon: area.lon,
            radius: area.radius,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| FacilityError::from_reqwest(e, &self.url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FacilityError::Status(status.as_u16()));
        }

        let parsed: NearbyResponse = response
            .json()
            .map_err(|e| FacilityError::ResponseParsing(e.to_string()))?;
        into_places(parsed)
    }
}

fn into_places(response: NearbyResponse) -> Result<Vec<HealthcarePlace>, FacilityError> {
    if response.success {
        Ok(response.places)
    } else {
        Err(FacilityError::Service(
            response
                .error
                .unwrap_or_else(|| "Failed to fetch places".into()),
        ))
    }
}

/// Ask `source` for places; on any failure use the built-in list,
/// filtered to the radius.
pub fn locate_nearby(source: &dyn PlaceSource, area: SearchArea) -> NearbyResult {
    let (places, fallback) = match source.nearby(&area) {
        Ok(places) => (places, false),
        Err(e) => {
            tracing::warn!(error = %e, "Place source unavailable, using built-in places");
            (mock::mock_nearby(&area), true)
        }
    };

    NearbyResult {
        center: area,
        count: places.len(),
        places,
        fallback,
    }
}

#[cfg(test)]
pub(crate) struct StaticPlaces(pub Result<Vec<HealthcarePlace>, u16>);

#[cfg(test)]
impl PlaceSource for StaticPlaces {
    fn nearby(&self, _area: &SearchArea) -> Result<Vec<HealthcarePlace>, FacilityError> {
        self.0.clone().map_err(FacilityError::Status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::FacilityCategory;

    fn downtown() -> SearchArea {
        SearchArea::new(40.7589, -73.9851, Some(1000)).unwrap()
    }

    #[test]
    fn source_places_are_returned_as_is() {
        let place = HealthcarePlace {
            id: 42,
            name: "Remote Clinic".into(),
            address: "Address not available".into(),
            category: FacilityCategory::Clinic,
            lat: 1.0,
            lon: 2.0,
            phone: None,
            website: None,
            opening_hours: None,
            distance_m: None,
        };
        let result = locate_nearby(&StaticPlaces(Ok(vec![place.clone()])), downtown());
        assert!(!result.fallback);
        assert_eq!(result.count, 1);
        assert_eq!(result.places, vec![place]);
    }

    #[test]
    fn empty_source_result_is_not_a_failure() {
        let result = locate_nearby(&StaticPlaces(Ok(Vec::new())), downtown());
        assert!(!result.fallback);
        assert!(result.places.is_empty());
    }

    #[test]
    fn failure_falls_back_to_mock_within_radius() {
        let result = locate_nearby(&StaticPlaces(Err(502)), downtown());
        assert!(result.fallback);
        assert_eq!(result.count, 2);
        assert!(result.places.iter().all(|p| p.distance_m.is_some()));
    }

    #[test]
    fn unsuccessful_body_is_an_error() {
        let response: NearbyResponse =
            serde_json::from_str(r#"{"success":false,"error":"Invalid coordinates"}"#).unwrap();
        assert!(matches!(
            into_places(response),
            Err(FacilityError::Service(msg)) if msg == "Invalid coordinates"
        ));
    }

    #[test]
    fn remote_body_parses() {
        let response: NearbyResponse = serde_json::from_str(
            r#"{"success":true,"count":1,"center":{"lat":1,"lon":2},
                "places":[{"id":7,"name":"X","address":"Y","category":"pharmacy",
                           "lat":1.0,"lon":2.0,"phone":"","website":"","opening_hours":""}]}"#,
        )
        .unwrap();
        let places = into_places(response).unwrap();
        assert_eq!(places[0].category, FacilityCategory::Pharmacy);
    }
}
