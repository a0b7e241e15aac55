//! OpenStreetMap Nominatim place search.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{mock, FacilityError, Location, LocationSearch, USER_AGENT};

/// Maximum number of search hits.
pub const SEARCH_LIMIT: usize = 5;

pub struct NominatimProvider {
    url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

/// Nominatim returns coordinates as strings.
#[derive(Deserialize)]
struct NominatimHit {
    display_name: String,
    lat: String,
    lon: String,
}

impl NominatimProvider {
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

impl LocationSearch for NominatimProvider {
    fn search(&self, query: &str) -> Result<Vec<Location>, FacilityError> {
        let limit = SEARCH_LIMIT.to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[("q", query), ("format", "json"), ("limit", limit.as_str())])
            .send()
            .map_err(|e| FacilityError::from_reqwest(e, &self.url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FacilityError::Status(status.as_u16()));
        }

        let hits: Vec<NominatimHit> = response
            .json()
            .map_err(|e| FacilityError::ResponseParsing(e.to_string()))?;
        hits.into_iter().map(hit_to_location).collect()
    }
}

fn hit_to_location(hit: NominatimHit) -> Result<Location, FacilityError> {
    let parse = |raw: &str| {
        raw.parse::<f64>()
            .map_err(|_| FacilityError::ResponseParsing(format!("bad coordinate: {raw}")))
    };
    Ok(Location {
        lat: parse(&hit.lat)?,
        lon: parse(&hit.lon)?,
        name: hit.display_name,
    })
}

/// Search hits, and whether the built-in location stood in for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub results: Vec<Location>,
    pub fallback: bool,
}

/// Search for a place by name. A blank query is rejected; a failing
/// search service yields the built-in location.
pub fn search_location(source: &dyn LocationSearch, query: &str) -> Result<SearchResult, FacilityError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(FacilityError::EmptyQuery);
    }

    match source.search(query) {
        Ok(mut results) => {
            results.truncate(SEARCH_LIMIT);
            Ok(SearchResult {
                results,
                fallback: false,
            })
        }
        Err(e) => {
            tracing::warn!(error = %e, "Place search unavailable, using built-in location");
            Ok(SearchResult {
                results: vec![mock::mock_location()],
                fallback: true,
            })
        }
    }
}

#[cfg(test)]
pub(crate) struct StaticSearch(pub Result<Vec<Location>, u16>);

#[cfg(test)]
impl LocationSearch for StaticSearch {
    fn search(&self, _query: &str) -> Result<Vec<Location>, FacilityError> {
        self.0.clone().map_err(FacilityError::Status)
    }
}
