//! Healthcare facility endpoints.
//!
//! Both lookups fall back to built-in data when the upstream service
//! fails; the `fallback` flag tells the front end which it got.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::types::ApiContext;
use crate::facilities::{self, NearbyResult, SearchArea, SearchResult};

#[derive(Deserialize)]
pub struct NearbyRequest {
    pub lat: f64,
    pub lon: f64,
    pub radius: Option<u32>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

/// `POST /api/facilities/nearby`
pub async fn nearby(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<NearbyRequest>,
) -> Result<Json<NearbyResult>, ApiError> {
    let area = SearchArea::new(req.lat, req.lon, req.radius)?;
    let places = ctx.places.clone();
    let result =
        tokio::task::spawn_blocking(move || facilities::locate_nearby(places.as_ref(), area))
            .await?;
    Ok(Json(result))
}

/// `GET /api/facilities/search?query=`
pub async fn search(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<SearchResult>, ApiError> {
    if query.query.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing query parameter".into()));
    }
    let source = ctx.search.clone();
    let result = tokio::task::spawn_blocking(move || {
        facilities::search_location(source.as_ref(), &query.query)
    })
    .await??;
    Ok(Json(result))
}
