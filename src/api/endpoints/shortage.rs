//! Drug shortage prediction endpoint.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::types::ApiContext;
use crate::shortage::{self, ShortageEstimate};

/// Extra fields the front end sends (location, quantity) are accepted
/// and ignored.
#[derive(Deserialize)]
pub struct PredictRequest {
    pub drug_name: String,
}

/// `POST /api/shortage/predict`: an unknown drug is a normal
/// `found: false` result, not an error.
pub async fn predict(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<PredictRequest>,
) -> Result<Json<ShortageEstimate>, ApiError> {
    if req.drug_name.trim().is_empty() {
        return Err(ApiError::BadRequest("Drug name cannot be empty".into()));
    }

    let today = Utc::now().date_naive();
    let estimate = shortage::estimate(&ctx.catalog, &req.drug_name, today);
    tracing::debug!(drug = %req.drug_name, found = estimate.found, "Shortage estimate");
    Ok(Json(estimate))
}
