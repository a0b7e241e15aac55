//! Health claim fact-check endpoint.

use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::factcheck::{self, FactCheckRecord};

#[derive(Deserialize)]
pub struct ClaimRequest {
    pub claim: String,
}

/// `POST /api/claims/check`: first matching topic wins; anything else is
/// reported as unverified.
pub async fn check(
    ApiJson(req): ApiJson<ClaimRequest>,
) -> Result<Json<FactCheckRecord>, ApiError> {
    if req.claim.trim().is_empty() {
        return Err(ApiError::BadRequest("Claim cannot be empty".into()));
    }
    Ok(Json(factcheck::verify(&req.claim)))
}
