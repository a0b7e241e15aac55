//! Medication information endpoint.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::ai::MedicationInfo;
use crate::api::error::ApiError;
use crate::api::extract::ApiQuery;
use crate::api::types::ApiContext;

#[derive(Deserialize)]
pub struct InfoQuery {
    #[serde(default)]
    pub name: String,
}

/// `GET /api/medications/info?name=`: short AI-written summary, split
/// into titled sections.
pub async fn info(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<InfoQuery>,
) -> Result<Json<MedicationInfo>, ApiError> {
    let name = query.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Medication name cannot be empty".into()));
    }

    let assistant = ctx.assistant.clone();
    let info = tokio::task::spawn_blocking(move || assistant.medication_info(&name)).await??;
    Ok(Json(info))
}
