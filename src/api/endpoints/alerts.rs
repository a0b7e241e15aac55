//! Alert endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::Alert;

#[derive(Serialize)]
pub struct AlertsResponse {
    pub alerts: Vec<Alert>,
    pub unread: usize,
}

/// `GET /api/alerts`: newest first, with the unread badge count.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<AlertsResponse>, ApiError> {
    let alerts = ctx.store.alerts()?;
    let unread = ctx.store.unread_alert_count()?;
    Ok(Json(AlertsResponse { alerts, unread }))
}

/// `POST /api/alerts/:id/read`
pub async fn mark_read(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Alert>, ApiError> {
    Ok(Json(ctx.store.mark_alert_read(&id)?))
}
