//! Medication reminder endpoints. Reminders are stored for the front end;
//! nothing in this service delivers them.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::types::ApiContext;
use crate::models::{MedicationReminder, ReminderDraft};

/// `GET /api/reminders`: newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<MedicationReminder>>, ApiError> {
    Ok(Json(ctx.store.reminders()?))
}

/// `POST /api/reminders`
pub async fn add(
    State(ctx): State<ApiContext>,
    ApiJson(draft): ApiJson<ReminderDraft>,
) -> Result<(StatusCode, Json<MedicationReminder>), ApiError> {
    let reminder = ctx.store.add_reminder(draft)?;
    tracing::info!(reminder_id = %reminder.id, "Reminder created");
    Ok((StatusCode::CREATED, Json(reminder)))
}

/// `DELETE /api/reminders/:id`
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.store.delete_reminder(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
