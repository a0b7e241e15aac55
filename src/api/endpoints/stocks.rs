//! Medicine stock endpoints.
//!
//! Every mutation re-runs the stock monitor inside the store, so the
//! alert list is current by the time the response is sent.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::types::ApiContext;
use crate::models::MedicineStock;
use crate::store::StockDraft;

fn validate(draft: &StockDraft) -> Result<(), ApiError> {
    if draft.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Medicine name cannot be empty".into()));
    }
    if draft.expiry_date.trim().is_empty() {
        return Err(ApiError::BadRequest("Expiry date cannot be empty".into()));
    }
    Ok(())
}

/// `GET /api/stocks`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<MedicineStock>>, ApiError> {
    Ok(Json(ctx.store.stocks()?))
}

/// `POST /api/stocks`
pub async fn add(
    State(ctx): State<ApiContext>,
    ApiJson(draft): ApiJson<StockDraft>,
) -> Result<(StatusCode, Json<MedicineStock>), ApiError> {
    validate(&draft)?;
    let stock = ctx.store.add_stock(draft)?;
    tracing::info!(stock_id = %stock.id, "Stock item added");
    Ok((StatusCode::CREATED, Json(stock)))
}

/// `PUT /api/stocks/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    ApiJson(draft): ApiJson<StockDraft>,
) -> Result<Json<MedicineStock>, ApiError> {
    validate(&draft)?;
    Ok(Json(ctx.store.update_stock(&id, draft)?))
}

/// `DELETE /api/stocks/:id`
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.store.delete_stock(&id)?;
    tracing::info!(stock_id = %id, "Stock item deleted");
    Ok(StatusCode::NO_CONTENT)
}
