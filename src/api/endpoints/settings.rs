//! Alert threshold settings.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::types::ApiContext;
use crate::monitor::StockThresholds;
use crate::store::SettingsUpdate;

/// `GET /api/settings`
pub async fn get(State(ctx): State<ApiContext>) -> Result<Json<StockThresholds>, ApiError> {
    Ok(Json(ctx.store.settings()?))
}

/// `PUT /api/settings`: absent fields keep their value. Alerts are
/// re-evaluated against the new thresholds.
pub async fn update(
    State(ctx): State<ApiContext>,
    ApiJson(update): ApiJson<SettingsUpdate>,
) -> Result<Json<StockThresholds>, ApiError> {
    let settings = ctx.store.update_settings(update)?;
    tracing::info!(
        expiry_threshold_days = settings.expiry_threshold_days,
        low_stock_quantity = settings.low_stock_quantity,
        "Settings updated"
    );
    Ok(Json(settings))
}
