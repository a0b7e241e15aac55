//! HTTP API router.
//!
//! Returns a composable `Router` with every route under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! CORS → Cache-Control → Extension → Rate limiter → Access log → Handler

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Request body cap for image uploads: 10 MiB of image as base64 JSON.
const UPLOAD_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Build the API router.
///
/// Middleware uses `Extension<ApiContext>` (injected outside the rate
/// limiter). Endpoint handlers use `State<ApiContext>` (via `with_state`).
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/stocks",
            get(endpoints::stocks::list).post(endpoints::stocks::add),
        )
        .route(
            "/stocks/:id",
            put(endpoints::stocks::update).delete(endpoints::stocks::delete),
        )
        .route("/alerts", get(endpoints::alerts::list))
        .route("/alerts/:id/read", post(endpoints::alerts::mark_read))
        .route(
            "/settings",
            get(endpoints::settings::get).put(endpoints::settings::update),
        )
        .route("/prescriptions", get(endpoints::prescriptions::list))
        .route(
            "/prescriptions/upload",
            post(endpoints::prescriptions::upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/chat/history", get(endpoints::chat::history))
        .route("/chat/send", post(endpoints::chat::send))
        .route("/medications/info", get(endpoints::medications::info))
        .route(
            "/reminders",
            get(endpoints::reminders::list).post(endpoints::reminders::add),
        )
        .route("/reminders/:id", axum::routing::delete(endpoints::reminders::delete))
        .route("/shortage/predict", post(endpoints::shortage::predict))
        .route("/claims/check", post(endpoints::claims::check))
        .route("/facilities/nearby", post(endpoints::facilities::nearby))
        .route("/facilities/search", get(endpoints::facilities::search))
        .with_state(ctx.clone())
        // Middleware stack (innermost first, outermost last):
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::middleware::from_fn(middleware::rate::limit))
        // Extension must be outside the middleware that extracts ApiContext
        .layer(axum::Extension(ctx));

    Router::new()
        .nest("/api", routes)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
}
