//! Static method + path table for the API.

pub mod auth;
pub mod plans;

use axum::{
    extract::{OriginalUri, Request},
    http::{Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;

pub const WELCOME: &str = "Welcome to ONE - Intermittent Fasting API";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome).fallback(not_found))
        .nest("/fasting", plans::router())
        .nest("/api/auth", auth::router())
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn welcome() -> &'static str {
    WELCOME
}

async fn log_request(request: Request, next: Next) -> Response {
    info!(method = %request.method(), uri = %request.uri(), "incoming request");
    next.run(request).await
}

/// Unmatched path or method. Reports the full original path, prefix included.
pub(crate) async fn not_found(
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": format!(
                "Cannot {method} {uri}. Are you sure you're sending the request to the correct backend port? (e.g., http://localhost:5001)"
            )
        })),
    )
}
