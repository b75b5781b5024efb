//! Registration and login placeholders. Neither reads nor writes users.

use axum::{body::Bytes, routing::post, Json, Router};
use tracing::info;

use super::not_found;
use crate::error::MessageResponse;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register).fallback(not_found))
        .route("/login", post(login).fallback(not_found))
}

/// Pull `email` out of a credentials body for logging; never the password.
fn requested_email(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value.get("email")?.as_str().map(str::to_string)
}

async fn register(body: Bytes) -> Json<MessageResponse> {
    info!(email = ?requested_email(&body), "register endpoint reached");
    Json(MessageResponse::new("Test response from /api/auth/register"))
}

async fn login(body: Bytes) -> Json<MessageResponse> {
    info!(email = ?requested_email(&body), "login endpoint reached");
    Json(MessageResponse::new("User logged in successfully (stub)"))
}
