use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// `{ "message": ... }` body used for confirmations and failures alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Fasting plan not found.")]
    PlanNotFound,

    #[error("Invalid fasting plan id.")]
    InvalidPlanId,

    /// Any store failure. Only the static message reaches the client.
    #[error("{message}")]
    Internal {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::PlanNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidPlanId => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(MessageResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvalidPlanId;

    #[test]
    fn internal_errors_hide_their_source() {
        let err = AppError::Internal {
            message: "Error creating fasting plan.",
            source: StoreError::InvalidId(InvalidPlanId("sql detail".to_string())),
        };
        assert_eq!(err.to_string(), "Error creating fasting plan.");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(
            AppError::PlanNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidPlanId.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
