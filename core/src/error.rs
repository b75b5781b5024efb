//! Errors returned by the plans client.
//!
//! Every failure, whether the server answered with an error status or the
//! request never completed, comes back as an `ApiError` value. Callers branch
//! on [`ApiError::code`] instead of inspecting response shapes.

use thiserror::Error;

use crate::http::TransportError;

/// Flat discriminant of [`ApiError`], for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotFound,
    BadRequest,
    Server,
    UnexpectedStatus,
    Transport,
    Decode,
    Encode,
    InvalidInput,
}

/// Error type for all client operations.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 404: no plan with that id, or the route does not exist.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// 400: the server rejected the request, e.g. a malformed id.
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// 5xx with the server's generic message.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Any other status the operation does not expect.
    #[error("unexpected HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("could not encode request: {0}")]
    Encode(String),

    /// Rejected locally before any request was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::NotFound { .. } => ErrorCode::NotFound,
            ApiError::BadRequest { .. } => ErrorCode::BadRequest,
            ApiError::Server { .. } => ErrorCode::Server,
            ApiError::UnexpectedStatus { .. } => ErrorCode::UnexpectedStatus,
            ApiError::Transport(_) => ErrorCode::Transport,
            ApiError::Decode(_) => ErrorCode::Decode,
            ApiError::Encode(_) => ErrorCode::Encode,
            ApiError::InvalidInput(_) => ErrorCode::InvalidInput,
        }
    }
}
