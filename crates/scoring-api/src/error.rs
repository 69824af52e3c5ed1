//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Every failure leaving the dispatch pipeline maps to the wire envelope
//! `{"error": <message or fixed phrase>, "code": <status>}`. Authentication
//! and internal failures never leak their cause to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Wire envelope for failed method calls.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Joined validation message, or the fixed phrase for the status.
    pub error: String,
    /// The HTTP status, repeated in the body per the wire contract.
    pub code: u16,
}

/// Failures of the dispatch pipeline.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request body is not valid JSON (400). Set by the transport,
    /// never by the dispatcher.
    #[error("bad request")]
    BadRequest,

    /// Authentication failed (403). Carries no reason by design.
    #[error("forbidden")]
    Forbidden,

    /// The method name resolves to no handler (404).
    #[error("not found")]
    NotFound,

    /// Envelope or method-argument validation failed (422); the message
    /// is the aggregated violation list joined with `", "`.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Unexpected internal failure (500). The message is logged and
    /// replaced by the fixed phrase on the wire.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The fixed phrase used when an error carries no specific message.
    pub fn status_phrase(status: StatusCode) -> &'static str {
        match status {
            StatusCode::BAD_REQUEST => "Bad Request",
            StatusCode::FORBIDDEN => "Forbidden",
            StatusCode::NOT_FOUND => "Not Found",
            StatusCode::UNPROCESSABLE_ENTITY => "Invalid Request",
            StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error",
            _ => "Unknown Error",
        }
    }

    /// The message placed in the wire envelope.
    fn wire_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            other => Self::status_phrase(other.status()).to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal failures are logged for the operator and masked on the
        // wire; authentication failures are not logged with a reason
        // because none is kept.
        if let Self::Internal(_) = &self {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: self.wire_message(),
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
