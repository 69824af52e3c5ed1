//! # scoring-api — Authentication, Dispatch & Transport
//!
//! The top layer of the scoring API. Assembles the validation framework
//! (`scoring-core`) and the resilient store client (`scoring-store`) into
//! a dispatch pipeline and exposes it over HTTP via axum.
//!
//! ## API Surface
//!
//! | Method | Path                | Behavior                              |
//! |--------|---------------------|---------------------------------------|
//! | `POST` | `/method`           | Validate, authenticate and dispatch a |
//! |        |                     | JSON method-call envelope             |
//! | `GET`  | `/health/liveness`  | Process liveness probe                |
//!
//! ## Wire Envelope
//!
//! Success: `{"response": <handler result>, "code": 200}`.
//! Failure: `{"error": <message or fixed phrase>, "code": <status>}` with
//! statuses 400 (malformed body), 403 (forbidden), 404 (unknown method),
//! 422 (validation failed), 500 (internal).
//!
//! ## Crate Policy
//!
//! - No business logic in the route handler — it parses the body, runs
//!   [`dispatch::dispatch`] and wraps the outcome.
//! - Requests are processed independently; state shared between them is
//!   limited to the immutable auth config and the store client.

pub mod auth;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod state;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

use dispatch::RequestContext;

/// Wire envelope for successful method calls.
#[derive(Debug, Serialize)]
struct ResponseBody {
    response: Value,
    code: u16,
}

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/method", post(method_call))
        .route("/health/liveness", get(liveness))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /method — validate, authenticate and dispatch one method call.
///
/// The body is read raw so that malformed JSON maps to the 400 wire
/// envelope here at the transport boundary, before the dispatcher runs.
async fn method_call(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
    let mut ctx = RequestContext::new(request_id);

    let parsed: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::info!(request_id = %ctx.request_id, error = %e, "malformed request body");
            return ApiError::BadRequest.into_response();
        }
    };

    match dispatch::dispatch(&parsed, &state, &mut ctx) {
        Ok(response) => {
            tracing::info!(
                request_id = %ctx.request_id,
                has = ?ctx.has,
                nclients = ctx.nclients,
                "method call succeeded"
            );
            (
                StatusCode::OK,
                Json(ResponseBody {
                    response,
                    code: StatusCode::OK.as_u16(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::info!(
                request_id = %ctx.request_id,
                status = e.status().as_u16(),
                "method call failed"
            );
            e.into_response()
        }
    }
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}
