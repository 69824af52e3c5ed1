//! # Method Dispatch Pipeline
//!
//! Routes a raw JSON body through envelope validation, authentication and
//! method resolution to a business handler:
//!
//! ```text
//! body → envelope schema → auth verifier → method match
//!      → handler.validate(arguments) → handler.execute(request, env, ctx)
//! ```
//!
//! Handlers implement the [`MethodHandler`] capability interface — one
//! concrete implementation per method name, selected through the fixed
//! mapping in [`dispatch`].

use scoring_core::{MethodCall, ValidationErrors};
use scoring_store::Store;
use serde_json::{Map, Value};

use crate::auth::{authenticate, AuthContext};
use crate::error::ApiError;
use crate::handlers::{ClientsInterestsHandler, OnlineScoreHandler};
use crate::state::AppState;

/// Mutable side channel recording audit facts about one request; consumed
/// by logging after the response is produced. Owned by the call, never
/// shared across invocations.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Propagated `X-Request-Id` header value or a generated id.
    pub request_id: String,
    /// Online-score: which fields the caller supplied.
    pub has: Vec<String>,
    /// Clients-interests: how many client ids were processed.
    pub nclients: Option<usize>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            has: Vec::new(),
            nclients: None,
        }
    }
}

/// Per-call environment handed to handlers: the authenticated identity and
/// the shared store client.
pub struct CallEnv<'a> {
    pub auth: AuthContext,
    pub store: &'a Store,
}

/// Capability interface implemented once per method name.
pub trait MethodHandler {
    /// The validated, typed request this handler consumes.
    type Request;

    /// Validate raw method arguments into the typed request, aggregating
    /// every violation.
    fn validate(&self, args: &Map<String, Value>) -> Result<Self::Request, ValidationErrors>;

    /// Run the business logic. `ctx` receives audit facts.
    fn execute(
        &self,
        request: Self::Request,
        env: &CallEnv<'_>,
        ctx: &mut RequestContext,
    ) -> Result<Value, ApiError>;
}

/// Dispatch one method call.
///
/// Maps each pipeline stage to its wire status: envelope or argument
/// validation failure → 422, authentication failure → 403, unknown
/// method → 404; the handler result is the 200 response body.
pub fn dispatch(
    body: &Value,
    state: &AppState,
    ctx: &mut RequestContext,
) -> Result<Value, ApiError> {
    let call =
        MethodCall::from_value(body).map_err(|e| ApiError::Validation(e.to_string()))?;

    let Some(auth) = authenticate(&state.auth, &call) else {
        tracing::info!(
            request_id = %ctx.request_id,
            login = %call.login,
            "authentication failed"
        );
        return Err(ApiError::Forbidden);
    };

    tracing::debug!(
        request_id = %ctx.request_id,
        login = %auth.login,
        is_admin = auth.is_admin,
        method = %call.method,
        "dispatching method call"
    );

    let env = CallEnv {
        auth,
        store: &state.store,
    };

    match call.method.as_str() {
        "online_score" => run(&OnlineScoreHandler, &call.arguments, &env, ctx),
        "clients_interests" => run(&ClientsInterestsHandler, &call.arguments, &env, ctx),
        _ => Err(ApiError::NotFound),
    }
}

/// Compose the two handler capabilities: validate, then execute.
fn run<H: MethodHandler>(
    handler: &H,
    args: &Map<String, Value>,
    env: &CallEnv<'_>,
    ctx: &mut RequestContext,
) -> Result<Value, ApiError> {
    let request = handler
        .validate(args)
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    handler.execute(request, env, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{admin_digest, user_digest, AuthConfig};
    use serde_json::json;

    fn state() -> AppState {
        AppState::new()
    }

    fn user_body(args: Value, method: &str) -> Value {
        let config = AuthConfig::default();
        json!({
            "account": "horns&hoofs",
            "login": "h&f",
            "token": user_digest(&config, "horns&hoofs", "h&f"),
            "arguments": args,
            "method": method,
        })
    }

    #[test]
    fn invalid_envelope_is_a_validation_error() {
        let state = state();
        let mut ctx = RequestContext::new("t");
        let err = dispatch(&json!({"account": "x"}), &state, &mut ctx).unwrap_err();
        match err {
            ApiError::Validation(message) => {
                assert!(message.contains("login: field is required"), "got: {message}");
                assert!(message.contains("method: field is required"), "got: {message}");
            }
            other => panic!("expected Validation, got: {other:?}"),
        }
    }

    #[test]
    fn bad_token_is_forbidden() {
        let state = state();
        let mut ctx = RequestContext::new("t");
        let body = json!({
            "account": "horns&hoofs",
            "login": "h&f",
            "token": "sdd",
            "arguments": {"phone": "79175002040", "email": "a@b.ru"},
            "method": "online_score",
        });
        let err = dispatch(&body, &state, &mut ctx).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[test]
    fn unknown_method_is_not_found() {
        let state = state();
        let mut ctx = RequestContext::new("t");
        let body = user_body(json!({}), "fortune_teller");
        let err = dispatch(&body, &state, &mut ctx).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn invalid_method_arguments_are_a_validation_error() {
        let state = state();
        let mut ctx = RequestContext::new("t");
        let body = user_body(json!({"phone": "123"}), "online_score");
        let err = dispatch(&body, &state, &mut ctx).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn valid_score_call_returns_a_bounded_score() {
        let state = state();
        let mut ctx = RequestContext::new("t");
        let body = user_body(
            json!({"phone": "79175002040", "email": "a@b.ru"}),
            "online_score",
        );
        let response = dispatch(&body, &state, &mut ctx).unwrap();
        let score = response["score"].as_i64().unwrap();
        assert!((0..100).contains(&score), "score out of range: {score}");
        assert_eq!(ctx.has, ["email", "phone"]);
    }

    #[test]
    fn admin_score_is_fixed() {
        let config = AuthConfig::default();
        let state = state();
        let mut ctx = RequestContext::new("t");
        let body = json!({
            "account": "",
            "login": "admin",
            "token": admin_digest(&config),
            "arguments": {"phone": "79175002040", "email": "a@b.ru"},
            "method": "online_score",
        });
        let response = dispatch(&body, &state, &mut ctx).unwrap();
        assert_eq!(response["score"].as_i64(), Some(42));
    }

    #[test]
    fn interests_call_records_client_count() {
        let state = state();
        let mut ctx = RequestContext::new("t");
        let body = user_body(
            json!({"client_ids": [1, 2, 3, 4], "date": "20.07.2017"}),
            "clients_interests",
        );
        let response = dispatch(&body, &state, &mut ctx).unwrap();
        assert_eq!(response.as_object().unwrap().len(), 4);
        assert_eq!(ctx.nclients, Some(4));
    }
}
