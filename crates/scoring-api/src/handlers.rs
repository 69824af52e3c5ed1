//! # Business Handlers
//!
//! One [`MethodHandler`] implementation per method name:
//!
//! - `online_score` — fixed maximal score for the administrator, otherwise
//!   a cached-or-random score in `0..100`.
//! - `clients_interests` — a fixed-size sample from a static interest
//!   vocabulary per client id.

use rand::seq::SliceRandom;
use rand::Rng;
use scoring_core::{
    ClientsInterestsArgs, OnlineScoreArgs, ValidationErrors, DATE_FORMAT,
};
use scoring_store::Store;
use serde_json::{json, Map, Value};

use crate::auth::sha512_hex;
use crate::dispatch::{CallEnv, MethodHandler, RequestContext};
use crate::error::ApiError;

/// Score always returned to the administrator.
pub const ADMIN_SCORE: i64 = 42;

/// Upper bound (exclusive) of the non-admin score range.
pub const SCORE_CEILING: i64 = 100;

/// Static interest vocabulary sampled by `clients_interests`.
pub const INTERESTS: [&str; 8] = [
    "books", "hi-tech", "pets", "tv", "travel", "music", "cinema", "geek",
];

/// How many interests every client id receives.
pub const INTERESTS_SAMPLE_SIZE: usize = 2;

/// Handler for the `online_score` method.
pub struct OnlineScoreHandler;

impl MethodHandler for OnlineScoreHandler {
    type Request = OnlineScoreArgs;

    fn validate(&self, args: &Map<String, Value>) -> Result<Self::Request, ValidationErrors> {
        OnlineScoreArgs::from_args(args)
    }

    fn execute(
        &self,
        request: Self::Request,
        env: &CallEnv<'_>,
        ctx: &mut RequestContext,
    ) -> Result<Value, ApiError> {
        ctx.has = request.supplied.clone();
        let score = if env.auth.is_admin {
            ADMIN_SCORE
        } else {
            cached_or_fresh_score(env.store, &request)
        };
        Ok(json!({ "score": score }))
    }
}

/// Look up a previously computed score for this subject, drawing and
/// caching a fresh one on a miss.
///
/// Both store paths are soft here: a read outage behaves as a miss, and a
/// failed write-back only costs the next request a recomputation.
fn cached_or_fresh_score(store: &Store, request: &OnlineScoreArgs) -> i64 {
    let key = score_cache_key(request);

    if let Some(cached) = store.cache_get(&key) {
        match cached.parse::<i64>() {
            Ok(score) => return score,
            Err(_) => {
                tracing::warn!(key, cached, "discarding unparsable cached score");
            }
        }
    }

    let score = rand::thread_rng().gen_range(0..SCORE_CEILING);
    if let Err(e) = store.cache_set(&key, &score.to_string()) {
        tracing::warn!(key, error = %e, "failed to cache computed score");
    }
    score
}

/// Cache key derived from the subject's identifying fields.
fn score_cache_key(request: &OnlineScoreArgs) -> String {
    let birthday = request
        .birthday
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default();
    let material = format!(
        "{}:{}:{}:{}",
        request.first_name.as_deref().unwrap_or(""),
        request.last_name.as_deref().unwrap_or(""),
        request.phone.as_deref().unwrap_or(""),
        birthday,
    );
    format!("uid:{}", sha512_hex(&material))
}

/// Handler for the `clients_interests` method.
pub struct ClientsInterestsHandler;

impl MethodHandler for ClientsInterestsHandler {
    type Request = ClientsInterestsArgs;

    fn validate(&self, args: &Map<String, Value>) -> Result<Self::Request, ValidationErrors> {
        ClientsInterestsArgs::from_args(args)
    }

    fn execute(
        &self,
        request: Self::Request,
        _env: &CallEnv<'_>,
        ctx: &mut RequestContext,
    ) -> Result<Value, ApiError> {
        ctx.nclients = Some(request.client_ids.len());

        let mut rng = rand::thread_rng();
        let mut response = Map::new();
        for client_id in &request.client_ids {
            let sample: Vec<&str> = INTERESTS
                .choose_multiple(&mut rng, INTERESTS_SAMPLE_SIZE)
                .copied()
                .collect();
            response.insert(client_id.to_string(), json!(sample));
        }
        Ok(Value::Object(response))
    }
}
