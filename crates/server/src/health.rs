use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use streambot_agent::FallbackDispatcher;

#[derive(Clone)]
pub struct HealthState {
    dispatcher: Arc<FallbackDispatcher>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub models: HealthCheck,
    pub checked_at: String,
}

pub fn router(dispatcher: Arc<FallbackDispatcher>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { dispatcher })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    // A cold candidate cache is normal before the first fallback request;
    // it never degrades readiness.
    let models = match state.dispatcher.cached_candidates() {
        Some(candidates) => HealthCheck {
            status: "primed",
            detail: format!("{} model candidates resolved", candidates.len()),
        },
        None => HealthCheck {
            status: "cold",
            detail: "model candidates not yet resolved".to_string(),
        },
    };

    let payload = HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: "streambot-server runtime initialized".to_string(),
        },
        models,
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}
