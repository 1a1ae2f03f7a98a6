// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::Environment;
use crate::state::AppState;

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness response with auth gate status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall status ("ok" or "degraded").
    pub status: String,
    /// Deployment environment the allow-list was built for.
    pub environment: Environment,
    /// Number of client ids accepted in this environment.
    pub registered_clients: usize,
    /// Principals currently held in the token cache.
    pub cached_tokens: usize,
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler.
///
/// Reports "degraded" when no client is registered for this environment,
/// since every client-only route would then deny. The authorization server
/// is not probed here; an outage shows up as denied requests.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Readiness report", body = ReadyResponse)
    )
)]
pub async fn readiness(State(state): State<AppState>) -> Json<ReadyResponse> {
    let registered_clients = state.allow_list.len();

    Json(ReadyResponse {
        status: if registered_clients > 0 { "ok" } else { "degraded" }.to_string(),
        environment: state.allow_list.environment(),
        registered_clients,
        cached_tokens: state.tokens.len(),
    })
}
