// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{principal::claim_types, ClientOnly, Principal, UserOrClient};

/// Caller identity as seen by the gate.
#[derive(Debug, Serialize, ToSchema)]
pub struct CallerResponse {
    /// `true` when the caller is a signed-in user.
    pub is_user: bool,
    /// Scopes granted to the token.
    pub scopes: Vec<String>,
    pub principal: Principal,
}

/// Client ping response.
#[derive(Debug, Serialize, ToSchema)]
pub struct PingResponse {
    pub client_id: String,
}

/// Return the calling user or client.
#[utoipa::path(
    get,
    path = "/v1/me",
    tag = "Identity",
    responses(
        (status = 200, description = "Caller identity", body = CallerResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Neither a user nor a registered client")
    ),
    security(("bearer" = []))
)]
pub async fn me(UserOrClient(principal): UserOrClient) -> Json<CallerResponse> {
    Json(CallerResponse {
        is_user: principal.is_authenticated_user(),
        scopes: principal
            .claim_values(claim_types::SCOPE)
            .map(str::to_string)
            .collect(),
        principal,
    })
}

/// Connectivity check for registered machine clients.
#[utoipa::path(
    get,
    path = "/v1/client/ping",
    tag = "Identity",
    responses(
        (status = 200, description = "Caller is a registered client", body = PingResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not a registered client")
    ),
    security(("bearer" = []))
)]
pub async fn client_ping(ClientOnly(principal): ClientOnly) -> Json<PingResponse> {
    Json(PingResponse {
        client_id: principal.client_id.unwrap_or_default(),
    })
}
