// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::HeaderMap, http::StatusCode};

use crate::auth::{extractor::bearer_token, AuthError, Authenticated};
use crate::state::AppState;

/// Drop the caller's token from the validation cache.
///
/// The next request with the same token is validated remotely again, so a
/// revocation at the authorization server takes effect immediately.
#[utoipa::path(
    delete,
    path = "/v1/session",
    tag = "Identity",
    responses(
        (status = 204, description = "Cached validation dropped"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = []))
)]
pub async fn end_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Authenticated(principal): Authenticated,
) -> Result<StatusCode, AuthError> {
    let token = bearer_token(&headers)?;
    state.tokens.invalidate(token);

    tracing::debug!(
        client_id = principal.client_id.as_deref().unwrap_or_default(),
        "Session ended, cached validation dropped"
    );
    Ok(StatusCode::NO_CONTENT)
}
