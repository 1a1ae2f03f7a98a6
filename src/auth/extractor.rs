// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated and authorized callers.
//!
//! ```rust,ignore
//! async fn list_pictures(UserOrClient(principal): UserOrClient) -> impl IntoResponse {
//!     // signed-in user or registered client
//! }
//!
//! async fn push_notifications(ClientOnly(principal): ClientOnly) -> impl IntoResponse {
//!     // registered client only
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::policy::{authorize, AuthorizationRequirement};
use super::{AuthError, Principal};
use crate::state::AppState;

/// Extract the bearer token from the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Resolve the caller's principal, reusing one placed by the middleware.
async fn resolve_principal(parts: &Parts, state: &AppState) -> Result<Principal, AuthError> {
    if let Some(principal) = parts.extensions.get::<Principal>() {
        return Ok(principal.clone());
    }

    let token = bearer_token(&parts.headers)?;
    state.tokens.resolve(token).await
}

async fn require(
    parts: &Parts,
    state: &AppState,
    requirement: AuthorizationRequirement,
) -> Result<Principal, AuthError> {
    let principal = resolve_principal(parts, state).await?;
    authorize(&principal, requirement, &state.allow_list)?;
    Ok(principal)
}

/// Any caller with a validated token.
pub struct Authenticated(pub Principal);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_principal(parts, state).await.map(Authenticated)
    }
}

/// Caller satisfying [`AuthorizationRequirement::UserOrClient`].
pub struct UserOrClient(pub Principal);

impl FromRequestParts<AppState> for UserOrClient {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        require(parts, state, AuthorizationRequirement::UserOrClient)
            .await
            .map(UserOrClient)
    }
}

/// Caller satisfying [`AuthorizationRequirement::ClientOnly`].
pub struct ClientOnly(pub Principal);

impl FromRequestParts<AppState> for ClientOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        require(parts, state, AuthorizationRequirement::ClientOnly)
            .await
            .map(ClientOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::{client_claims, user_claims, MockOutcome, MockValidator};
    use crate::auth::{CacheSettings, ClientAllowList, Environment, TokenValidationCache};
    use axum::http::Request;
    use std::sync::Arc;

    fn state_with(outcome: MockOutcome) -> (AppState, Arc<MockValidator>) {
        let mock = Arc::new(MockValidator::new(outcome));
        let state = AppState::new(
            TokenValidationCache::new(mock.clone(), CacheSettings::default()),
            ClientAllowList::for_environment(["kinaunaclientA"], Environment::Development),
        );
        (state, mock)
    }

    fn parts(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/v1/me");
        if let Some(value) = auth {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingAuthHeader)));

        headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert!(matches!(bearer_token(&headers), Err(AuthError::InvalidAuthHeader)));

        headers.insert(AUTHORIZATION, "Bearer    ".parse().unwrap());
        assert!(matches!(bearer_token(&headers), Err(AuthError::InvalidAuthHeader)));

        headers.insert(AUTHORIZATION, "Bearer abc.def ".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def");
    }

    #[tokio::test]
    async fn missing_header_is_rejected_without_remote_call() {
        let (state, mock) = state_with(MockOutcome::Active(user_claims("x")));
        let mut parts = parts(None);

        let result = Authenticated::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn user_passes_user_or_client() {
        let (state, _) = state_with(MockOutcome::Active(user_claims("kinaunawebclient")));
        let mut parts = parts(Some("Bearer user-token"));

        let UserOrClient(principal) = UserOrClient::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(principal.subject.as_deref(), Some("user_123"));
    }

    #[tokio::test]
    async fn user_fails_client_only() {
        let (state, _) = state_with(MockOutcome::Active(user_claims("kinaunawebclient")));
        let mut parts = parts(Some("Bearer user-token"));

        let result = ClientOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::PolicyDenied)));
    }

    #[tokio::test]
    async fn registered_client_passes_client_only() {
        let (state, _) = state_with(MockOutcome::Active(client_claims("kinaunaclientAlocal")));
        let mut parts = parts(Some("Bearer client-token"));

        assert!(ClientOnly::from_request_parts(&mut parts, &state).await.is_ok());
    }

    #[tokio::test]
    async fn rejected_token_is_unauthenticated() {
        let (state, _) = state_with(MockOutcome::Rejected);
        let mut parts = parts(Some("Bearer revoked"));

        let result = UserOrClient::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::ValidationRejected)));
    }

    #[tokio::test]
    async fn principal_from_extensions_is_reused() {
        let (state, mock) = state_with(MockOutcome::Rejected);
        let mut parts = parts(None);
        parts
            .extensions
            .insert(Principal::from_claims(client_claims("kinaunaclientAlocal")));

        assert!(ClientOnly::from_request_parts(&mut parts, &state).await.is_ok());
        assert_eq!(mock.calls(), 0);
    }
}
