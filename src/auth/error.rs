// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.
//!
//! Every variant means "deny". The kind is kept for logs only: responses carry
//! one uniform body per status so callers cannot tell a revoked token from an
//! authorization-server outage.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failure reported by a [`RemoteValidator`](super::RemoteValidator).
#[derive(Debug, thiserror::Error)]
pub enum RemoteValidationError {
    /// Network error, non-2xx status or unparsable response.
    #[error("remote validation failed: {0}")]
    Transport(String),

    /// The authorization server reported the token inactive.
    #[error("token rejected by authorization server")]
    Rejected,
}

/// Authentication error type.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is required")]
    MissingAuthHeader,

    /// Header present but not `Bearer <token>`
    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,

    /// Network error, timeout or bad response from the authorization server
    #[error("Token validation failed: {0}")]
    ValidationRemoteFailure(String),

    /// Authorization server reports the token invalid, expired or revoked
    #[error("Token was rejected by the authorization server")]
    ValidationRejected,

    /// Validation succeeded but the principal has no client id claim
    #[error("Validated token carries no client id")]
    MalformedPrincipal,

    /// Principal is valid but does not satisfy the requirement
    #[error("Insufficient permissions for this operation")]
    PolicyDenied,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
    error_code: &'static str,
}

impl AuthError {
    /// Diagnostic code for this error. Logged, never returned to callers.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::ValidationRemoteFailure(_) => "validation_remote_failure",
            AuthError::ValidationRejected => "validation_rejected",
            AuthError::MalformedPrincipal => "malformed_principal",
            AuthError::PolicyDenied => "policy_denied",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::PolicyDenied => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<RemoteValidationError> for AuthError {
    fn from(err: RemoteValidationError) -> Self {
        match err {
            RemoteValidationError::Transport(msg) => AuthError::ValidationRemoteFailure(msg),
            RemoteValidationError::Rejected => AuthError::ValidationRejected,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!(
            error_code = self.error_code(),
            status = status.as_u16(),
            "Request denied"
        );

        let body = if status == StatusCode::FORBIDDEN {
            AuthErrorBody {
                error: "Insufficient permissions for this operation",
                error_code: "forbidden",
            }
        } else {
            AuthErrorBody {
                error: "Authentication required",
                error_code: "unauthorized",
            }
        };
        (status, Json(body)).into_response()
    }
}
