// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Remote token validation.
//!
//! [`RemoteValidator`] is the seam between the validation cache and the
//! authorization server. [`IntrospectionClient`] is the production
//! implementation, calling an OAuth 2.0 token introspection endpoint
//! (RFC 7662) with the API resource's own credentials.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::error::RemoteValidationError;
use super::principal::Claim;

/// Validates a raw bearer token against the authorization server.
///
/// Implementations must be idempotent: the cache may call them concurrently
/// for the same token.
#[async_trait]
pub trait RemoteValidator: Send + Sync {
    /// Return the token's claims, or why it could not be validated.
    async fn validate(&self, token: &str) -> Result<Vec<Claim>, RemoteValidationError>;
}

/// Introspection response (RFC 7662 section 2.2).
#[derive(Debug, Deserialize)]
struct IntrospectionResponse {
    active: bool,
    #[serde(flatten)]
    claims: HashMap<String, serde_json::Value>,
}

/// RFC 7662 introspection client.
#[derive(Clone)]
pub struct IntrospectionClient {
    /// Introspection endpoint URL
    endpoint: String,
    /// API resource name (basic auth user)
    api_name: String,
    /// API resource secret (basic auth password)
    api_secret: Option<String>,
    /// HTTP client
    client: reqwest::Client,
}

impl std::fmt::Debug for IntrospectionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntrospectionClient")
            .field("endpoint", &self.endpoint)
            .field("api_name", &self.api_name)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl IntrospectionClient {
    /// Create a new introspection client.
    ///
    /// # Arguments
    /// - `endpoint`: the introspection URL (e.g. `https://auth.kinauna.com/connect/introspect`)
    /// - `api_name`: the protected API's resource name
    /// - `api_secret`: the resource secret, if the authorization server requires one
    /// - `timeout`: upper bound for one introspection request
    pub fn new(
        endpoint: impl Into<String>,
        api_name: impl Into<String>,
        api_secret: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteValidationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteValidationError::Transport(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_name: api_name.into(),
            api_secret,
            client,
        })
    }

    /// Get the introspection endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RemoteValidator for IntrospectionClient {
    async fn validate(&self, token: &str) -> Result<Vec<Claim>, RemoteValidationError> {
        let form = [("token", token), ("token_type_hint", "access_token")];

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.api_name, self.api_secret.as_deref())
            .form(&form)
            .send()
            .await
            .map_err(|e| RemoteValidationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RemoteValidationError::Transport(format!(
                "HTTP {} from introspection endpoint",
                response.status()
            )));
        }

        let body: IntrospectionResponse = response
            .json()
            .await
            .map_err(|e| RemoteValidationError::Transport(e.to_string()))?;

        if !body.active {
            return Err(RemoteValidationError::Rejected);
        }

        Ok(flatten_claims(body.claims))
    }
}

/// Flatten an introspection body into `(type, value)` claims.
///
/// Arrays become one claim per element; nulls and nested objects are dropped.
/// Claim types are sorted so the resulting order is stable.
fn flatten_claims(raw: HashMap<String, serde_json::Value>) -> Vec<Claim> {
    let mut entries: Vec<_> = raw.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut claims = Vec::with_capacity(entries.len());
    for (claim_type, value) in entries {
        match value {
            serde_json::Value::Array(items) => {
                for item in items {
                    if let Some(v) = scalar_to_string(item) {
                        claims.push(Claim::new(claim_type.clone(), v));
                    }
                }
            }
            other => {
                if let Some(v) = scalar_to_string(other) {
                    claims.push(Claim::new(claim_type, v));
                }
            }
        }
    }
    claims
}

fn scalar_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
