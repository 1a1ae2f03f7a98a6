// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Validated caller identity.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Claim type names inspected by the gate.
pub mod claim_types {
    /// Subject (end-user id).
    pub const SUBJECT: &str = "sub";
    /// Registered client id.
    pub const CLIENT_ID: &str = "client_id";
    /// User email address.
    pub const EMAIL: &str = "email";
    /// User timezone.
    pub const TIMEZONE: &str = "timezone";
    /// Token expiry (seconds since epoch).
    pub const EXPIRES: &str = "exp";
    /// Granted scope, one claim per scope.
    pub const SCOPE: &str = "scope";
}

/// A single `(type, value)` fact about a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// Identity of a caller after a successful remote validation.
///
/// Built once from the raw claim list; the typed fields hold the first claim
/// of each inspected type. A `Principal` is never mutated after construction
/// and only lives as a cache value.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Principal {
    /// End-user id (`sub` claim).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Registered client id (`client_id` claim).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// User email (`email` claim).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// User timezone (`timezone` claim).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Token expiry reported by the authorization server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// All claims, in the order the validator returned them.
    #[serde(skip)]
    claims: Vec<Claim>,

    /// Set when the principal came out of a successful validation.
    #[serde(skip)]
    authenticated: bool,
}

impl Principal {
    /// Build a principal from a validated claim list.
    pub fn from_claims(claims: Vec<Claim>) -> Self {
        let first = |claim_type: &str| {
            claims
                .iter()
                .find(|c| c.claim_type == claim_type)
                .map(|c| c.value.clone())
        };

        let expires_at = first(claim_types::EXPIRES)
            .and_then(|exp| exp.parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0));

        Self {
            subject: first(claim_types::SUBJECT),
            client_id: first(claim_types::CLIENT_ID),
            email: first(claim_types::EMAIL),
            timezone: first(claim_types::TIMEZONE),
            expires_at,
            claims,
            authenticated: true,
        }
    }

    /// Principal for a caller that presented no valid credential.
    pub fn anonymous() -> Self {
        Self {
            subject: None,
            client_id: None,
            email: None,
            timezone: None,
            expires_at: None,
            claims: Vec::new(),
            authenticated: false,
        }
    }

    /// Whether this principal was produced by a successful validation.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// True iff a subject claim is present and validation succeeded.
    pub fn is_authenticated_user(&self) -> bool {
        self.authenticated && self.subject.is_some()
    }

    /// Every value of the given claim type, in validator order.
    pub fn claim_values<'a>(&'a self, claim_type: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.claims
            .iter()
            .filter(move |c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_claims() -> Vec<Claim> {
        vec![
            Claim::new("sub", "user_123"),
            Claim::new("client_id", "kinaunawebclient"),
            Claim::new("email", "parent@example.com"),
            Claim::new("timezone", "Europe/Oslo"),
            Claim::new("exp", "1700003600"),
            Claim::new("scope", "kinaunaprogenyapi"),
        ]
    }

    #[test]
    fn from_claims_populates_typed_fields() {
        let principal = Principal::from_claims(user_claims());
        assert_eq!(principal.subject.as_deref(), Some("user_123"));
        assert_eq!(principal.client_id.as_deref(), Some("kinaunawebclient"));
        assert_eq!(principal.email.as_deref(), Some("parent@example.com"));
        assert_eq!(principal.timezone.as_deref(), Some("Europe/Oslo"));
        assert_eq!(
            principal.expires_at,
            DateTime::from_timestamp(1_700_003_600, 0)
        );
        assert_eq!(
            principal.claim_values("scope").collect::<Vec<_>>(),
            vec!["kinaunaprogenyapi"]
        );
        assert_eq!(principal.claim_values("role").count(), 0);
    }

    #[test]
    fn first_claim_of_a_type_wins() {
        let principal = Principal::from_claims(vec![
            Claim::new("client_id", "first"),
            Claim::new("client_id", "second"),
        ]);
        assert_eq!(principal.client_id.as_deref(), Some("first"));
        assert_eq!(
            principal.claim_values("client_id").collect::<Vec<_>>(),
            vec!["first", "second"]
        );
    }

    #[test]
    fn user_requires_subject() {
        let client_only = Principal::from_claims(vec![Claim::new("client_id", "svc")]);
        assert!(client_only.is_authenticated());
        assert!(!client_only.is_authenticated_user());

        assert!(Principal::from_claims(user_claims()).is_authenticated_user());
    }

    #[test]
    fn anonymous_is_never_a_user() {
        let anon = Principal::anonymous();
        assert!(!anon.is_authenticated());
        assert!(!anon.is_authenticated_user());
    }

    #[test]
    fn unparsable_exp_is_ignored() {
        let principal = Principal::from_claims(vec![Claim::new("exp", "soon")]);
        assert!(principal.expires_at.is_none());
    }

    #[test]
    fn serialization_hides_raw_claims() {
        let principal = Principal::from_claims(user_claims());
        let json = serde_json::to_value(&principal).unwrap();
        assert_eq!(json["subject"], "user_123");
        assert!(json.get("claims").is_none());
        assert!(json.get("authenticated").is_none());
    }
}
