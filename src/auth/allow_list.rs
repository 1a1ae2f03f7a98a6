// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deployment environments and the per-environment client allow-list.
//!
//! Every client is registered once per environment at the authorization
//! server. Non-production registrations reuse the canonical id with an
//! environment suffix (`kinaunawebclient` → `kinaunawebclientlocal`), so the
//! allow-list is derived from one canonical list instead of three.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use utoipa::ToSchema;

/// Client id suffix for development registrations.
pub const DEVELOPMENT_SUFFIX: &str = "local";

/// Client id suffix for staging registrations.
pub const STAGING_SUFFIX: &str = "staging";

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Suffix appended to canonical client ids, if any.
    pub fn client_suffix(&self) -> Option<&'static str> {
        match self {
            Environment::Development => Some(DEVELOPMENT_SUFFIX),
            Environment::Staging => Some(STAGING_SUFFIX),
            Environment::Production => None,
        }
    }
}

impl Default for Environment {
    /// Production unless told otherwise, so a missing setting never widens access.
    fn default() -> Self {
        Environment::Production
    }
}

impl FromStr for Environment {
    type Err = String;

    /// Parse an environment name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Client ids accepted in the running environment.
///
/// Built once at startup and never modified.
#[derive(Debug, Clone)]
pub struct ClientAllowList {
    environment: Environment,
    ids: HashSet<String>,
}

impl ClientAllowList {
    /// Derive the allow-list for `environment` from the canonical client ids.
    ///
    /// Blank ids are skipped; surrounding whitespace is trimmed.
    pub fn for_environment<I, S>(canonical: I, environment: Environment) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suffix = environment.client_suffix().unwrap_or("");
        let ids = canonical
            .into_iter()
            .map(|id| id.as_ref().trim().to_string())
            .filter(|id| !id.is_empty())
            .map(|id| format!("{id}{suffix}"))
            .collect();

        Self { environment, ids }
    }

    /// Whether `client_id` is a registered client in this environment.
    pub fn contains(&self, client_id: &str) -> bool {
        self.ids.contains(client_id)
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
