// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the typed [`GateConfig`] built
//! from them at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `APP_ENVIRONMENT` | `development`, `staging` or `production` | `production` |
//! | `AUTH_INTROSPECTION_URL` | Token introspection endpoint | Required |
//! | `AUTH_API_NAME` | API resource name (introspection basic auth user) | Required |
//! | `AUTH_API_SECRET` | API resource secret | Optional |
//! | `AUTH_CLIENT_IDS` | Comma-separated canonical client ids | Required |
//! | `TOKEN_CACHE_ABSOLUTE_TTL_MINUTES` | Absolute lifetime of a cached principal | `60` |
//! | `TOKEN_CACHE_SLIDING_TTL_MINUTES` | Idle lifetime of a cached principal | `10` |
//! | `TOKEN_CACHE_CAPACITY` | Maximum cached principals | `10000` |
//! | `AUTH_REMOTE_TIMEOUT_SECS` | Timeout for one introspection call | `10` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::auth::{CacheSettings, Environment};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const ENVIRONMENT_ENV: &str = "APP_ENVIRONMENT";
pub const INTROSPECTION_URL_ENV: &str = "AUTH_INTROSPECTION_URL";
pub const API_NAME_ENV: &str = "AUTH_API_NAME";
pub const API_SECRET_ENV: &str = "AUTH_API_SECRET";
pub const CLIENT_IDS_ENV: &str = "AUTH_CLIENT_IDS";
pub const ABSOLUTE_TTL_ENV: &str = "TOKEN_CACHE_ABSOLUTE_TTL_MINUTES";
pub const SLIDING_TTL_ENV: &str = "TOKEN_CACHE_SLIDING_TTL_MINUTES";
pub const CACHE_CAPACITY_ENV: &str = "TOKEN_CACHE_CAPACITY";
pub const REMOTE_TIMEOUT_ENV: &str = "AUTH_REMOTE_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ABSOLUTE_TTL_MINUTES: u64 = 60;
const DEFAULT_SLIDING_TTL_MINUTES: u64 = 10;
const DEFAULT_CACHE_CAPACITY: usize = 10_000;
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;
/// Upper bound for either cache TTL (one week).
const MAX_TTL_MINUTES: u64 = 7 * 24 * 60;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Settings for the introspection client.
#[derive(Clone, PartialEq, Eq)]
pub struct IntrospectionSettings {
    pub url: Url,
    pub api_name: String,
    pub api_secret: Option<String>,
}

impl std::fmt::Debug for IntrospectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntrospectionSettings")
            .field("url", &self.url.as_str())
            .field("api_name", &self.api_name)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Full service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub bind_addr: SocketAddr,
    pub environment: Environment,
    pub introspection: IntrospectionSettings,
    /// Canonical (unsuffixed) client ids.
    pub client_ids: Vec<String>,
    pub cache: CacheSettings,
    pub log_format: LogFormat,
}

impl GateConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(get(PORT_ENV), PORT_ENV, DEFAULT_PORT)?;
        let bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|e: std::net::AddrParseError| invalid(HOST_ENV, e.to_string()))?;

        let environment = match get(ENVIRONMENT_ENV) {
            Some(value) => value
                .parse::<Environment>()
                .map_err(|reason| invalid(ENVIRONMENT_ENV, reason))?,
            None => Environment::default(),
        };

        let url = get(INTROSPECTION_URL_ENV).ok_or(ConfigError::Missing(INTROSPECTION_URL_ENV))?;
        let url = Url::parse(&url).map_err(|e| invalid(INTROSPECTION_URL_ENV, e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(INTROSPECTION_URL_ENV, "must be an http(s) URL".to_string()));
        }
        if url.scheme() == "http" && environment == Environment::Production {
            return Err(invalid(
                INTROSPECTION_URL_ENV,
                "must use https in production".to_string(),
            ));
        }

        let introspection = IntrospectionSettings {
            url,
            api_name: get(API_NAME_ENV).ok_or(ConfigError::Missing(API_NAME_ENV))?,
            api_secret: get(API_SECRET_ENV),
        };

        let client_ids: Vec<String> = get(CLIENT_IDS_ENV)
            .ok_or(ConfigError::Missing(CLIENT_IDS_ENV))?
            .split(',')
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        if client_ids.is_empty() {
            return Err(invalid(CLIENT_IDS_ENV, "no client ids listed".to_string()));
        }

        let absolute_minutes =
            parse_or(get(ABSOLUTE_TTL_ENV), ABSOLUTE_TTL_ENV, DEFAULT_ABSOLUTE_TTL_MINUTES)?;
        let sliding_minutes =
            parse_or(get(SLIDING_TTL_ENV), SLIDING_TTL_ENV, DEFAULT_SLIDING_TTL_MINUTES)?;
        let capacity = parse_or(get(CACHE_CAPACITY_ENV), CACHE_CAPACITY_ENV, DEFAULT_CACHE_CAPACITY)?;
        let timeout_secs =
            parse_or(get(REMOTE_TIMEOUT_ENV), REMOTE_TIMEOUT_ENV, DEFAULT_REMOTE_TIMEOUT_SECS)?;

        if timeout_secs == 0 {
            return Err(invalid(REMOTE_TIMEOUT_ENV, "must be positive".to_string()));
        }

        let cache = CacheSettings {
            absolute_ttl: ttl_from_minutes(absolute_minutes, ABSOLUTE_TTL_ENV)?,
            sliding_ttl: ttl_from_minutes(sliding_minutes, SLIDING_TTL_ENV)?,
            capacity,
            remote_timeout: Duration::from_secs(timeout_secs),
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref().map(str::to_lowercase).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(invalid(LOG_FORMAT_ENV, format!("unknown format '{other}'")))
            }
        };

        Ok(Self {
            bind_addr,
            environment,
            introspection,
            client_ids,
            cache,
            log_format,
        })
    }
}

fn invalid(name: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { name, reason }
}

fn ttl_from_minutes(minutes: u64, name: &'static str) -> Result<Duration, ConfigError> {
    if minutes == 0 {
        return Err(invalid(name, "must be positive".to_string()));
    }
    if minutes > MAX_TTL_MINUTES {
        return Err(invalid(
            name,
            format!("must be at most {MAX_TTL_MINUTES} minutes"),
        ));
    }
    Ok(Duration::from_secs(minutes * 60))
}

fn parse_or<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(v) => v.trim().parse().map_err(|e: T::Err| invalid(name, e.to_string())),
        None => Ok(default),
    }
}
