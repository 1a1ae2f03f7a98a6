// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token validation cache.
//!
//! Resolves bearer tokens to [`Principal`]s, calling the authorization server
//! only on a cache miss.
//!
//! ## Expiry
//!
//! Each entry has two clocks:
//! - **absolute**: dies `absolute_ttl` after insertion (or at the token's own
//!   `exp`, whichever is earlier), no matter how often it is read;
//! - **sliding**: dies after `sliding_ttl` without a read.
//!
//! Expired entries are dropped lazily on lookup; [`TokenValidationCache::purge_expired`]
//! sweeps the rest.
//!
//! ## Failures
//!
//! Failed validations are never cached. Any failure (rejection, transport
//! error, timeout, missing client id) evicts the fingerprint's entry, so a
//! revoked token stops resolving as soon as one validation notices.
//! Concurrent misses for the same token are not deduplicated; the last
//! successful validation wins.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use lru::LruCache;
use tokio::time::Instant;

use super::error::AuthError;
use super::fingerprint::TokenFingerprint;
use super::introspection::RemoteValidator;
use super::principal::Principal;

/// Default absolute lifetime of a cached principal (60 minutes).
pub const DEFAULT_ABSOLUTE_TTL: Duration = Duration::from_secs(60 * 60);

/// Default idle lifetime of a cached principal (10 minutes).
pub const DEFAULT_SLIDING_TTL: Duration = Duration::from_secs(10 * 60);

/// Default maximum number of cached principals.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Default bound on a single remote validation.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Cache tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub absolute_ttl: Duration,
    pub sliding_ttl: Duration,
    pub capacity: usize,
    pub remote_timeout: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            absolute_ttl: DEFAULT_ABSOLUTE_TTL,
            sliding_ttl: DEFAULT_SLIDING_TTL,
            capacity: DEFAULT_CAPACITY,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }
}

/// Cached principal with its expiry clocks.
struct CacheEntry {
    principal: Principal,
    /// Absolute deadline: insertion + absolute TTL, capped at token expiry.
    expires_at: Instant,
    last_accessed_at: Instant,
}

impl CacheEntry {
    /// `None` when the token has already expired and there is nothing to keep.
    fn new(principal: Principal, now: Instant, absolute_ttl: Duration) -> Option<Self> {
        let lifetime = match principal.expires_at {
            Some(exp) => (exp - Utc::now())
                .to_std()
                .unwrap_or(Duration::ZERO)
                .min(absolute_ttl),
            None => absolute_ttl,
        };
        if lifetime.is_zero() {
            return None;
        }

        Some(Self {
            principal,
            expires_at: now + lifetime,
            last_accessed_at: now,
        })
    }

    fn is_live(&self, now: Instant, sliding_ttl: Duration) -> bool {
        now <= self.expires_at && now.duration_since(self.last_accessed_at) <= sliding_ttl
    }
}

/// Shared cache of validated principals, keyed by token fingerprint.
pub struct TokenValidationCache {
    validator: Arc<dyn RemoteValidator>,
    settings: CacheSettings,
    entries: Mutex<LruCache<TokenFingerprint, CacheEntry>>,
}

impl TokenValidationCache {
    /// Create an empty cache in front of `validator`.
    pub fn new(validator: Arc<dyn RemoteValidator>, settings: CacheSettings) -> Self {
        let capacity = NonZeroUsize::new(settings.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            validator,
            settings,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Resolve a bearer token to a principal.
    ///
    /// Suspends only on a miss, while the remote validation runs.
    pub async fn resolve(&self, token: &str) -> Result<Principal, AuthError> {
        let fingerprint = TokenFingerprint::of(token);

        if let Some(principal) = self.lookup(&fingerprint) {
            tracing::debug!(fingerprint = %fingerprint, "Token cache hit");
            return Ok(principal);
        }
        tracing::debug!(fingerprint = %fingerprint, "Token cache miss");

        match self.validate_remote(token).await {
            Ok(principal) => {
                self.store(fingerprint, principal.clone());
                Ok(principal)
            }
            Err(err) => {
                self.evict(&fingerprint);
                tracing::debug!(
                    fingerprint = %fingerprint,
                    error_code = err.error_code(),
                    "Token validation failed"
                );
                Err(err)
            }
        }
    }

    /// Drop any cached principal for `token`.
    pub fn invalidate(&self, token: &str) {
        self.evict(&TokenFingerprint::of(token));
    }

    /// Remove every expired entry. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let sliding_ttl = self.settings.sliding_ttl;
        let mut entries = self.entries();

        let dead: Vec<TokenFingerprint> = entries
            .iter()
            .filter(|(_, entry)| !entry.is_live(now, sliding_ttl))
            .map(|(fp, _)| fp.clone())
            .collect();
        for fp in &dead {
            entries.pop(fp);
        }
        dead.len()
    }

    /// Number of entries held, live or not yet purged.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn validate_remote(&self, token: &str) -> Result<Principal, AuthError> {
        let remote = self.validator.validate(token);
        let claims = tokio::time::timeout(self.settings.remote_timeout, remote)
            .await
            .map_err(|_| AuthError::ValidationRemoteFailure("timed out".to_string()))??;

        let principal = Principal::from_claims(claims);

        // Every cached principal must be attributable to a registered client.
        if principal.client_id.is_none() {
            return Err(AuthError::MalformedPrincipal);
        }
        Ok(principal)
    }

    fn lookup(&self, fingerprint: &TokenFingerprint) -> Option<Principal> {
        let now = Instant::now();
        let sliding_ttl = self.settings.sliding_ttl;
        let mut entries = self.entries();

        let entry = entries.get_mut(fingerprint)?;
        if entry.is_live(now, sliding_ttl) {
            entry.last_accessed_at = now;
            return Some(entry.principal.clone());
        }

        // Expired, remove it
        entries.pop(fingerprint);
        None
    }

    fn store(&self, fingerprint: TokenFingerprint, principal: Principal) {
        match CacheEntry::new(principal, Instant::now(), self.settings.absolute_ttl) {
            Some(entry) => {
                self.entries().put(fingerprint, entry);
            }
            None => {
                tracing::debug!(fingerprint = %fingerprint, "Token already expired, not cached");
                self.evict(&fingerprint);
            }
        }
    }

    fn evict(&self, fingerprint: &TokenFingerprint) {
        self.entries().pop(fingerprint);
    }

    // The lock is never held across an await, and no critical section can
    // leave an entry half-written, so a poisoned map is still consistent.
    fn entries(&self) -> MutexGuard<'_, LruCache<TokenFingerprint, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
