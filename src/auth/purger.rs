// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Token Cache Purger
//!
//! Background task that sweeps expired principals out of the
//! [`TokenValidationCache`]. Lookups already drop expired entries lazily; the
//! sweep reclaims entries for tokens that are never presented again.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::cache::TokenValidationCache;

/// Default interval between sweeps.
const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(60);

pub struct CachePurger {
    cache: Arc<TokenValidationCache>,
    interval: Duration,
}

impl CachePurger {
    pub fn new(cache: Arc<TokenValidationCache>) -> Self {
        Self {
            cache,
            interval: DEFAULT_PURGE_INTERVAL,
        }
    }

    /// Run until the cancellation token is triggered.
    ///
    /// ```rust,ignore
    /// tokio::spawn(CachePurger::new(cache).run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Token cache purger starting"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Token cache purger shutting down");
                    return;
                }
            }

            let purged = self.cache.purge_expired();
            if purged > 0 {
                debug!(purged, remaining = self.cache.len(), "Purged expired tokens");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::{client_claims, MockOutcome, MockValidator};
    use crate::auth::CacheSettings;

    #[tokio::test(start_paused = true)]
    async fn sweeps_expired_entries_until_cancelled() {
        let mock = Arc::new(MockValidator::new(MockOutcome::Active(client_claims("svc"))));
        let cache = Arc::new(TokenValidationCache::new(
            mock,
            CacheSettings {
                sliding_ttl: Duration::from_secs(30),
                ..CacheSettings::default()
            },
        ));
        cache.resolve("token").await.unwrap();

        let shutdown = CancellationToken::new();
        let task = tokio::spawn(CachePurger::new(cache.clone()).run(shutdown.clone()));

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(cache.is_empty());

        shutdown.cancel();
        task.await.unwrap();
    }
}
