// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use kinauna_auth_gate::{
    api::router,
    auth::{CachePurger, ClientAllowList, IntrospectionClient, TokenValidationCache},
    config::GateConfig,
    state::AppState,
    telemetry,
};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let config = GateConfig::from_env().expect("Invalid configuration");
    telemetry::init(config.log_format);

    let introspection = IntrospectionClient::new(
        config.introspection.url.as_str(),
        config.introspection.api_name.clone(),
        config.introspection.api_secret.clone(),
        config.cache.remote_timeout,
    )
    .expect("Failed to create introspection client");
    tracing::info!(
        endpoint = introspection.endpoint(),
        timeout_secs = config.cache.remote_timeout.as_secs(),
        "Introspection client ready"
    );

    let allow_list = ClientAllowList::for_environment(&config.client_ids, config.environment);
    let tokens = TokenValidationCache::new(Arc::new(introspection), config.cache);
    let state = AppState::new(tokens, allow_list);

    tracing::info!(
        environment = %config.environment,
        registered_clients = state.allow_list.len(),
        absolute_ttl_secs = config.cache.absolute_ttl.as_secs(),
        sliding_ttl_secs = config.cache.sliding_ttl.as_secs(),
        "Auth gate configured"
    );

    let shutdown = CancellationToken::new();
    let purger = tokio::spawn(CachePurger::new(state.tokens.clone()).run(shutdown.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(addr = %config.bind_addr, "KinaUna auth gate listening (docs at /docs)");

    let server_shutdown = shutdown.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
            server_shutdown.cancel();
        })
        .await
        .expect("HTTP server failed");

    shutdown.cancel();
    let _ = purger.await;
}
