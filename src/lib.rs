// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! KinaUna Auth Gate - Bearer Token Validation & Authorization
//!
//! Resource-server side of the KinaUna API: resolves bearer tokens to
//! principals through a cached introspection call, and decides whether the
//! caller is a signed-in user or a registered machine client.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers (Axum): health probes and identity endpoints
//! - `auth` - Fingerprinting, validation cache, allow-list and policies
//! - `config` - Environment-driven configuration
//! - `telemetry` - Tracing subscriber setup

pub mod api;
pub mod auth;
pub mod config;
pub mod state;
pub mod telemetry;
