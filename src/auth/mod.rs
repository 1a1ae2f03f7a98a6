// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication & Authorization Module
//!
//! Gates the KinaUna API for two kinds of callers: signed-in users and
//! registered machine clients.
//!
//! ## Request Flow
//!
//! 1. Caller sends `Authorization: Bearer <token>`
//! 2. The token is fingerprinted (SHA-256) and looked up in the
//!    [`TokenValidationCache`]
//! 3. On a miss, the token is introspected at the authorization server and the
//!    resulting [`Principal`] cached with absolute + sliding expiry
//! 4. The principal is evaluated against the route's
//!    [`AuthorizationRequirement`] and the environment's [`ClientAllowList`]
//!
//! ## Security
//!
//! - Raw tokens are never stored or logged; only fingerprint prefixes are
//! - Failed validations are never cached and evict any cached success
//! - Authorization-server outages deny, they never allow

pub mod allow_list;
pub mod cache;
pub mod error;
pub mod extractor;
pub mod fingerprint;
pub mod introspection;
pub mod middleware;
pub mod policy;
pub mod principal;
pub mod purger;

#[cfg(test)]
pub(crate) mod testing;

pub use allow_list::{ClientAllowList, Environment};
pub use cache::{CacheSettings, TokenValidationCache};
pub use error::{AuthError, RemoteValidationError};
pub use extractor::{Authenticated, ClientOnly, UserOrClient};
pub use fingerprint::TokenFingerprint;
pub use introspection::{IntrospectionClient, RemoteValidator};
pub use policy::{authorize, evaluate, AuthorizationRequirement, Decision};
pub use principal::{Claim, Principal};
pub use purger::CachePurger;
