// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Resolves the bearer token once per request for a whole router subtree and
//! stores the [`Principal`](super::Principal) in the request extensions,
//! where the extractors in `extractor.rs` pick it up.
//!
//! ```rust,ignore
//! let v1 = Router::new()
//!     .route("/me", get(me))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), authenticate));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::bearer_token;
use crate::state::AppState;

/// Reject requests without a valid token; attach the principal otherwise.
pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let resolved = match bearer_token(request.headers()) {
        Ok(token) => state.tokens.resolve(token).await,
        Err(e) => Err(e),
    };

    match resolved {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
