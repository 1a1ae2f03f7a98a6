// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{ClientAllowList, TokenValidationCache};

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenValidationCache>,
    pub allow_list: Arc<ClientAllowList>,
}

impl AppState {
    pub fn new(tokens: TokenValidationCache, allow_list: ClientAllowList) -> Self {
        Self {
            tokens: Arc::new(tokens),
            allow_list: Arc::new(allow_list),
        }
    }
}
