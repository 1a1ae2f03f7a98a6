// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test doubles shared by the auth and api test modules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::RemoteValidationError;
use super::introspection::RemoteValidator;
use super::principal::Claim;

/// What the mock authorization server answers.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Token is active with these claims.
    Active(Vec<Claim>),
    /// Token is inactive.
    Rejected,
    /// Transport-level failure.
    Unavailable,
    /// Never answers.
    Hang,
}

/// Remote validator that counts calls and answers with a scripted outcome.
pub struct MockValidator {
    outcome: Mutex<MockOutcome>,
    calls: AtomicUsize,
}

impl MockValidator {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, outcome: MockOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteValidator for MockValidator {
    async fn validate(&self, _token: &str) -> Result<Vec<Claim>, RemoteValidationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.outcome.lock().unwrap().clone();
        match outcome {
            MockOutcome::Active(claims) => Ok(claims),
            MockOutcome::Rejected => Err(RemoteValidationError::Rejected),
            MockOutcome::Unavailable => {
                Err(RemoteValidationError::Transport("connection refused".into()))
            }
            MockOutcome::Hang => std::future::pending().await,
        }
    }
}

/// Claims of a signed-in user using the web client.
pub fn user_claims(client_id: &str) -> Vec<Claim> {
    vec![
        Claim::new("sub", "user_123"),
        Claim::new("client_id", client_id),
        Claim::new("email", "parent@example.com"),
    ]
}

/// Claims of a machine client (client credentials grant).
pub fn client_claims(client_id: &str) -> Vec<Claim> {
    vec![Claim::new("client_id", client_id)]
}
