// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token fingerprints.
//!
//! The validation cache is keyed by a SHA-256 digest of the token rather than
//! the token itself, so the raw credential never sits in process memory longer
//! than the request that carried it.

use std::fmt;

use base64ct::{Base64UrlUnpadded, Encoding};
use sha2::{Digest, Sha256};

/// Number of characters shown when a fingerprint is logged.
const SHORT_LEN: usize = 8;

/// One-way identifier for a bearer token.
///
/// Encoded as unpadded base64url (43 characters for a 256-bit digest).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TokenFingerprint(String);

impl TokenFingerprint {
    /// Fingerprint the UTF-8 bytes of `token`.
    pub fn of(token: &str) -> Self {
        let digest = Sha256::digest(token.as_bytes());
        Self(Base64UrlUnpadded::encode_string(&digest[..]))
    }

    /// Short prefix, safe to attach to log events.
    pub fn short(&self) -> &str {
        &self.0[..SHORT_LEN]
    }
}

impl fmt::Debug for TokenFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenFingerprint({}..)", self.short())
    }
}

impl fmt::Display for TokenFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_token_same_fingerprint() {
        let a = TokenFingerprint::of("eyJhbGciOiJSUzI1NiJ9.payload.sig");
        let b = TokenFingerprint::of("eyJhbGciOiJSUzI1NiJ9.payload.sig");
        assert_eq!(a, b);
    }

    #[test]
    fn different_tokens_differ() {
        let a = TokenFingerprint::of("token-a");
        let b = TokenFingerprint::of("token-b");
        assert_ne!(a, b);
    }

    #[test]
    fn known_digest() {
        // SHA-256("hello") = 2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824
        let fp = TokenFingerprint::of("hello");
        assert_eq!(fp.0.as_str(), "LPJNul-wow4m6DsqxbninhsWHlwfp0JecwQzYpOLmCQ");
    }

    #[test]
    fn fixed_length_regardless_of_input() {
        assert_eq!(TokenFingerprint::of("x").0.len(), 43);
        assert_eq!(TokenFingerprint::of(&"x".repeat(4096)).0.len(), 43);
    }

    #[test]
    fn debug_and_display_never_show_token_or_full_digest() {
        let token = "super-secret-bearer";
        let fp = TokenFingerprint::of(token);
        let debug = format!("{fp:?}");
        let display = fp.to_string();

        assert!(!debug.contains(token));
        assert!(!display.contains(token));
        assert!(!debug.contains(fp.0.as_str()));
        assert_eq!(display.len(), SHORT_LEN);
    }
}
