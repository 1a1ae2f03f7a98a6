// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization policies for user and client principals.

use std::fmt;

use super::allow_list::ClientAllowList;
use super::error::AuthError;
use super::principal::Principal;

/// Policy a request must satisfy.
///
/// - `UserOrClient` - a signed-in user, or a registered machine client
/// - `ClientOnly` - a registered machine client, whether or not a user is present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorizationRequirement {
    UserOrClient,
    ClientOnly,
}

impl fmt::Display for AuthorizationRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorizationRequirement::UserOrClient => write!(f, "UserOrClient"),
            AuthorizationRequirement::ClientOnly => write!(f, "ClientOnly"),
        }
    }
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    Deny,
}

/// Whether the principal is a signed-in user.
fn has_user(principal: &Principal) -> bool {
    principal.is_authenticated_user()
}

/// Whether the principal carries a client id registered in this environment.
///
/// An empty or unknown client id is not an error, just not a client.
fn has_client(principal: &Principal, allow_list: &ClientAllowList) -> bool {
    match principal.client_id.as_deref() {
        Some(id) if !id.is_empty() => allow_list.contains(id),
        _ => false,
    }
}

/// Evaluate `requirement` for `principal`.
///
/// Only the subject and client id are consulted; finer-grained checks
/// (roles, scopes) belong to the handlers.
pub fn evaluate(
    principal: &Principal,
    requirement: AuthorizationRequirement,
    allow_list: &ClientAllowList,
) -> Decision {
    let permitted = match requirement {
        AuthorizationRequirement::UserOrClient => {
            has_user(principal) || has_client(principal, allow_list)
        }
        AuthorizationRequirement::ClientOnly => has_client(principal, allow_list),
    };

    if permitted {
        Decision::Permit
    } else {
        Decision::Deny
    }
}

/// [`evaluate`], with `Deny` mapped to [`AuthError::PolicyDenied`].
pub fn authorize(
    principal: &Principal,
    requirement: AuthorizationRequirement,
    allow_list: &ClientAllowList,
) -> Result<(), AuthError> {
    match evaluate(principal, requirement, allow_list) {
        Decision::Permit => Ok(()),
        Decision::Deny => {
            tracing::debug!(
                requirement = %requirement,
                environment = %allow_list.environment(),
                "Policy denied"
            );
            Err(AuthError::PolicyDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::allow_list::Environment;
    use crate::auth::principal::Claim;

    use AuthorizationRequirement::{ClientOnly, UserOrClient};

    fn dev_list() -> ClientAllowList {
        ClientAllowList::for_environment(["kinaunaclientA"], Environment::Development)
    }

    fn principal(claims: &[(&str, &str)]) -> Principal {
        Principal::from_claims(claims.iter().map(|(t, v)| Claim::new(*t, *v)).collect())
    }

    #[test]
    fn user_without_client_fails_client_only() {
        let p = principal(&[("sub", "user_123")]);
        assert_eq!(evaluate(&p, ClientOnly, &dev_list()), Decision::Deny);
    }

    #[test]
    fn user_without_client_passes_user_or_client() {
        let p = principal(&[("sub", "user_123")]);
        assert_eq!(evaluate(&p, UserOrClient, &dev_list()), Decision::Permit);
    }

    #[test]
    fn registered_client_passes_user_or_client() {
        let p = principal(&[("client_id", "kinaunaclientAlocal")]);
        assert_eq!(evaluate(&p, UserOrClient, &dev_list()), Decision::Permit);
    }

    #[test]
    fn registered_client_passes_client_only() {
        let p = principal(&[("client_id", "kinaunaclientAlocal")]);
        assert_eq!(evaluate(&p, ClientOnly, &dev_list()), Decision::Permit);
    }

    #[test]
    fn unknown_client_without_user_is_denied() {
        let p = principal(&[("client_id", "unknownclient")]);
        assert_eq!(evaluate(&p, UserOrClient, &dev_list()), Decision::Deny);
        assert_eq!(evaluate(&p, ClientOnly, &dev_list()), Decision::Deny);
    }

    #[test]
    fn canonical_id_is_not_a_client_in_development() {
        let p = principal(&[("client_id", "kinaunaclientA")]);
        assert_eq!(evaluate(&p, ClientOnly, &dev_list()), Decision::Deny);
    }

    #[test]
    fn empty_client_id_is_not_a_client() {
        let p = principal(&[("client_id", "")]);
        assert_eq!(evaluate(&p, ClientOnly, &dev_list()), Decision::Deny);
    }

    #[test]
    fn user_with_unknown_client_passes_user_or_client_only() {
        let p = principal(&[("sub", "user_123"), ("client_id", "unknownclient")]);
        assert_eq!(evaluate(&p, UserOrClient, &dev_list()), Decision::Permit);
        assert_eq!(evaluate(&p, ClientOnly, &dev_list()), Decision::Deny);
    }

    #[test]
    fn unauthenticated_principal_is_never_a_user() {
        let p = Principal::anonymous();
        assert_eq!(evaluate(&p, UserOrClient, &dev_list()), Decision::Deny);
    }

    #[test]
    fn authorize_maps_deny_to_policy_denied() {
        let p = principal(&[("sub", "user_123")]);
        assert!(authorize(&p, UserOrClient, &dev_list()).is_ok());
        assert!(matches!(
            authorize(&p, ClientOnly, &dev_list()),
            Err(AuthError::PolicyDenied)
        ));
    }
}
