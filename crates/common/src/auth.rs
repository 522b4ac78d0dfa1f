//! # Credential gate
//!
//! The mock server accepts any username/password pair as long as the two
//! values match case-insensitively. Requests that carry no credentials at all
//! are not checked.
//!
//! When only one of the two values is supplied the pair is let through, and
//! the deposit author becomes whatever username was given (or `unknown`).

use serde::{Deserialize, Serialize};

/// Credentials attached to an inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticate(&self) -> Result<(), AuthError> {
        authenticate(self.username.as_deref(), self.password.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Bad credentials")]
    BadCredentials,
}

/// Check a username/password pair against the mock policy.
pub fn authenticate(username: Option<&str>, password: Option<&str>) -> Result<(), AuthError> {
    let (Some(username), Some(password)) = (username, password) else {
        return Ok(());
    };

    let both_empty = username.is_empty() && password.is_empty();
    if both_empty || !eq_ignore_case(username, password) {
        tracing::info!(
            username = %username,
            "user failed credentials check"
        );
        return Err(AuthError::BadCredentials);
    }

    Ok(())
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_matching_credentials() {
        assert!(authenticate(Some("testUser"), Some("TESTUSER")).is_ok());
        assert!(Credentials::new("alice", "alice").authenticate().is_ok());
    }

    #[test]
    fn test_mismatched_credentials() {
        assert_eq!(
            authenticate(Some("testUser"), Some("testPassword")),
            Err(AuthError::BadCredentials)
        );
    }

    #[test]
    fn test_empty_credentials_rejected() {
        assert_eq!(
            authenticate(Some(""), Some("")),
            Err(AuthError::BadCredentials)
        );
    }

    #[test]
    fn test_anonymous_skips_check() {
        assert!(Credentials::anonymous().authenticate().is_ok());
    }

    #[test]
    fn test_one_sided_credentials_pass() {
        assert!(authenticate(Some("alice"), None).is_ok());
        assert!(authenticate(None, Some("secret")).is_ok());
        assert!(authenticate(Some(""), None).is_ok());
    }

    proptest! {
        #[test]
        fn prop_absent_pair_always_passes(_seed in any::<u8>()) {
            prop_assert!(authenticate(None, None).is_ok());
        }

        #[test]
        fn prop_present_pair_passes_iff_equal_ignoring_case(
            u in "[a-zA-Z0-9]{0,8}",
            p in "[a-zA-Z0-9]{0,8}",
        ) {
            let expected = !(u.is_empty() && p.is_empty()) && u.to_lowercase() == p.to_lowercase();
            prop_assert_eq!(authenticate(Some(&u), Some(&p)).is_ok(), expected);
        }

        #[test]
        fn prop_case_variants_of_same_value_pass(u in "[a-zA-Z]{1,12}") {
            prop_assert!(authenticate(Some(&u), Some(&u.to_uppercase())).is_ok());
        }
    }
}
