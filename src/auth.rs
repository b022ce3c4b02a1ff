// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider capability.
//!
//! Authentication is an external collaborator: the core only needs sign-up,
//! sign-in (password and federated), sign-out, password reset, and a
//! current-user handle. Provider-specific failure codes map to the
//! user-readable messages in [`AuthErrorCode`].

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{AppError, Result};

/// Minimal authenticated-user handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

impl AuthUser {
    /// Display name with the provider's fallback.
    pub fn display_name_or_default(&self) -> &str {
        if self.display_name.is_empty() {
            "User"
        } else {
            &self.display_name
        }
    }

    /// Two-letter initials for the avatar chip.
    pub fn initials(&self) -> String {
        let name = self.display_name_or_default();
        let parts: Vec<&str> = name.split_whitespace().collect();
        let initials = match parts.as_slice() {
            [first, second, ..] => {
                let mut s = String::new();
                s.extend(first.chars().take(1));
                s.extend(second.chars().take(1));
                s
            }
            _ => name.chars().take(2).collect(),
        };
        initials.to_uppercase()
    }
}

/// Provider failure codes, mapped to user-readable messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    EmailAlreadyInUse,
    InvalidEmail,
    WeakPassword,
    UserDisabled,
    UserNotFound,
    WrongPassword,
    TooManyRequests,
    PopupClosed,
    NetworkRequestFailed,
    Unknown,
}

impl AuthErrorCode {
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthErrorCode::EmailAlreadyInUse => {
                "This email is already registered. Try signing in instead."
            }
            AuthErrorCode::InvalidEmail => "Please enter a valid email address.",
            AuthErrorCode::WeakPassword => "Password should be at least 6 characters.",
            AuthErrorCode::UserDisabled => "This account has been disabled.",
            AuthErrorCode::UserNotFound => "No account found with this email.",
            AuthErrorCode::WrongPassword => "Incorrect password. Please try again.",
            AuthErrorCode::TooManyRequests => {
                "Too many failed attempts. Please try again later."
            }
            AuthErrorCode::PopupClosed => "Sign in was cancelled.",
            AuthErrorCode::NetworkRequestFailed => {
                "Network error. Please check your connection."
            }
            AuthErrorCode::Unknown => "An error occurred. Please try again.",
        }
    }
}

/// External identity provider capability.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str, display_name: &str)
        -> Result<AuthUser>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Federated sign-in (e.g. an OAuth popup). Returns the user and
    /// whether this account is new to the provider.
    async fn sign_in_federated(&self) -> Result<(AuthUser, bool)>;

    async fn sign_out(&self) -> Result<()>;

    async fn reset_password(&self, email: &str) -> Result<()>;

    /// The active user, if signed in.
    fn current_user(&self) -> Option<AuthUser>;
}

/// In-memory identity provider for tests and the demo binary.
///
/// Enforces the same failure codes a hosted provider would: duplicate
/// email, weak password (< 6 chars), unknown user, wrong password.
#[derive(Debug, Default)]
pub struct MockIdentity {
    accounts: RwLock<HashMap<String, MockAccount>>,
    current: RwLock<Option<AuthUser>>,
}

#[derive(Debug, Clone)]
struct MockAccount {
    id: String,
    password: String,
    display_name: String,
}

impl MockIdentity {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthUser> {
        if !email.contains('@') {
            return Err(AppError::Auth(AuthErrorCode::InvalidEmail));
        }
        if password.len() < 6 {
            return Err(AppError::Auth(AuthErrorCode::WeakPassword));
        }

        let mut accounts = self.accounts.write().expect("auth lock poisoned");
        if accounts.contains_key(email) {
            return Err(AppError::Auth(AuthErrorCode::EmailAlreadyInUse));
        }

        let id = format!("uid-{}", accounts.len() + 1);
        accounts.insert(
            email.to_string(),
            MockAccount {
                id: id.clone(),
                password: password.to_string(),
                display_name: display_name.to_string(),
            },
        );

        let user = AuthUser {
            id,
            email: email.to_string(),
            display_name: display_name.to_string(),
        };
        *self.current.write().expect("auth lock poisoned") = Some(user.clone());
        tracing::info!(email, "Mock sign-up");
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let accounts = self.accounts.read().expect("auth lock poisoned");
        let account = accounts
            .get(email)
            .ok_or(AppError::Auth(AuthErrorCode::UserNotFound))?;
        if account.password != password {
            return Err(AppError::Auth(AuthErrorCode::WrongPassword));
        }

        let user = AuthUser {
            id: account.id.clone(),
            email: email.to_string(),
            display_name: account.display_name.clone(),
        };
        *self.current.write().expect("auth lock poisoned") = Some(user.clone());
        Ok(user)
    }

    async fn sign_in_federated(&self) -> Result<(AuthUser, bool)> {
        // Stands in for an OAuth popup: a fixed federated account, new the
        // first time it is seen.
        let email = "federated@example.com";
        let mut accounts = self.accounts.write().expect("auth lock poisoned");
        let is_new = !accounts.contains_key(email);
        let account = accounts
            .entry(email.to_string())
            .or_insert_with(|| MockAccount {
                id: "uid-federated".to_string(),
                password: String::new(),
                display_name: "Federated User".to_string(),
            });

        let user = AuthUser {
            id: account.id.clone(),
            email: email.to_string(),
            display_name: account.display_name.clone(),
        };
        *self.current.write().expect("auth lock poisoned") = Some(user.clone());
        Ok((user, is_new))
    }

    async fn sign_out(&self) -> Result<()> {
        *self.current.write().expect("auth lock poisoned") = None;
        Ok(())
    }

    async fn reset_password(&self, email: &str) -> Result<()> {
        let accounts = self.accounts.read().expect("auth lock poisoned");
        if accounts.contains_key(email) {
            tracing::info!(email, "Mock password reset email sent");
            Ok(())
        } else {
            Err(AppError::Auth(AuthErrorCode::UserNotFound))
        }
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.current.read().expect("auth lock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let auth = MockIdentity::new();
        let user = auth.sign_up("a@b.com", "secret1", "Ada").await.unwrap();
        assert_eq!(user.email, "a@b.com");
        assert_eq!(auth.current_user(), Some(user.clone()));

        auth.sign_out().await.unwrap();
        assert!(auth.current_user().is_none());

        let again = auth.sign_in("a@b.com", "secret1").await.unwrap();
        assert_eq!(again.id, user.id);
    }

    #[tokio::test]
    async fn test_sign_up_failure_codes() {
        let auth = MockIdentity::new();
        auth.sign_up("a@b.com", "secret1", "Ada").await.unwrap();

        let err = auth.sign_up("a@b.com", "secret1", "Ada").await.unwrap_err();
        assert_eq!(err.auth_code(), Some(AuthErrorCode::EmailAlreadyInUse));

        let err = auth.sign_up("b@b.com", "short", "Bob").await.unwrap_err();
        assert_eq!(err.auth_code(), Some(AuthErrorCode::WeakPassword));

        let err = auth.sign_up("not-an-email", "secret1", "Eve").await.unwrap_err();
        assert_eq!(err.auth_code(), Some(AuthErrorCode::InvalidEmail));
    }

    #[tokio::test]
    async fn test_sign_in_failure_codes() {
        let auth = MockIdentity::new();
        auth.sign_up("a@b.com", "secret1", "Ada").await.unwrap();

        let err = auth.sign_in("nobody@b.com", "secret1").await.unwrap_err();
        assert_eq!(err.auth_code(), Some(AuthErrorCode::UserNotFound));

        let err = auth.sign_in("a@b.com", "wrong!!").await.unwrap_err();
        assert_eq!(err.auth_code(), Some(AuthErrorCode::WrongPassword));
    }

    #[tokio::test]
    async fn test_federated_new_then_returning() {
        let auth = MockIdentity::new();
        let (_, is_new) = auth.sign_in_federated().await.unwrap();
        assert!(is_new);
        let (_, is_new) = auth.sign_in_federated().await.unwrap();
        assert!(!is_new);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AuthErrorCode::WrongPassword.user_message(),
            "Incorrect password. Please try again."
        );
        assert_eq!(
            AuthErrorCode::Unknown.user_message(),
            "An error occurred. Please try again."
        );
    }

    #[test]
    fn test_initials() {
        let user = AuthUser {
            id: "u1".into(),
            email: "a@b.com".into(),
            display_name: "Ada Lovelace".into(),
        };
        assert_eq!(user.initials(), "AL");

        let mono = AuthUser {
            display_name: "ada".into(),
            ..user.clone()
        };
        assert_eq!(mono.initials(), "AD");

        let unnamed = AuthUser {
            display_name: String::new(),
            ..user
        };
        assert_eq!(unnamed.initials(), "US");
        assert_eq!(unnamed.display_name_or_default(), "User");
    }
}
