// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session: explicit per-user context wiring identity and data.
//!
//! Replaces the global singleton modules of a typical client app with an
//! object the caller owns, so multiple sessions (and tests) never share
//! state.

use std::sync::Arc;

use crate::auth::{AuthUser, IdentityProvider};
use crate::error::{AppError, Result};
use crate::models::{Activity, UserProfile};
use crate::services::portfolio::{Loaded, PortfolioRepository};
use crate::store::RemoteStore;

/// Result of a sign-in: the user plus the loaded data with provenance, so
/// the caller can surface degraded mode.
#[derive(Debug)]
pub struct SignInOutcome {
    pub user: AuthUser,
    pub profile: Loaded<UserProfile>,
    pub activities: Loaded<Vec<Activity>>,
}

/// One authenticated session against one remote store.
pub struct Session<S: RemoteStore + 'static, I: IdentityProvider> {
    identity: Arc<I>,
    repository: PortfolioRepository<S>,
}

impl<S: RemoteStore + 'static, I: IdentityProvider> Session<S, I> {
    pub fn new(identity: Arc<I>, repository: PortfolioRepository<S>) -> Self {
        Self {
            identity,
            repository,
        }
    }

    pub fn repository(&self) -> &PortfolioRepository<S> {
        &self.repository
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.identity.current_user()
    }

    /// Whether the active profile is on the premium tier.
    ///
    /// Consults the session's cached profile, so it answers even in
    /// degraded mode.
    pub fn is_premium(&self) -> bool {
        self.repository
            .profile()
            .map(|p| p.is_premium())
            .unwrap_or(false)
    }

    /// Create an account and its default profile.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthUser> {
        let user = self.identity.sign_up(email, password, display_name).await?;
        let profile =
            UserProfile::new_default(&user.id, &user.email, user.display_name_or_default());
        self.repository.create_profile(&user.id, &profile).await?;
        tracing::info!(uid = %user.id, "Signed up");
        Ok(user)
    }

    /// Sign in with email/password and load profile + activities.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInOutcome> {
        let user = self.identity.sign_in(email, password).await?;
        self.load_session_data(user).await
    }

    /// Federated sign-in; creates the default profile for new accounts.
    pub async fn sign_in_federated(&self) -> Result<SignInOutcome> {
        let (user, is_new) = self.identity.sign_in_federated().await?;
        if is_new {
            let profile =
                UserProfile::new_default(&user.id, &user.email, user.display_name_or_default());
            self.repository.create_profile(&user.id, &profile).await?;
        }
        self.load_session_data(user).await
    }

    async fn load_session_data(&self, user: AuthUser) -> Result<SignInOutcome> {
        let profile = self.repository.load_profile(&user.id, Some(&user)).await?;
        let activities = self.repository.load_activities(&user.id).await?;
        if profile.is_degraded() || activities.is_degraded() {
            tracing::warn!(uid = %user.id, "Session loaded in degraded mode");
        }
        Ok(SignInOutcome {
            user,
            profile,
            activities,
        })
    }

    /// Sign out and clear all local per-user state.
    pub async fn sign_out(&self) -> Result<()> {
        let uid = self
            .identity
            .current_user()
            .map(|u| u.id)
            .ok_or_else(|| AppError::NotFound("no active user".to_string()))?;
        self.identity.sign_out().await?;
        self.repository.clear_local(&uid).await?;
        tracing::info!(uid, "Signed out");
        Ok(())
    }

    pub async fn reset_password(&self, email: &str) -> Result<()> {
        self.identity.reset_password(email).await
    }
}
