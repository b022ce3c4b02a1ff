// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end session flows: sign-up, sign-in, degraded sign-in,
//! sign-out teardown, premium gating.

mod common;

use common::{draft, test_session};
use portfolio_builder::auth::AuthErrorCode;
use portfolio_builder::models::SubscriptionTier;
use portfolio_builder::services::Source;
use portfolio_builder::stats;

#[tokio::test]
async fn test_sign_up_creates_default_profile() {
    let (session, _store, _dir) = test_session();

    let user = session
        .sign_up("a@b.com", "secret1", "Ada")
        .await
        .expect("sign up");

    let profile = session.repository().profile().expect("profile");
    assert_eq!(profile.id, user.id);
    assert_eq!(profile.email, "a@b.com");
    assert_eq!(profile.subscription, SubscriptionTier::Free);
    assert_eq!(profile.stats.total_activities, 0);
    assert_eq!(profile.stats.total_hours, 0.0);
}

#[tokio::test]
async fn test_sign_in_loads_profile_and_activities() {
    let (session, _store, _dir) = test_session();
    let user = session.sign_up("a@b.com", "secret1", "Ada").await.expect("sign up");
    session
        .repository()
        .add_activity(&user.id, draft("Chess", 5.0))
        .await
        .expect("add");
    session.sign_out().await.expect("sign out");

    let outcome = session.sign_in("a@b.com", "secret1").await.expect("sign in");

    assert_eq!(outcome.user.id, user.id);
    assert_eq!(outcome.profile.source, Source::Remote);
    assert_eq!(outcome.profile.value.stats.total_activities, 1);
    assert_eq!(outcome.activities.value.len(), 1);
    assert_eq!(outcome.activities.value[0].title, "Chess");
}

#[tokio::test]
async fn test_sign_in_degraded_when_store_down() {
    let (session, store, _dir) = test_session();
    let user = session.sign_up("a@b.com", "secret1", "Ada").await.expect("sign up");
    session
        .repository()
        .add_activity(&user.id, draft("Chess", 5.0))
        .await
        .expect("add");

    // Session state persists locally; only the remote store goes away.
    store.set_offline(true);

    let outcome = session.sign_in("a@b.com", "secret1").await.expect("degraded sign in");
    assert!(outcome.profile.is_degraded());
    assert!(outcome.activities.is_degraded());
    assert_eq!(outcome.activities.value.len(), 1);
}

#[tokio::test]
async fn test_sign_out_clears_local_state() {
    let (session, store, _dir) = test_session();
    let user = session.sign_up("a@b.com", "secret1", "Ada").await.expect("sign up");
    session
        .repository()
        .add_activity(&user.id, draft("Chess", 5.0))
        .await
        .expect("add");

    session.sign_out().await.expect("sign out");

    assert!(session.current_user().is_none());
    assert!(session.repository().profile().is_none());
    assert!(session.repository().activities().is_empty());

    // The cache was cleared too: an offline sign-in has no profile to
    // fall back on and fails instead of serving stale data.
    store.set_offline(true);
    assert!(session.sign_in("a@b.com", "secret1").await.is_err());
}

#[tokio::test]
async fn test_wrong_password_surfaces_auth_code() {
    let (session, _store, _dir) = test_session();
    session.sign_up("a@b.com", "secret1", "Ada").await.expect("sign up");
    session.sign_out().await.expect("sign out");

    let err = session.sign_in("a@b.com", "nope!!").await.expect_err("wrong password");
    assert_eq!(err.auth_code(), Some(AuthErrorCode::WrongPassword));
    assert_eq!(err.to_string(), "Incorrect password. Please try again.");
}

#[tokio::test]
async fn test_federated_sign_in_creates_profile_once() {
    let (session, _store, _dir) = test_session();

    let outcome = session.sign_in_federated().await.expect("federated");
    assert_eq!(outcome.profile.value.subscription, SubscriptionTier::Free);

    session
        .repository()
        .update_subscription(&outcome.user.id, SubscriptionTier::Premium)
        .await
        .expect("upgrade");
    session.sign_out().await.expect("sign out");

    // A returning federated user gets their stored profile back, not a
    // fresh default.
    let outcome = session.sign_in_federated().await.expect("returning");
    assert_eq!(outcome.profile.value.subscription, SubscriptionTier::Premium);
}

#[tokio::test]
async fn test_premium_gate_through_session() {
    let (session, _store, _dir) = test_session();
    let user = session.sign_up("a@b.com", "secret1", "Ada").await.expect("sign up");

    for title in ["A", "B", "C"] {
        session
            .repository()
            .add_activity(&user.id, draft(title, 1.0))
            .await
            .expect("add");
    }

    let count = session.repository().activities().len();
    assert!(!stats::can_add_more(count, session.is_premium()));

    session
        .repository()
        .update_subscription(&user.id, SubscriptionTier::Premium)
        .await
        .expect("upgrade");

    assert!(session.is_premium());
    assert!(stats::can_add_more(count, session.is_premium()));
}
