// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Behavior when the remote store is unreachable: cache fallback for
//! reads, no silent partial application for writes.

mod common;

use common::{draft, test_env};
use portfolio_builder::models::ActivityUpdate;
use portfolio_builder::services::Source;

const UID: &str = "user-1";

#[tokio::test]
async fn test_profile_read_falls_back_to_cache() {
    let env = test_env();
    let original = env.repo.load_profile(UID, None).await.expect("seed");

    env.store.set_offline(true);
    let loaded = env.repo.load_profile(UID, None).await.expect("fallback");

    assert_eq!(loaded.source, Source::Cache);
    assert!(loaded.is_degraded());
    assert_eq!(loaded.value.created_at, original.value.created_at);
}

#[tokio::test]
async fn test_profile_read_errors_when_cache_empty_too() {
    let env = test_env();
    env.store.set_offline(true);

    let err = env.repo.load_profile(UID, None).await.expect_err("no data anywhere");
    assert!(err.is_network());
}

#[tokio::test]
async fn test_activities_read_falls_back_to_cache() {
    let env = test_env();
    env.repo.load_profile(UID, None).await.expect("profile");
    env.repo.add_activity(UID, draft("Chess", 5.0)).await.expect("add");

    env.store.set_offline(true);
    let loaded = env.repo.load_activities(UID).await.expect("fallback");

    assert_eq!(loaded.source, Source::Cache);
    assert_eq!(loaded.value.len(), 1);
    assert_eq!(loaded.value[0].title, "Chess");
}

#[tokio::test]
async fn test_activities_fallback_when_nothing_cached() {
    let env = test_env();
    env.store.set_offline(true);

    let loaded = env.repo.load_activities(UID).await.expect("fallback");
    assert_eq!(loaded.source, Source::Cache);
    assert!(loaded.value.is_empty());
}

#[tokio::test]
async fn test_add_fails_atomically_offline() {
    let env = test_env();
    env.repo.load_profile(UID, None).await.expect("profile");
    env.repo.add_activity(UID, draft("Kept", 5.0)).await.expect("add");

    env.store.set_offline(true);
    let err = env
        .repo
        .add_activity(UID, draft("Lost", 9.0))
        .await
        .expect_err("remote write failed");
    assert!(err.is_network());

    // No local mutation happened
    assert_eq!(env.repo.activities().len(), 1);
    assert_eq!(env.repo.activities()[0].title, "Kept");
    assert_eq!(
        env.repo.profile().expect("profile").stats.total_activities,
        1
    );
}

#[tokio::test]
async fn test_delete_fails_atomically_offline() {
    let env = test_env();
    env.repo.load_profile(UID, None).await.expect("profile");
    let a = env.repo.add_activity(UID, draft("Kept", 5.0)).await.expect("add");

    env.store.set_offline(true);
    let err = env
        .repo
        .delete_activity(UID, &a.id)
        .await
        .expect_err("remote remove failed");
    assert!(err.is_network());
    assert_eq!(env.repo.activities().len(), 1);
}

#[tokio::test]
async fn test_update_merges_locally_despite_remote_failure() {
    // Deliberate asymmetry with add/delete: the local merge still applies
    // so the UI stays responsive, and the error is surfaced.
    let env = test_env();
    env.repo.load_profile(UID, None).await.expect("profile");
    let a = env.repo.add_activity(UID, draft("Chess", 5.0)).await.expect("add");

    env.store.set_offline(true);
    let update = ActivityUpdate {
        title: Some("Chess Team".to_string()),
        ..Default::default()
    };
    let err = env
        .repo
        .update_activity(UID, &a.id, &update)
        .await
        .expect_err("remote update failed");
    assert!(err.is_network());

    assert_eq!(env.repo.activities()[0].title, "Chess Team");

    // Once the store is back, the remote copy still has the old title:
    // no retry happened automatically.
    env.store.set_offline(false);
    let loaded = env.repo.load_activities(UID).await.expect("reload");
    assert_eq!(loaded.value[0].title, "Chess");
}
