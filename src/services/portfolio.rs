// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portfolio repository: the sync core.
//!
//! Mediates between the remote store and the local cache, owning the
//! authoritative in-memory activity list and profile for the active
//! session. Conflict policy: remote wins on success, local cache is the
//! read fallback on network failure. Writes are never partially applied
//! for add/delete; update deliberately merges locally even when the remote
//! write failed (see `update_activity`).
//!
//! The repository provides no cross-call locking: callers serialize
//! mutations for a given user (one in-flight mutation at a time). The
//! subscription path overwrites in-memory state wholesale, last writer
//! wins.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::auth::AuthUser;
use crate::cache::LocalCache;
use crate::error::{AppError, Result};
use crate::models::{
    Activity, ActivityDraft, ActivityUpdate, ProfileStats, ProfileUpdate, SubscriptionTier,
    UserProfile,
};
use crate::store::{paths, RemoteStore};
use crate::time_utils::now_millis;

/// Where a loaded value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Remote,
    /// Served from the local cache because the remote store was
    /// unreachable (degraded mode).
    Cache,
}

/// A loaded value tagged with its provenance, so callers can distinguish
/// degraded mode instead of silently swapping data sources.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Loaded<T> {
    fn remote(value: T) -> Self {
        Self {
            value,
            source: Source::Remote,
        }
    }

    fn cached(value: T) -> Self {
        Self {
            value,
            source: Source::Cache,
        }
    }

    /// True when the value was served from the local cache.
    pub fn is_degraded(&self) -> bool {
        self.source == Source::Cache
    }
}

/// Live subscription to remote activity changes. Dropping the handle
/// stops the forwarding task.
struct ActivitySubscription {
    task: JoinHandle<()>,
}

impl Drop for ActivitySubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The activity/profile sync core for one session.
pub struct PortfolioRepository<S: RemoteStore + 'static> {
    store: Arc<S>,
    cache: LocalCache,
    profile: Arc<RwLock<Option<UserProfile>>>,
    activities: Arc<RwLock<Vec<Activity>>>,
    subscriptions: DashMap<String, ActivitySubscription>,
}

impl<S: RemoteStore + 'static> PortfolioRepository<S> {
    pub fn new(store: Arc<S>, cache: LocalCache) -> Self {
        Self {
            store,
            cache,
            profile: Arc::new(RwLock::new(None)),
            activities: Arc::new(RwLock::new(Vec::new())),
            subscriptions: DashMap::new(),
        }
    }

    /// Snapshot of the in-memory activity list.
    pub fn activities(&self) -> Vec<Activity> {
        self.activities.read().expect("state lock poisoned").clone()
    }

    /// Snapshot of the in-memory profile.
    pub fn profile(&self) -> Option<UserProfile> {
        self.profile.read().expect("state lock poisoned").clone()
    }

    // ─── Profile ─────────────────────────────────────────────────

    /// Load the user's profile, creating a default one on first sign-in.
    ///
    /// On remote failure the cached copy is returned tagged
    /// `Source::Cache`; the error surfaces only when the cache is empty
    /// too.
    pub async fn load_profile(
        &self,
        uid: &str,
        identity: Option<&AuthUser>,
    ) -> Result<Loaded<UserProfile>> {
        match self.store.read(&paths::profile(uid)).await {
            Ok(Some(value)) => {
                let mut profile: UserProfile = serde_json::from_value(value)?;
                if profile.id.is_empty() {
                    profile.id = uid.to_string();
                }
                self.cache.save_profile(&profile)?;
                self.set_profile(profile.clone());
                Ok(Loaded::remote(profile))
            }
            Ok(None) => {
                let (email, name) = match identity {
                    Some(user) => (user.email.as_str(), user.display_name_or_default()),
                    None => ("", "User"),
                };
                let profile = UserProfile::new_default(uid, email, name);
                self.create_profile(uid, &profile).await?;
                tracing::info!(uid, "Created default profile");
                Ok(Loaded::remote(profile))
            }
            Err(e) if e.is_network() => match self.cache.profile() {
                Some(profile) => {
                    tracing::warn!(uid, error = %e, "Profile load degraded to cache");
                    self.set_profile(profile.clone());
                    Ok(Loaded::cached(profile))
                }
                None => Err(e),
            },
            Err(e) => Err(e),
        }
    }

    /// Persist a profile remotely and mirror it locally (sign-up path).
    pub async fn create_profile(&self, uid: &str, profile: &UserProfile) -> Result<()> {
        self.store
            .write(&paths::profile(uid), serde_json::to_value(profile)?)
            .await?;
        self.cache.save_profile(profile)?;
        self.set_profile(profile.clone());
        Ok(())
    }

    /// Shallow-merge profile edits remotely and locally.
    pub async fn update_profile(&self, uid: &str, update: &ProfileUpdate) -> Result<()> {
        self.store
            .update(&paths::profile(uid), update.to_patch())
            .await?;

        let mut profile = self
            .cache
            .profile()
            .unwrap_or_else(|| UserProfile::new_default(uid, "", "User"));
        update.apply_to(&mut profile);
        self.cache.save_profile(&profile)?;
        self.set_profile(profile);
        Ok(())
    }

    /// Switch subscription tier (e.g. after an upgrade).
    pub async fn update_subscription(&self, uid: &str, tier: SubscriptionTier) -> Result<()> {
        self.store
            .update(
                &paths::profile(uid),
                serde_json::json!({
                    "subscription": tier,
                    "subscriptionUpdatedAt": now_millis(),
                }),
            )
            .await?;

        if let Some(mut profile) = self.cache.profile() {
            profile.subscription = tier;
            self.cache.save_profile(&profile)?;
            self.set_profile(profile);
        }
        tracing::info!(uid, ?tier, "Subscription updated");
        Ok(())
    }

    // ─── Activities ──────────────────────────────────────────────

    /// Load the user's activities, replacing in-memory state.
    ///
    /// The remote collection is a map of push key to fields; each key
    /// becomes the activity id. On remote failure the cache contents are
    /// returned tagged `Source::Cache` — never a merge of both.
    pub async fn load_activities(&self, uid: &str) -> Result<Loaded<Vec<Activity>>> {
        match self.store.read(&paths::activities(uid)).await {
            Ok(value) => {
                let activities = parse_activity_map(value.unwrap_or(Value::Null));
                self.cache.save_activities(&activities)?;
                self.set_activities(activities.clone());
                tracing::debug!(uid, count = activities.len(), "Activities loaded");
                Ok(Loaded::remote(activities))
            }
            Err(e) if e.is_network() => {
                tracing::warn!(uid, error = %e, "Activity load degraded to cache");
                let activities = self.cache.activities();
                self.set_activities(activities.clone());
                Ok(Loaded::cached(activities))
            }
            Err(e) => Err(e),
        }
    }

    /// Add a new activity.
    ///
    /// Atomic from the caller's perspective: a failed remote write leaves
    /// memory and cache untouched.
    pub async fn add_activity(&self, uid: &str, draft: ActivityDraft) -> Result<Activity> {
        draft.check()?;

        let id = self.store.push_key(&paths::activities(uid)).await?;
        let activity = draft.into_activity(id, now_millis());

        self.store
            .write(
                &paths::activity(uid, &activity.id),
                serde_json::to_value(&activity)?,
            )
            .await?;

        {
            let mut activities = self.activities.write().expect("state lock poisoned");
            activities.push(activity.clone());
            self.cache.save_activities(activities.as_slice())?;
        }

        if let Err(e) = self.recompute_stats(uid).await {
            tracing::warn!(uid, error = %e, "Stats recompute failed after add");
        }
        tracing::info!(uid, id = %activity.id, "Activity added");
        Ok(activity)
    }

    /// Apply a partial edit to an activity.
    ///
    /// The remote write is attempted first; the local merge is applied
    /// whenever the id is known locally, even if the remote write failed.
    /// This asymmetry keeps the UI responsive on flaky networks and is a
    /// documented design choice, not lost-write protection: no re-fetch
    /// happens before merging, so concurrent edits from two devices are
    /// last-write-wins per updated field subset.
    pub async fn update_activity(
        &self,
        uid: &str,
        id: &str,
        update: &ActivityUpdate,
    ) -> Result<()> {
        let now = now_millis();
        let remote = self
            .store
            .update(&paths::activity(uid, id), update.to_patch(now))
            .await;

        let found = {
            let mut activities = self.activities.write().expect("state lock poisoned");
            match activities.iter().position(|a| a.id == id) {
                Some(i) => {
                    update.apply_to(&mut activities[i], now);
                    self.cache.save_activities(activities.as_slice())?;
                    true
                }
                None => false,
            }
        };

        if found {
            if let Err(e) = self.recompute_stats(uid).await {
                tracing::warn!(uid, error = %e, "Stats recompute failed after update");
            }
        }

        remote?;
        if !found {
            return Err(AppError::NotFound(format!("activity {id}")));
        }
        Ok(())
    }

    /// Delete an activity.
    ///
    /// Idempotent remotely; a failed remote remove leaves local state
    /// untouched. Deleting an id unknown locally is a local no-op.
    pub async fn delete_activity(&self, uid: &str, id: &str) -> Result<()> {
        self.store.remove(&paths::activity(uid, id)).await?;

        {
            let mut activities = self.activities.write().expect("state lock poisoned");
            activities.retain(|a| a.id != id);
            self.cache.save_activities(activities.as_slice())?;
        }

        if let Err(e) = self.recompute_stats(uid).await {
            tracing::warn!(uid, error = %e, "Stats recompute failed after delete");
        }
        tracing::info!(uid, id, "Activity deleted");
        Ok(())
    }

    /// Recompute aggregate stats from the local cache and persist them to
    /// both the remote profile and the cache.
    ///
    /// Intentionally sums the cache rather than re-fetching remote state,
    /// so it can run independently of any particular mutation.
    pub async fn recompute_stats(&self, uid: &str) -> Result<()> {
        let activities = self.cache.activities();
        let stats = ProfileStats {
            total_activities: activities.len() as u32,
            total_hours: activities.iter().map(|a| a.total_hours).sum(),
        };

        self.store
            .update(
                &paths::profile_stats(uid),
                serde_json::to_value(&stats)?,
            )
            .await?;

        if let Some(mut profile) = self.cache.profile() {
            profile.stats = stats;
            self.cache.save_profile(&profile)?;
            self.set_profile(profile);
        }
        Ok(())
    }

    // ─── Live updates ────────────────────────────────────────────

    /// Subscribe to remote activity changes for a user.
    ///
    /// Each change replaces in-memory and cached state wholesale and
    /// invokes the callback with the new list. At most one subscription
    /// per user: subscribing again replaces the previous one.
    pub async fn subscribe<F>(&self, uid: &str, callback: F) -> Result<()>
    where
        F: Fn(&[Activity]) + Send + Sync + 'static,
    {
        let mut rx = self.store.subscribe(&paths::activities(uid)).await?;

        let activities = Arc::clone(&self.activities);
        let cache = self.cache.clone();
        let uid_owned = uid.to_string();
        let task = tokio::spawn(async move {
            while let Some(snapshot) = rx.recv().await {
                let list = parse_activity_map(snapshot);
                if let Err(e) = cache.save_activities(&list) {
                    tracing::warn!(uid = %uid_owned, error = %e, "Failed to cache pushed activities");
                }
                *activities.write().expect("state lock poisoned") = list.clone();
                callback(&list);
            }
        });

        // Replacing the entry drops (and aborts) any previous subscription.
        self.subscriptions
            .insert(uid.to_string(), ActivitySubscription { task });
        tracing::debug!(uid, "Subscribed to activity changes");
        Ok(())
    }

    /// Stop listening for remote changes for a user.
    pub async fn unsubscribe(&self, uid: &str) -> Result<()> {
        self.subscriptions.remove(uid);
        self.store.unsubscribe(&paths::activities(uid)).await
    }

    // ─── Session teardown ────────────────────────────────────────

    /// Clear all local state on sign-out: cache, memory, subscriptions.
    pub async fn clear_local(&self, uid: &str) -> Result<()> {
        if self.subscriptions.remove(uid).is_some() {
            // Best effort; the store may already be unreachable.
            if let Err(e) = self.store.unsubscribe(&paths::activities(uid)).await {
                tracing::debug!(uid, error = %e, "Unsubscribe during sign-out failed");
            }
        }
        self.cache.clear()?;
        self.set_activities(Vec::new());
        *self.profile.write().expect("state lock poisoned") = None;
        Ok(())
    }

    fn set_profile(&self, profile: UserProfile) {
        *self.profile.write().expect("state lock poisoned") = Some(profile);
    }

    fn set_activities(&self, activities: Vec<Activity>) {
        *self.activities.write().expect("state lock poisoned") = activities;
    }
}

/// Convert a remote activities document (push key → fields) into an
/// ordered list with ids attached. Unparseable entries are dropped with a
/// warning rather than failing the whole load.
fn parse_activity_map(value: Value) -> Vec<Activity> {
    let Value::Object(map) = value else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(map.len());
    for (key, fields) in map {
        match serde_json::from_value::<Activity>(fields) {
            Ok(mut activity) => {
                activity.id = key;
                out.push(activity);
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Skipping unparseable activity document");
            }
        }
    }
    out
}
