// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote store layer.
//!
//! The durable store is an external capability: an async document tree
//! addressed by slash-separated paths, with push-generated keys and
//! optional change notification. The repository only ever talks to the
//! [`RemoteStore`] trait; [`memory::MemoryStore`] backs tests and the demo.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::Result;

/// Path builders for the per-user sub-trees.
pub mod paths {
    /// `users/{uid}/profile`
    pub fn profile(uid: &str) -> String {
        format!("users/{uid}/profile")
    }

    /// `users/{uid}/profile/stats`
    pub fn profile_stats(uid: &str) -> String {
        format!("users/{uid}/profile/stats")
    }

    /// `users/{uid}/activities`
    pub fn activities(uid: &str) -> String {
        format!("users/{uid}/activities")
    }

    /// `users/{uid}/activities/{id}`
    pub fn activity(uid: &str, id: &str) -> String {
        format!("users/{uid}/activities/{id}")
    }
}

/// Durable document store keyed by opaque slash-separated paths.
///
/// All operations may fail with `AppError::Network` when the store is
/// unreachable; callers decide whether a cache fallback applies.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Read the value at a path; `None` when absent.
    async fn read(&self, path: &str) -> Result<Option<Value>>;

    /// Replace the value at a path, creating intermediate nodes.
    async fn write(&self, path: &str, value: Value) -> Result<()>;

    /// Shallow-merge the fields of `partial` into the document at `path`,
    /// creating it if absent. Non-object documents are replaced.
    async fn update(&self, path: &str, partial: Value) -> Result<()>;

    /// Remove the value at a path. Removing an absent path succeeds.
    async fn remove(&self, path: &str) -> Result<()>;

    /// Generate a new unique child key under a path.
    async fn push_key(&self, path: &str) -> Result<String>;

    /// Subscribe to changes under a path. Each mutation at or below the
    /// path delivers a fresh snapshot of the whole subtree. A second
    /// subscription to the same path replaces the first.
    async fn subscribe(&self, path: &str) -> Result<UnboundedReceiver<Value>>;

    /// Drop the subscription for a path, if any.
    async fn unsubscribe(&self, path: &str) -> Result<()>;
}
