// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local cache: a namespaced JSON-file key-value store.
//!
//! Mirrors the profile and activity list per device so the app stays usable
//! when the remote store is unreachable. Entries live as
//! `{prefix}{key}.json` files under the configured cache directory; the
//! whole namespace is cleared on sign-out.
//!
//! Reads degrade to the missing-value default on parse errors (a corrupt
//! file must not brick the session); writes report errors to the caller.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Activity, Settings, UserProfile};

/// Well-known cache entry keys.
mod keys {
    pub const PROFILE: &str = "profile";
    pub const ACTIVITIES: &str = "activities";
    pub const SETTINGS: &str = "settings";
}

/// Namespaced local key-value cache.
#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
    prefix: String,
}

impl LocalCache {
    /// Open (creating if needed) the cache directory from config.
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_at(&config.cache_dir, &config.cache_prefix)
    }

    /// Open a cache at an explicit location (used by tests).
    pub fn open_at(dir: &Path, prefix: &str) -> Result<Self> {
        fs::create_dir_all(dir)
            .map_err(|e| AppError::Cache(format!("create {}: {}", dir.display(), e)))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            prefix: prefix.to_string(),
        })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{}.json", self.prefix, key))
    }

    /// Read and deserialize an entry. Missing or unreadable entries are
    /// `None`; a parse failure is logged and treated as missing.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key);
        let raw = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unparseable cache entry");
                None
            }
        }
    }

    /// Serialize and write an entry.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.entry_path(key);
        let raw = serde_json::to_string(value)?;
        fs::write(&path, raw)
            .map_err(|e| AppError::Cache(format!("write {}: {}", path.display(), e)))
    }

    /// Remove a single entry. Removing a missing entry is a no-op.
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Cache(format!("remove {}: {}", path.display(), e))),
        }
    }

    /// Clear every entry under this cache's prefix, leaving other files in
    /// the directory alone.
    pub fn clear(&self) -> Result<()> {
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| AppError::Cache(format!("read {}: {}", self.dir.display(), e)))?;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(&self.prefix) && name.ends_with(".json") {
                if let Err(e) = fs::remove_file(entry.path()) {
                    tracing::warn!(file = %name, error = %e, "Failed to clear cache entry");
                }
            }
        }
        Ok(())
    }

    // ─── Typed helpers ───────────────────────────────────────────

    /// Cached activity list; empty when nothing is cached.
    pub fn activities(&self) -> Vec<Activity> {
        self.get(keys::ACTIVITIES).unwrap_or_default()
    }

    pub fn save_activities(&self, activities: &[Activity]) -> Result<()> {
        self.set(keys::ACTIVITIES, &activities)
    }

    /// Cached profile, if any.
    pub fn profile(&self) -> Option<UserProfile> {
        self.get(keys::PROFILE)
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.set(keys::PROFILE, profile)
    }

    pub fn settings(&self) -> Settings {
        self.get(keys::SETTINGS).unwrap_or_default()
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.set(keys::SETTINGS, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityDraft, ActivityType};

    fn temp_cache() -> (tempfile::TempDir, LocalCache) {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = LocalCache::open_at(dir.path(), "portfolio_").expect("open cache");
        (dir, cache)
    }

    fn sample_activity(title: &str) -> Activity {
        ActivityDraft {
            kind: ActivityType::Sport,
            title: title.to_string(),
            description: "desc".to_string(),
            start_date: "2024-01".to_string(),
            ..Default::default()
        }
        .into_activity(format!("id-{title}"), 1)
    }

    #[test]
    fn test_activities_round_trip() {
        let (_dir, cache) = temp_cache();
        let activities = vec![sample_activity("Swim"), sample_activity("Track")];

        cache.save_activities(&activities).expect("save");
        assert_eq!(cache.activities(), activities);
    }

    #[test]
    fn test_missing_entries_default() {
        let (_dir, cache) = temp_cache();
        assert!(cache.activities().is_empty());
        assert!(cache.profile().is_none());
        assert_eq!(cache.settings(), Settings::default());
    }

    #[test]
    fn test_corrupt_entry_treated_as_missing() {
        let (dir, cache) = temp_cache();
        std::fs::write(dir.path().join("portfolio_activities.json"), "{not json")
            .expect("write corrupt file");
        assert!(cache.activities().is_empty());
    }

    #[test]
    fn test_clear_respects_prefix() {
        let (dir, cache) = temp_cache();
        cache.save_activities(&[sample_activity("Swim")]).unwrap();
        std::fs::write(dir.path().join("unrelated.json"), "{}").unwrap();

        cache.clear().expect("clear");

        assert!(cache.activities().is_empty());
        assert!(dir.path().join("unrelated.json").exists());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let (_dir, cache) = temp_cache();
        assert!(cache.remove("profile").is_ok());
    }
}
