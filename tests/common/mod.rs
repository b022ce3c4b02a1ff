// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;

use portfolio_builder::auth::MockIdentity;
use portfolio_builder::cache::LocalCache;
use portfolio_builder::models::{ActivityDraft, ActivityType};
use portfolio_builder::services::{PortfolioRepository, Session};
use portfolio_builder::store::MemoryStore;

/// One repository wired to an in-memory store and a temp-dir cache.
///
/// The temp dir is held so the cache outlives the test body.
pub struct TestEnv {
    pub store: Arc<MemoryStore>,
    pub repo: PortfolioRepository<MemoryStore>,
    _dir: tempfile::TempDir,
}

#[allow(dead_code)]
pub fn test_env() -> TestEnv {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = LocalCache::open_at(dir.path(), "portfolio_").expect("open cache");
    let store = Arc::new(MemoryStore::new());
    TestEnv {
        store: Arc::clone(&store),
        repo: PortfolioRepository::new(store, cache),
        _dir: dir,
    }
}

/// A full session (mock identity + repository) over its own temp cache.
#[allow(dead_code)]
pub fn test_session() -> (Session<MemoryStore, MockIdentity>, Arc<MemoryStore>, tempfile::TempDir)
{
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = LocalCache::open_at(dir.path(), "portfolio_").expect("open cache");
    let store = Arc::new(MemoryStore::new());
    let repo = PortfolioRepository::new(Arc::clone(&store), cache);
    let identity = Arc::new(MockIdentity::new());
    (Session::new(identity, repo), store, dir)
}

/// A valid draft with a distinguishing title.
#[allow(dead_code)]
pub fn draft(title: &str, total_hours: f64) -> ActivityDraft {
    ActivityDraft {
        kind: ActivityType::Club,
        title: title.to_string(),
        description: format!("{title} description"),
        start_date: "2024-01".to_string(),
        end_date: Some("2024-06".to_string()),
        hours_per_week: 2.0,
        total_hours,
        skills: vec!["Teamwork".to_string()],
        achievements: vec![],
        ..Default::default()
    }
}
