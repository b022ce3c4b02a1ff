// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory [`RemoteStore`] implementation.
//!
//! Backs tests and the demo binary: a JSON document tree behind a lock,
//! monotonic push keys, per-path change notification, and an offline
//! switch for injecting network failures.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::{AppError, Result};
use crate::store::RemoteStore;

/// In-memory document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tree: RwLock<Value>,
    offline: AtomicBool,
    next_key: AtomicU64,
    watchers: DashMap<String, UnboundedSender<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tree: RwLock::new(Value::Object(Map::new())),
            offline: AtomicBool::new(false),
            next_key: AtomicU64::new(1),
            watchers: DashMap::new(),
        }
    }

    /// Toggle failure injection: while offline, every operation returns
    /// `AppError::Network`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(AppError::Network("store offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn lookup(root: &Value, path: &str) -> Option<Value> {
        let mut node = root;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            node = node.as_object()?.get(segment)?;
        }
        Some(node.clone())
    }

    /// Walk to the parent object of the final path segment, creating
    /// intermediate objects, and hand it to `f` with that segment.
    fn with_parent<F>(root: &mut Value, path: &str, f: F)
    where
        F: FnOnce(&mut Map<String, Value>, &str),
    {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };
        let mut node = root;
        for segment in parents {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            node = node
                .as_object_mut()
                .expect("just ensured object")
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        f(node.as_object_mut().expect("just ensured object"), last);
    }

    /// Notify every watcher whose path is a prefix of (or equal to) the
    /// mutated path, delivering a snapshot of the watched subtree.
    fn notify(&self, mutated_path: &str) {
        let root = self.tree.read().expect("store lock poisoned").clone();
        let mut dead = Vec::new();
        for entry in self.watchers.iter() {
            let watched = entry.key();
            let related = mutated_path == watched
                || mutated_path.starts_with(&format!("{watched}/"))
                || watched.starts_with(&format!("{mutated_path}/"));
            if !related {
                continue;
            }
            let snapshot = Self::lookup(&root, watched).unwrap_or(Value::Null);
            if entry.value().send(snapshot).is_err() {
                dead.push(watched.clone());
            }
        }
        for path in dead {
            self.watchers.remove(&path);
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn read(&self, path: &str) -> Result<Option<Value>> {
        self.check_online()?;
        let root = self.tree.read().expect("store lock poisoned");
        Ok(Self::lookup(&root, path))
    }

    async fn write(&self, path: &str, value: Value) -> Result<()> {
        self.check_online()?;
        {
            let mut root = self.tree.write().expect("store lock poisoned");
            Self::with_parent(&mut root, path, |parent, key| {
                parent.insert(key.to_string(), value);
            });
        }
        self.notify(path);
        Ok(())
    }

    async fn update(&self, path: &str, partial: Value) -> Result<()> {
        self.check_online()?;
        {
            let mut root = self.tree.write().expect("store lock poisoned");
            Self::with_parent(&mut root, path, |parent, key| {
                let doc = parent
                    .entry(key.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !doc.is_object() {
                    *doc = Value::Object(Map::new());
                }
                if let (Some(doc), Some(fields)) = (doc.as_object_mut(), partial.as_object()) {
                    for (field, value) in fields {
                        doc.insert(field.clone(), value.clone());
                    }
                }
            });
        }
        self.notify(path);
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<()> {
        self.check_online()?;
        {
            let mut root = self.tree.write().expect("store lock poisoned");
            Self::with_parent(&mut root, path, |parent, key| {
                parent.remove(key);
            });
        }
        self.notify(path);
        Ok(())
    }

    async fn push_key(&self, _path: &str) -> Result<String> {
        self.check_online()?;
        let n = self.next_key.fetch_add(1, Ordering::SeqCst);
        Ok(format!("key{n:08}"))
    }

    async fn subscribe(&self, path: &str) -> Result<UnboundedReceiver<Value>> {
        self.check_online()?;
        let (tx, rx) = mpsc::unbounded_channel();
        self.watchers.insert(path.to_string(), tx);
        Ok(rx)
    }

    async fn unsubscribe(&self, path: &str) -> Result<()> {
        self.watchers.remove(path);
        Ok(())
    }
}
