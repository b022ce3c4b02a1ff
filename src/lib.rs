// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portfolio Builder: activity data model, local/remote sync, and derived
//! statistics.
//!
//! This crate keeps a user's extracurricular activity list, a cached local
//! copy, and a remote document store consistent, and derives filtered
//! views, aggregate statistics, progress metrics, and export documents
//! from that list. Rendering, the hosted identity provider, and the
//! durable store itself are external collaborators behind traits.

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod stats;
pub mod store;
pub mod time_utils;
