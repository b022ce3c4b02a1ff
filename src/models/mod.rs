// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod user;

pub use activity::{Activity, ActivityDraft, ActivityType, ActivityUpdate};
pub use user::{ProfileStats, ProfileUpdate, Settings, SubscriptionTier, Theme, UserProfile};
