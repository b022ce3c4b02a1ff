//! User profile model for storage and API.

use serde::{Deserialize, Serialize};

use crate::time_utils::now_millis;

/// Subscription tier controlling the free activity cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
}

/// UI theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Per-user settings blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
}

/// Aggregate activity stats persisted on the profile.
///
/// Recomputed by the repository after every mutation so dashboard reads
/// stay O(1) instead of summing activities each time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    #[serde(default)]
    pub total_activities: u32,
    #[serde(default)]
    pub total_hours: f64,
}

/// User profile stored remotely at `users/{uid}/profile` and mirrored in
/// the local cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identity-provider user ID (also the remote path segment)
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    /// When the profile was created (epoch ms)
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub subscription: SubscriptionTier,
    /// Graduation year, e.g. "2027"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grad_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub stats: ProfileStats,
}

impl UserProfile {
    /// Default profile created on first sign-in: free tier, zero stats,
    /// dark theme.
    pub fn new_default(id: &str, email: &str, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            created_at: now_millis(),
            subscription: SubscriptionTier::Free,
            grad_year: None,
            bio: None,
            settings: Settings::default(),
            stats: ProfileStats::default(),
        }
    }

    pub fn is_premium(&self) -> bool {
        self.subscription == SubscriptionTier::Premium
    }
}

/// Typed partial update for profile edits.
///
/// `None` leaves a field untouched; `grad_year`/`bio` are double-optioned
/// so clearing them is expressible.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub grad_year: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub theme: Option<Theme>,
}

impl ProfileUpdate {
    /// Shallow-merge JSON patch in the stored wire format.
    pub fn to_patch(&self) -> serde_json::Value {
        let mut patch = serde_json::Map::new();
        if let Some(name) = &self.display_name {
            patch.insert("displayName".into(), serde_json::json!(name));
        }
        if let Some(year) = &self.grad_year {
            patch.insert("gradYear".into(), serde_json::json!(year));
        }
        if let Some(bio) = &self.bio {
            patch.insert("bio".into(), serde_json::json!(bio));
        }
        if let Some(theme) = self.theme {
            patch.insert(
                "settings".into(),
                serde_json::json!(Settings { theme }),
            );
        }
        serde_json::Value::Object(patch)
    }

    /// Apply the same shallow merge to an in-memory profile.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(name) = &self.display_name {
            profile.display_name = name.clone();
        }
        if let Some(year) = &self.grad_year {
            profile.grad_year = year.clone();
        }
        if let Some(bio) = &self.bio {
            profile.bio = bio.clone();
        }
        if let Some(theme) = self.theme {
            profile.settings.theme = theme;
        }
    }
}
