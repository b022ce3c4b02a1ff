// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity model for storage and API, plus the validated draft and the
//! typed partial update used for edits.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use validator::{Validate, ValidationError};

use crate::error::AppError;
use crate::time_utils::is_year_month;

/// Category of an extracurricular activity.
///
/// Unknown values read from the store fold into `Other` so one bad document
/// never breaks a whole list load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Club,
    Sport,
    Volunteer,
    Work,
    Award,
    Project,
    #[default]
    #[serde(other)]
    Other,
}

impl ActivityType {
    /// Human-readable label for exports and UI.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::Club => "Club",
            ActivityType::Sport => "Sport",
            ActivityType::Volunteer => "Volunteer",
            ActivityType::Work => "Work",
            ActivityType::Award => "Award",
            ActivityType::Project => "Project",
            ActivityType::Other => "Other",
        }
    }
}

/// Stored activity record.
///
/// Lives remotely at `users/{uid}/activities/{id}` and mirrored in the local
/// cache. The `id` is the push-generated document key, attached on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: ActivityType,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub description: String,
    /// "YYYY-MM"
    #[serde(default)]
    pub start_date: String,
    /// "YYYY-MM"; `None` means ongoing
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub hours_per_week: f64,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    /// Epoch ms
    #[serde(default)]
    pub created_at: i64,
    /// Epoch ms
    #[serde(default)]
    pub updated_at: i64,
}

/// Validated input for creating an activity.
///
/// The repository assumes drafts have passed `validate()`; UI layers reject
/// invalid input before any I/O happens.
#[derive(Debug, Clone, Default, Validate)]
pub struct ActivityDraft {
    pub kind: ActivityType,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub organization: Option<String>,
    pub role: Option<String>,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(custom(function = "validate_year_month"))]
    pub start_date: String,
    #[validate(custom(function = "validate_optional_year_month"))]
    pub end_date: Option<String>,
    #[validate(range(min = 0.0, message = "hours per week must be non-negative"))]
    pub hours_per_week: f64,
    #[validate(range(min = 0.0, message = "total hours must be non-negative"))]
    pub total_hours: f64,
    pub skills: Vec<String>,
    pub achievements: Vec<String>,
}

fn validate_year_month(value: &str) -> Result<(), ValidationError> {
    if is_year_month(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("year_month");
        err.message = Some("expected a YYYY-MM date".into());
        Err(err)
    }
}

fn validate_optional_year_month(value: &str) -> Result<(), ValidationError> {
    validate_year_month(value)
}

impl ActivityDraft {
    /// Validate the draft, including the cross-field date invariant.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let Some(end) = &self.end_date {
            // "YYYY-MM" compares correctly as a plain string
            if end.as_str() < self.start_date.as_str() {
                return Err(AppError::Validation(
                    "end date must not precede start date".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Build the stored record from a validated draft.
    ///
    /// Normalizes on the way in: strings trimmed, skills deduplicated
    /// case-insensitively (first casing wins, order preserved), empty
    /// achievement entries dropped, blank organization/role folded to None.
    pub fn into_activity(self, id: String, now: i64) -> Activity {
        Activity {
            id,
            kind: self.kind,
            title: self.title.trim().to_string(),
            organization: non_blank(self.organization),
            role: non_blank(self.role),
            description: self.description.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            hours_per_week: self.hours_per_week,
            total_hours: self.total_hours,
            skills: dedupe_skills(self.skills),
            achievements: self
                .achievements
                .into_iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Typed partial update for an activity edit.
///
/// `None` fields are left untouched; `end_date` is double-optioned so that
/// `Some(None)` expresses "now ongoing" distinct from "unchanged".
#[derive(Debug, Clone, Default)]
pub struct ActivityUpdate {
    pub kind: Option<ActivityType>,
    pub title: Option<String>,
    pub organization: Option<Option<String>>,
    pub role: Option<Option<String>>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<Option<String>>,
    pub hours_per_week: Option<f64>,
    pub total_hours: Option<f64>,
    pub skills: Option<Vec<String>>,
    pub achievements: Option<Vec<String>>,
}

impl ActivityUpdate {
    /// Shallow-merge JSON patch sent to the remote store.
    ///
    /// Field names match the stored wire format; `updated_at` is always
    /// stamped so edits are observable even when no field changed.
    pub fn to_patch(&self, updated_at: i64) -> Value {
        let mut patch = Map::new();
        if let Some(kind) = self.kind {
            patch.insert("type".into(), json!(kind));
        }
        if let Some(title) = &self.title {
            patch.insert("title".into(), json!(title));
        }
        if let Some(org) = &self.organization {
            patch.insert("organization".into(), json!(org));
        }
        if let Some(role) = &self.role {
            patch.insert("role".into(), json!(role));
        }
        if let Some(description) = &self.description {
            patch.insert("description".into(), json!(description));
        }
        if let Some(start) = &self.start_date {
            patch.insert("startDate".into(), json!(start));
        }
        if let Some(end) = &self.end_date {
            patch.insert("endDate".into(), json!(end));
        }
        if let Some(hours) = self.hours_per_week {
            patch.insert("hoursPerWeek".into(), json!(hours));
        }
        if let Some(hours) = self.total_hours {
            patch.insert("totalHours".into(), json!(hours));
        }
        if let Some(skills) = &self.skills {
            patch.insert("skills".into(), json!(dedupe_skills(skills.clone())));
        }
        if let Some(achievements) = &self.achievements {
            patch.insert("achievements".into(), json!(achievements));
        }
        patch.insert("updatedAt".into(), json!(updated_at));
        Value::Object(patch)
    }

    /// Apply the same shallow merge to an in-memory record.
    pub fn apply_to(&self, activity: &mut Activity, updated_at: i64) {
        if let Some(kind) = self.kind {
            activity.kind = kind;
        }
        if let Some(title) = &self.title {
            activity.title = title.clone();
        }
        if let Some(org) = &self.organization {
            activity.organization = org.clone();
        }
        if let Some(role) = &self.role {
            activity.role = role.clone();
        }
        if let Some(description) = &self.description {
            activity.description = description.clone();
        }
        if let Some(start) = &self.start_date {
            activity.start_date = start.clone();
        }
        if let Some(end) = &self.end_date {
            activity.end_date = end.clone();
        }
        if let Some(hours) = self.hours_per_week {
            activity.hours_per_week = hours;
        }
        if let Some(hours) = self.total_hours {
            activity.total_hours = hours;
        }
        if let Some(skills) = &self.skills {
            activity.skills = dedupe_skills(skills.clone());
        }
        if let Some(achievements) = &self.achievements {
            activity.achievements = achievements.clone();
        }
        activity.updated_at = updated_at;
    }
}

/// Deduplicate skills case-insensitively, keeping first casing and order.
fn dedupe_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for skill in skills {
        let skill = skill.trim().to_string();
        if skill.is_empty() {
            continue;
        }
        let lower = skill.to_lowercase();
        if seen.contains(&lower) {
            continue;
        }
        seen.push(lower);
        out.push(skill);
    }
    out
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
