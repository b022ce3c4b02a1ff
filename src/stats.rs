// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Statistics engine: pure derivations over an activity list.
//!
//! Everything here is synchronous and side-effect-free, so views can be
//! recomputed on every render without staleness risk and tested without
//! mocking any I/O.

use std::collections::{HashMap, HashSet};

use crate::models::{Activity, ActivityType, UserProfile};

/// Free-tier activity cap.
pub const FREE_TIER_LIMIT: usize = 3;

/// Default number of skills returned by [`top_skills`].
pub const TOP_SKILLS_LIMIT: usize = 8;

/// Type filter for list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Kind(ActivityType),
}

/// Sort order for list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first (created_at descending)
    #[default]
    Newest,
    /// Oldest first (created_at ascending)
    Oldest,
    /// Most hours first
    Hours,
    /// Title alphabetical, case-insensitive
    Alpha,
}

/// Aggregate counts for the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stats {
    pub total_activities: usize,
    pub total_hours: f64,
    /// Number of distinct activity types present
    pub distinct_types: usize,
}

/// One entry of the skill frequency view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCount {
    pub skill: String,
    pub count: u32,
}

/// Profile-completion checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressChecks {
    /// Profile has a display name
    pub profile: bool,
    /// At least one activity
    pub first_activity: bool,
    /// At least three activities
    pub three_activities: bool,
    /// Some activity lists at least one skill
    pub skills: bool,
    /// Cumulative hours >= 50
    pub hours: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub checks: ProgressChecks,
    /// 0-100
    pub percentage: u8,
}

/// Milestone badges, derived fresh on every call; nothing is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Badges {
    /// >= 1 activity
    pub first: bool,
    /// >= 10 activities
    pub dedicated: bool,
    /// >= 100 total hours
    pub century: bool,
}

/// Filter by exact type (or pass everything through) and sort.
///
/// All sorts are stable, so ties keep their prior relative order.
pub fn filter_and_sort(
    activities: &[Activity],
    filter: TypeFilter,
    sort: SortKey,
) -> Vec<Activity> {
    let mut out: Vec<Activity> = activities
        .iter()
        .filter(|a| match filter {
            TypeFilter::All => true,
            TypeFilter::Kind(kind) => a.kind == kind,
        })
        .cloned()
        .collect();

    match sort {
        SortKey::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => out.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::Hours => out.sort_by(|a, b| {
            b.total_hours
                .partial_cmp(&a.total_hours)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortKey::Alpha => out.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase())),
    }
    out
}

/// Totals for the dashboard header.
pub fn aggregate(activities: &[Activity]) -> Stats {
    let distinct: HashSet<ActivityType> = activities.iter().map(|a| a.kind).collect();
    Stats {
        total_activities: activities.len(),
        total_hours: activities.iter().map(|a| a.total_hours).sum(),
        distinct_types: distinct.len(),
    }
}

/// Total hours grouped by activity type.
///
/// Unknown stored types were already folded to `Other` at deserialization,
/// so every activity lands in exactly one bucket.
pub fn hours_by_category(activities: &[Activity]) -> HashMap<ActivityType, f64> {
    let mut out = HashMap::new();
    for activity in activities {
        *out.entry(activity.kind).or_insert(0.0) += activity.total_hours;
    }
    out
}

/// Skill frequency across all activities, descending by count, capped at
/// `limit`. Counting is case-sensitive on the stored token; ties keep
/// first-encounter order.
pub fn top_skills(activities: &[Activity], limit: usize) -> Vec<SkillCount> {
    let mut counts: Vec<SkillCount> = Vec::new();
    for activity in activities {
        for skill in &activity.skills {
            match counts.iter_mut().find(|c| &c.skill == skill) {
                Some(entry) => entry.count += 1,
                None => counts.push(SkillCount {
                    skill: skill.clone(),
                    count: 1,
                }),
            }
        }
    }
    // Stable sort keeps first-encounter order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Profile-completion progress: five checks, percentage rounded.
pub fn progress(activities: &[Activity], profile: Option<&UserProfile>) -> Progress {
    let total_hours: f64 = activities.iter().map(|a| a.total_hours).sum();
    let checks = ProgressChecks {
        profile: profile.is_some_and(|p| !p.display_name.is_empty()),
        first_activity: !activities.is_empty(),
        three_activities: activities.len() >= 3,
        skills: activities.iter().any(|a| !a.skills.is_empty()),
        hours: total_hours >= 50.0,
    };

    let completed = [
        checks.profile,
        checks.first_activity,
        checks.three_activities,
        checks.skills,
        checks.hours,
    ]
    .iter()
    .filter(|c| **c)
    .count();

    Progress {
        checks,
        percentage: ((completed as f64 / 5.0) * 100.0).round() as u8,
    }
}

/// Milestone badge eligibility.
pub fn badges(activities: &[Activity]) -> Badges {
    let total_hours: f64 = activities.iter().map(|a| a.total_hours).sum();
    Badges {
        first: !activities.is_empty(),
        dedicated: activities.len() >= 10,
        century: total_hours >= 100.0,
    }
}

/// Whether another activity may be added under the subscription gate.
pub fn can_add_more(activity_count: usize, is_premium: bool) -> bool {
    is_premium || activity_count < FREE_TIER_LIMIT
}

/// Remaining free-tier slots; `None` means unlimited (premium).
pub fn remaining_slots(activity_count: usize, is_premium: bool) -> Option<usize> {
    if is_premium {
        None
    } else {
        Some(FREE_TIER_LIMIT.saturating_sub(activity_count))
    }
}
