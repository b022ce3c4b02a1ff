// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portfolio Builder demo.
//!
//! Runs a complete session against the in-memory store and mock identity
//! provider: sign up, add activities, derive the dashboard views, and
//! print the plain-text export.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portfolio_builder::auth::MockIdentity;
use portfolio_builder::cache::LocalCache;
use portfolio_builder::config::Config;
use portfolio_builder::models::{ActivityDraft, ActivityType};
use portfolio_builder::services::{PortfolioRepository, Session};
use portfolio_builder::store::MemoryStore;
use portfolio_builder::time_utils::estimate_total_hours;
use portfolio_builder::{export, stats};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(cache_dir = %config.cache_dir.display(), "Starting Portfolio Builder demo");

    let store = Arc::new(MemoryStore::new());
    let cache = LocalCache::open(&config)?;
    let identity = Arc::new(MockIdentity::new());
    let session = Session::new(identity, PortfolioRepository::new(store, cache));

    let user = session.sign_up("ada@example.com", "secret1", "Ada Lovelace").await?;
    let uid = user.id.clone();

    let drafts = [
        (ActivityType::Club, "Robotics Club", "Built competition robots", 5.0),
        (ActivityType::Volunteer, "Food Bank", "Weekend meal packing", 3.0),
        (ActivityType::Project, "Weather Station", "Solar-powered sensor node", 2.0),
    ];
    for (kind, title, description, hours_per_week) in drafts {
        let total_hours =
            estimate_total_hours("2024-01", Some("2024-06"), hours_per_week).unwrap_or(0.0);
        session
            .repository()
            .add_activity(
                &uid,
                ActivityDraft {
                    kind,
                    title: title.to_string(),
                    description: description.to_string(),
                    start_date: "2024-01".to_string(),
                    end_date: Some("2024-06".to_string()),
                    hours_per_week,
                    total_hours,
                    skills: vec!["Teamwork".to_string()],
                    ..Default::default()
                },
            )
            .await?;
    }

    let activities = session.repository().activities();
    let profile = session.repository().profile();

    let totals = stats::aggregate(&activities);
    tracing::info!(
        activities = totals.total_activities,
        hours = totals.total_hours,
        types = totals.distinct_types,
        "Dashboard totals"
    );

    let progress = stats::progress(&activities, profile.as_ref());
    tracing::info!(percentage = progress.percentage, "Profile completion");

    let sorted = stats::filter_and_sort(&activities, stats::TypeFilter::All, stats::SortKey::Alpha);
    let doc = export::build_document(profile.as_ref(), user.display_name_or_default(), &sorted);
    println!("{}", export::render_text(&doc));
    println!(
        "(would download as {})",
        export::export_file_name(user.display_name_or_default(), "pdf")
    );

    session.sign_out().await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_builder=debug".parse().expect("valid directive"))
                .add_directive("info".parse().expect("valid directive")),
        )
        .with(format)
        .init();
}
