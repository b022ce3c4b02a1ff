// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for year-month dates and timestamps.
//!
//! Activity dates are stored as "YYYY-MM" strings, which keeps the lexical
//! ordering invariant (`end_date >= start_date`) a plain string comparison.

use chrono::{Datelike, NaiveDate, Utc};

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parse a "YYYY-MM" string into the first day of that month.
pub fn parse_year_month(ym: &str) -> Option<NaiveDate> {
    let (year, month) = ym.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Whether a string is a well-formed "YYYY-MM" year-month.
pub fn is_year_month(value: &str) -> bool {
    value.len() == 7 && parse_year_month(value).is_some()
}

/// Format a "YYYY-MM" string as "Mon YYYY" (e.g. "Sep 2024").
///
/// Malformed input is passed through unchanged rather than dropped, so a
/// bad stored date still shows up in exports.
pub fn format_month(ym: &str) -> String {
    match parse_year_month(ym) {
        Some(date) => date.format("%b %Y").to_string(),
        None => ym.to_string(),
    }
}

/// Estimate total hours from a date range and weekly commitment.
///
/// The week count is rounded up with a minimum of one week; an ongoing
/// activity (no end date) counts up to today.
pub fn estimate_total_hours(
    start_date: &str,
    end_date: Option<&str>,
    hours_per_week: f64,
) -> Option<f64> {
    if hours_per_week <= 0.0 {
        return None;
    }
    let start = parse_year_month(start_date)?;
    let end = match end_date {
        Some(ym) => parse_year_month(ym)?,
        None => {
            let today = Utc::now().date_naive();
            NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?
        }
    };

    let days = (end - start).num_days();
    let weeks = ((days as f64 / 7.0).ceil()).max(1.0);
    Some((weeks * hours_per_week).round())
}
