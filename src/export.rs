// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Export formatter: renders a profile and activity list into a printable
//! document structure and a plain-text block.
//!
//! Pure consumer of repository output. Activities render in the order
//! given; callers pre-sort via the statistics engine.

use crate::models::{Activity, UserProfile};
use crate::time_utils::format_month;

const SUBTITLE: &str = "Extracurricular Portfolio";
const DIVIDER_WIDTH: usize = 50;

/// Structured export document; renderers (PDF, text) consume this.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub header: Header,
    pub summary: Summary,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub name: String,
    pub subtitle: String,
    /// "Class of {year}" line, when a grad year is set
    pub class_line: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub activity_count: usize,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub title: String,
    pub role: Option<String>,
    pub organization: Option<String>,
    pub date_range: String,
    pub total_hours: f64,
    pub description: String,
    pub achievements: Vec<String>,
    pub skills: Vec<String>,
}

/// Format a date range as `Mon YYYY - Mon YYYY`, with "Present" for an
/// ongoing activity.
pub fn format_date_range(start_date: &str, end_date: Option<&str>) -> String {
    let start = format_month(start_date);
    let end = match end_date {
        Some(ym) => format_month(ym),
        None => "Present".to_string(),
    };
    format!("{start} - {end}")
}

/// Download file name: `{name with whitespace→_}_Portfolio.{ext}`.
pub fn export_file_name(display_name: &str, ext: &str) -> String {
    let safe: String = display_name.split_whitespace().collect::<Vec<_>>().join("_");
    let safe = if safe.is_empty() { "User".to_string() } else { safe };
    format!("{safe}_Portfolio.{ext}")
}

/// Build the document structure from a profile and an ordered list.
pub fn build_document(
    profile: Option<&UserProfile>,
    display_name: &str,
    activities: &[Activity],
) -> ExportDocument {
    let total_hours: f64 = activities.iter().map(|a| a.total_hours).sum();

    ExportDocument {
        header: Header {
            name: display_name.to_string(),
            subtitle: SUBTITLE.to_string(),
            class_line: profile
                .and_then(|p| p.grad_year.as_ref())
                .map(|year| format!("Class of {year}")),
            bio: profile.and_then(|p| p.bio.clone()),
        },
        summary: Summary {
            activity_count: activities.len(),
            total_hours,
        },
        entries: activities
            .iter()
            .map(|a| Entry {
                title: a.title.clone(),
                role: a.role.clone(),
                organization: a.organization.clone(),
                date_range: format_date_range(&a.start_date, a.end_date.as_deref()),
                total_hours: a.total_hours,
                description: a.description.clone(),
                achievements: a.achievements.clone(),
                skills: a.skills.clone(),
            })
            .collect(),
    }
}

/// Render the plain-text clipboard payload.
pub fn render_text(doc: &ExportDocument) -> String {
    let divider = "=".repeat(DIVIDER_WIDTH);
    let mut text = String::new();

    text.push_str(&format!("{}\n", doc.header.name));
    text.push_str(&format!("{}\n", doc.header.subtitle));
    if let Some(class_line) = &doc.header.class_line {
        text.push_str(&format!("{class_line}\n"));
    }
    text.push_str(&format!("{divider}\n\n"));

    if let Some(bio) = &doc.header.bio {
        text.push_str(&format!("{bio}\n\n"));
    }

    text.push_str(&format!(
        "{} Activities | {} Total Hours\n\n",
        doc.summary.activity_count, doc.summary.total_hours
    ));
    text.push_str(&format!("{divider}\n\n"));

    for entry in &doc.entries {
        text.push_str(&entry.title);
        if let Some(role) = &entry.role {
            text.push_str(&format!(" - {role}"));
        }
        text.push('\n');

        if let Some(org) = &entry.organization {
            text.push_str(&format!("{org}\n"));
        }

        text.push_str(&entry.date_range);
        if entry.total_hours > 0.0 {
            text.push_str(&format!(" | {} hours", entry.total_hours));
        }
        text.push_str("\n\n");

        if !entry.description.is_empty() {
            text.push_str(&format!("{}\n\n", entry.description));
        }

        if !entry.achievements.is_empty() {
            text.push_str("Achievements:\n");
            for achievement in &entry.achievements {
                text.push_str(&format!("  • {achievement}\n"));
            }
            text.push('\n');
        }

        if !entry.skills.is_empty() {
            text.push_str(&format!("Skills: {}\n", entry.skills.join(", ")));
        }

        text.push_str(&format!("\n{}\n\n", "-".repeat(DIVIDER_WIDTH)));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityDraft, ActivityType};

    fn sample_profile() -> UserProfile {
        let mut profile = UserProfile::new_default("u1", "ada@example.com", "Ada Lovelace");
        profile.grad_year = Some("2027".to_string());
        profile.bio = Some("Aspiring engineer.".to_string());
        profile
    }

    fn sample_activity() -> Activity {
        ActivityDraft {
            kind: ActivityType::Club,
            title: "Robotics Club".to_string(),
            organization: Some("Lincoln High".to_string()),
            role: Some("Captain".to_string()),
            description: "Built competition robots".to_string(),
            start_date: "2023-09".to_string(),
            end_date: None,
            total_hours: 120.0,
            skills: vec!["CAD".to_string(), "Leadership".to_string()],
            achievements: vec!["Won regionals".to_string()],
            ..Default::default()
        }
        .into_activity("a1".to_string(), 1)
    }

    #[test]
    fn test_format_date_range() {
        assert_eq!(
            format_date_range("2023-09", Some("2024-06")),
            "Sep 2023 - Jun 2024"
        );
        assert_eq!(format_date_range("2023-09", None), "Sep 2023 - Present");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name("Ada Lovelace", "pdf"),
            "Ada_Lovelace_Portfolio.pdf"
        );
        assert_eq!(export_file_name("Ada", "txt"), "Ada_Portfolio.txt");
        assert_eq!(export_file_name("", "pdf"), "User_Portfolio.pdf");
    }

    #[test]
    fn test_build_document_header_and_summary() {
        let profile = sample_profile();
        let doc = build_document(Some(&profile), "Ada Lovelace", &[sample_activity()]);

        assert_eq!(doc.header.name, "Ada Lovelace");
        assert_eq!(doc.header.subtitle, "Extracurricular Portfolio");
        assert_eq!(doc.header.class_line.as_deref(), Some("Class of 2027"));
        assert_eq!(doc.summary.activity_count, 1);
        assert_eq!(doc.summary.total_hours, 120.0);
        assert_eq!(doc.entries[0].date_range, "Sep 2023 - Present");
    }

    #[test]
    fn test_build_document_without_profile() {
        let doc = build_document(None, "Ada", &[]);
        assert!(doc.header.class_line.is_none());
        assert!(doc.header.bio.is_none());
        assert_eq!(doc.summary.activity_count, 0);
    }

    #[test]
    fn test_render_text_sections_in_order() {
        let profile = sample_profile();
        let doc = build_document(Some(&profile), "Ada Lovelace", &[sample_activity()]);
        let text = render_text(&doc);

        let expected_prefix = format!(
            "Ada Lovelace\nExtracurricular Portfolio\nClass of 2027\n{}\n\nAspiring engineer.\n\n1 Activities | 120 Total Hours\n\n",
            "=".repeat(50)
        );
        assert!(text.starts_with(&expected_prefix), "got:\n{text}");

        assert!(text.contains("Robotics Club - Captain\n"));
        assert!(text.contains("Lincoln High\n"));
        assert!(text.contains("Sep 2023 - Present | 120 hours\n"));
        assert!(text.contains("Achievements:\n  • Won regionals\n"));
        assert!(text.contains("Skills: CAD, Leadership\n"));
        assert!(text.contains(&"-".repeat(50)));
    }

    #[test]
    fn test_render_text_omits_zero_hours() {
        let mut activity = sample_activity();
        activity.total_hours = 0.0;
        let doc = build_document(None, "Ada", &[activity]);
        let text = render_text(&doc);
        assert!(!text.contains("| 0 hours"));
    }
}
