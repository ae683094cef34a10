//! # Report Model
//!
//! The input representation for the report engine: a fully-resolved object
//! graph of project → categories → items → photos, as handed over by the
//! surrounding application. The engine performs no database access and
//! trusts this graph completely; authorization happens before it is built.
//!
//! Designed to deserialize directly from the application's JSON export
//! (camelCase fields, SCREAMING_SNAKE_CASE enums), but just as easy to
//! construct in Rust for tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::style::Theme;

/// A complete report input, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub project: Project,

    /// Column label overrides from the project settings. Every field is
    /// optional; `resolve()` fills documented defaults.
    #[serde(default)]
    pub labels: ReportLabels,

    /// Categories in the caller's display order. The engine never
    /// re-sorts categories — the caller owns that ordering (the source
    /// application sorts by an explicit orderIndex before export).
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// Free-form display-string overrides for column headers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLabels {
    pub item_label: Option<String>,
    pub number_label: Option<String>,
    pub location_label: Option<String>,
    pub photo_label: Option<String>,
    pub description_label: Option<String>,
    pub solution_label: Option<String>,
    pub status_label: Option<String>,
}

/// Labels after boundary validation: every field non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLabels {
    pub item: String,
    pub number: String,
    pub location: String,
    pub photo: String,
    pub description: String,
    pub solution: String,
    pub status: String,
}

fn or_default(value: &Option<String>, default: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.clone(),
        _ => default.to_string(),
    }
}

impl ReportLabels {
    /// Apply fallback defaults once, at the boundary. Blank overrides
    /// count as absent — a header cell is never empty.
    pub fn resolve(&self) -> ResolvedLabels {
        ResolvedLabels {
            item: or_default(&self.item_label, "Snag"),
            number: or_default(&self.number_label, "No."),
            location: or_default(&self.location_label, "Location"),
            photo: or_default(&self.photo_label, "Photo"),
            description: or_default(&self.description_label, "Description"),
            solution: or_default(&self.solution_label, "Solution"),
            status: or_default(&self.status_label, "Status"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    /// Display name; a missing name renders as "Untitled category".
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Category {
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(n) if !n.trim().is_empty() => n,
            _ => "Untitled category",
        }
    }
}

/// One inspection finding ("snag") within a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Sequential number, unique and ascending within a category. Items
    /// are laid out in ascending number order regardless of input order.
    pub number: u32,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub solution: Option<String>,
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assignee: Option<Assignee>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    pub first_name: String,
    pub last_name: String,
}

impl Assignee {
    /// Compact display form: "J. Smith".
    pub fn short_name(&self) -> String {
        match self.first_name.chars().next() {
            Some(initial) => format!("{}. {}", initial, self.last_name),
            None => self.last_name.clone(),
        }
    }
}

/// A photo reference. The URL's backing bytes belong to the object
/// storage collaborator; the engine only ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Item lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Open,
    InProgress,
    PendingReview,
    Closed,
    OnHold,
}

impl Status {
    /// Abbreviated badge label. Long statuses get fixed short forms so
    /// the badge fits the status column; the rest render the enum text
    /// with underscores replaced by spaces.
    pub fn short_label(&self) -> &'static str {
        match self {
            Status::Open => "OPEN",
            Status::InProgress => "IN PROG.",
            Status::PendingReview => "REVIEW",
            Status::Closed => "CLOSED",
            Status::OnHold => "ON HOLD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

/// Which page layout the export uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutVariant {
    /// Multi-column table, one row per item, first photo only.
    #[default]
    Compact,
    /// One full-width block per item with large photos; every photo of
    /// the item is embedded with its caption.
    Detailed,
}

/// Per-export configuration, passed explicitly into the engine.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub variant: LayoutVariant,
    /// Restrict the export to one category. `None` exports the project.
    pub category_id: Option<String>,
    /// Stamped in the footer and appended to the filename. `None` uses
    /// today's local date.
    pub export_date: Option<NaiveDate>,
    /// Per-photo HTTP timeout. A timeout degrades exactly like any other
    /// fetch failure.
    pub fetch_timeout: std::time::Duration,
    pub theme: Theme,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            variant: LayoutVariant::Compact,
            category_id: None,
            export_date: None,
            fetch_timeout: std::time::Duration::from_secs(8),
            theme: Theme::default(),
        }
    }
}
