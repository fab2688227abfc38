//! Core data types for export items, lookups, and report rows.
//!
//! - [`Item`] - An entry parsed from a `.1pif` export
//! - [`Credential`] - Username and password derived from an item
//! - [`LookupResult`] - Breach status of one password hash
//! - [`ReportRow`] - One line of the CSV report
//! - [`AuditResult`] - Everything a run produced
//!
//! # Example
//!
//! ```
//! use pifpwned::model::{Item, LookupResult, ReportRow, UrlStyle};
//!
//! let item = Item::new("Example")
//!     .with_location("https://example.com")
//!     .with_field("username", "alice")
//!     .with_field("password", "hunter2");
//!
//! let credential = item.credential().unwrap();
//! let row = ReportRow::new(&item, &credential, &LookupResult::clean(), UrlStyle::Truncate);
//! assert_eq!(row.pwned, "No");
//! ```

mod item;
mod lookup;

pub use item::*;
pub use lookup::*;
use serde::{Deserialize, Serialize};

/// Locations longer than this are cut down to [`URL_KEEP_CHARS`].
const URL_MAX_CHARS: usize = 53;
const URL_KEEP_CHARS: usize = 50;

/// How an item's location is rendered in the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UrlStyle {
    /// Raw location, truncated with `...` when long.
    #[default]
    Truncate,
    /// Hostname only, falling back to truncation when unparsable.
    Host,
}

impl UrlStyle {
    pub fn render(&self, location: &str) -> String {
        match self {
            UrlStyle::Truncate => truncate_location(location),
            UrlStyle::Host => url::Url::parse(location)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
                .unwrap_or_else(|| truncate_location(location)),
        }
    }
}

fn truncate_location(location: &str) -> String {
    if location.chars().count() > URL_MAX_CHARS {
        let kept: String = location.chars().take(URL_KEEP_CHARS).collect();
        format!("{}...", kept)
    } else {
        location.to_string()
    }
}

/// One line of the CSV report. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Pwned")]
    pub pwned: String,
    #[serde(rename = "Count")]
    pub count: u64,
    #[serde(rename = "URL")]
    pub url: String,
}

impl ReportRow {
    pub fn new(item: &Item, credential: &Credential, lookup: &LookupResult, url_style: UrlStyle) -> Self {
        Self {
            title: item.title.clone(),
            username: credential.username.clone().unwrap_or_default(),
            password: credential.password.clone(),
            pwned: if lookup.pwned { "Yes" } else { "No" }.to_string(),
            count: lookup.count,
            url: url_style.render(item.location.as_deref().unwrap_or_default()),
        }
    }

    pub fn is_pwned(&self) -> bool {
        self.pwned == "Yes"
    }
}

/// Accumulated output of one audit run.
#[derive(Debug, Clone, Default)]
pub struct AuditResult {
    /// Report rows in export order.
    pub rows: Vec<ReportRow>,
    /// Number of items in the export.
    pub total_items: usize,
    /// Items skipped for lack of a password.
    pub skipped: usize,
    /// Lookups the service could not answer.
    pub unavailable: usize,
    /// Set when the run stopped before reaching the last item.
    pub interrupted: bool,
}

impl AuditResult {
    pub fn pwned_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_pwned()).count()
    }
}
