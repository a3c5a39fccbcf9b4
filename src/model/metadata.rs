//! Document metadata.

use super::NodeId;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// Provenance note appended to the imported `Comments` text.
pub const PROVENANCE_NOTE: &str = "Reading order and text line analyses: pagexml";

/// Separator placed between the original comments and the provenance note.
pub const PROVENANCE_SEPARATOR: &str = "\n\t\t\t";

/// View of a PAGE `Metadata` block.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    /// Creating application or organisation
    pub creator: Option<String>,

    /// Creation timestamp
    pub created: Option<DateTime<Utc>>,

    /// Last modification timestamp
    pub last_change: Option<DateTime<Utc>>,

    /// Freeform comments, including the provenance note
    pub comments: String,

    /// The `Metadata` element
    #[serde(skip)]
    pub node: NodeId,
}

impl Metadata {
    /// Check if the comments end with the given provenance note.
    pub fn has_provenance(&self, note: &str) -> bool {
        self.comments.ends_with(note)
    }
}

/// Append a provenance note to existing comments.
pub fn append_provenance(comments: &str, note: &str) -> String {
    format!("{}{}{}", comments, PROVENANCE_SEPARATOR, note)
}

/// Parse a PAGE timestamp (`xsd:dateTime`).
///
/// Timestamps without an offset are taken as UTC.
pub fn parse_page_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}
