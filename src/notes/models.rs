//! Note value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A note as seen through the automation interpreter.
///
/// `id` is synthesized from the current time when the value is built. Notes
/// does not hand out identifiers over this channel, so `id` must not be used
/// for lookups; `title` is the only key (and it is not guaranteed unique).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Synthesized, non-stable identifier (Unix milliseconds).
    pub id: String,
    /// Note title.
    pub title: String,
    /// Plain-text content; empty for notes returned by search and list.
    pub content: String,
    /// Tags supplied at creation time.
    pub tags: Vec<String>,
    /// When this value was built.
    pub created: DateTime<Utc>,
    /// When this value was built.
    pub modified: DateTime<Utc>,
}

impl Note {
    /// Create a note value stamped with the current time.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis().to_string(),
            title: title.into(),
            content: content.into(),
            tags,
            created: now,
            modified: now,
        }
    }

    /// A title-only note, as returned by search and list.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self::new(title, String::new(), Vec::new())
    }
}
