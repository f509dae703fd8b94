//! Record types read from the Things database.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of a `TMTask` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum ItemType {
    /// A regular to-do.
    #[default]
    #[serde(rename = "to-do")]
    Todo,
    /// A project.
    #[serde(rename = "project")]
    Project,
    /// A heading inside a project.
    #[serde(rename = "heading")]
    Heading,
}

impl ItemType {
    /// Decode the `type` column.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Project,
            2 => Self::Heading,
            _ => Self::Todo,
        }
    }

    /// The `type` column value.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Todo => 0,
            Self::Project => 1,
            Self::Heading => 2,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "to-do",
            Self::Project => "project",
            Self::Heading => "heading",
        }
    }
}

/// Completion state of a task or checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Still open.
    #[default]
    Incomplete,
    /// Done.
    Completed,
    /// Canceled.
    Canceled,
}

impl Status {
    /// Decode the `status` column.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            2 => Self::Canceled,
            3 => Self::Completed,
            _ => Self::Incomplete,
        }
    }

    /// The `status` column value.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Incomplete => 0,
            Self::Canceled => 2,
            Self::Completed => 3,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which top-level list a to-do is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StartBucket {
    /// Not yet triaged.
    #[default]
    Inbox,
    /// Available now.
    Anytime,
    /// Deferred or scheduled.
    Someday,
}

impl StartBucket {
    /// Decode the `start` column.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Anytime,
            2 => Self::Someday,
            _ => Self::Inbox,
        }
    }

    /// The `start` column value.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Inbox => 0,
            Self::Anytime => 1,
            Self::Someday => 2,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "Inbox",
            Self::Anytime => "Anytime",
            Self::Someday => "Someday",
        }
    }
}

/// Built-in Things list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView {
    /// Untriaged to-dos.
    Inbox,
    /// To-dos whose start date has arrived, plus overdue ones.
    Today,
    /// Scheduled to-dos with a future start date.
    Upcoming,
    /// Available to-dos.
    Anytime,
    /// Deferred to-dos without a start date.
    Someday,
    /// Completed and canceled items, newest first.
    Logbook,
    /// Trashed items.
    Trash,
}

impl ListView {
    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "Inbox",
            Self::Today => "Today",
            Self::Upcoming => "Upcoming",
            Self::Anytime => "Anytime",
            Self::Someday => "Someday",
            Self::Logbook => "Logbook",
            Self::Trash => "Trash",
        }
    }
}

/// Decode a packed Things date (`year<<16 | month<<12 | day<<7`).
#[must_use]
pub fn decode_things_date(value: i64) -> Option<NaiveDate> {
    if value <= 0 {
        return None;
    }
    let year = (value & 0x07FF_0000) >> 16;
    let month = (value & 0xF000) >> 12;
    let day = (value & 0x0F80) >> 7;
    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
}

/// Encode a date into the packed Things format.
#[must_use]
pub fn encode_things_date(date: NaiveDate) -> i64 {
    (i64::from(date.year()) << 16) | (i64::from(date.month()) << 12) | (i64::from(date.day()) << 7)
}

/// Convert a Unix timestamp column to a UTC datetime.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn timestamp_to_datetime(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    DateTime::from_timestamp(value.trunc() as i64, 0)
}

/// A checklist entry of a to-do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Item text.
    pub title: String,
    /// Completion state.
    pub status: Status,
}

/// A `TMTask` row as returned by list and search queries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Todo {
    /// Things identifier.
    pub uuid: String,
    /// Row kind (to-do, project or heading).
    pub kind: ItemType,
    /// Title.
    pub title: String,
    /// Free-text notes.
    pub notes: String,
    /// Completion state.
    pub status: Status,
    /// List the item is filed under.
    pub start: StartBucket,
    /// Scheduled start date.
    pub start_date: Option<NaiveDate>,
    /// Deadline.
    pub deadline: Option<NaiveDate>,
    /// When the item was completed or canceled.
    pub stop_date: Option<DateTime<Utc>>,
    /// When the item was created.
    pub created: Option<DateTime<Utc>>,
    /// Title of the owning project, directly or through a heading.
    pub project: Option<String>,
    /// Title of the owning area.
    pub area: Option<String>,
    /// Title of the heading the item sits under.
    pub heading: Option<String>,
    /// Tag titles.
    pub tags: Vec<String>,
    /// Checklist entries (only loaded when requested).
    pub checklist: Vec<ChecklistItem>,
}

/// A project with optional nested to-dos.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Project {
    /// Things identifier.
    pub uuid: String,
    /// Title.
    pub title: String,
    /// Free-text notes.
    pub notes: String,
    /// Completion state.
    pub status: Status,
    /// Title of the owning area.
    pub area: Option<String>,
    /// Scheduled start date.
    pub start_date: Option<NaiveDate>,
    /// Deadline.
    pub deadline: Option<NaiveDate>,
    /// Tag titles.
    pub tags: Vec<String>,
    /// Open to-dos (only loaded when requested).
    pub todos: Vec<Todo>,
}

/// An area with optional nested projects and to-dos.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Area {
    /// Things identifier.
    pub uuid: String,
    /// Title.
    pub title: String,
    /// Tag titles.
    pub tags: Vec<String>,
    /// Open projects (only loaded when requested).
    pub projects: Vec<Project>,
    /// Open to-dos filed directly in the area (only loaded when requested).
    pub todos: Vec<Todo>,
}

/// A tag with optional tagged items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tag {
    /// Things identifier.
    pub uuid: String,
    /// Title.
    pub title: String,
    /// Keyboard shortcut, if any.
    pub shortcut: Option<String>,
    /// Open to-dos carrying the tag (only loaded when requested).
    pub items: Vec<Todo>,
}
