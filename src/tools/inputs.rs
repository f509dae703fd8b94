//! Tool input schemas.
//!
//! The registry derives each tool's JSON schema from these types, and the
//! dispatcher deserializes arguments into them.

use crate::things::{ItemType, Status};
use schemars::JsonSchema;
use serde::Deserialize;

const fn default_true() -> bool {
    true
}

/// Input for tools that take no arguments.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoInput {}

/// Input for `get-todos`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTodosInput {
    /// Optional UUID of a specific project to get todos from.
    pub project_uuid: Option<String>,
    /// Include checklist items.
    #[serde(default = "default_true")]
    pub include_items: bool,
}

/// Input for listings that can nest their items.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct IncludeItemsInput {
    /// Include nested items.
    #[serde(default)]
    pub include_items: bool,
}

/// Input for `get-tagged-items`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TaggedItemsInput {
    /// Tag title to filter by.
    pub tag: String,
}

/// Input for tools that take a single search query.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// Search term.
    pub query: String,
}

/// Input for `search-advanced`.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SearchAdvancedInput {
    /// Filter by todo status.
    pub status: Option<Status>,
    /// Filter by start date (YYYY-MM-DD).
    pub start_date: Option<String>,
    /// Filter by deadline (YYYY-MM-DD).
    pub deadline: Option<String>,
    /// Filter by tag.
    pub tag: Option<String>,
    /// Filter by area UUID.
    pub area: Option<String>,
    /// Filter by item type.
    #[serde(rename = "type")]
    pub kind: Option<ItemType>,
}

/// Input for `get-recent`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RecentInput {
    /// Time period (e.g. '3d', '1w', '2m', '1y').
    #[schemars(regex(pattern = r"^\d+[dwmy]$"))]
    pub period: String,
}

/// Input for `add-todo`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddTodoInput {
    /// Title of the todo.
    pub title: String,
    /// Notes for the todo.
    pub notes: Option<String>,
    /// When to schedule it (today, tomorrow, evening, anytime, someday, or YYYY-MM-DD).
    pub when: Option<String>,
    /// Deadline (YYYY-MM-DD).
    pub deadline: Option<String>,
    /// Tags to apply.
    pub tags: Option<Vec<String>>,
    /// Checklist items to add.
    pub checklist_items: Option<Vec<String>>,
    /// UUID of the project or area to add to.
    pub list_id: Option<String>,
    /// Title of the project or area to add to.
    pub list_title: Option<String>,
    /// Heading inside the project to add under.
    pub heading: Option<String>,
    /// Create the todo already completed.
    pub completed: Option<bool>,
}

/// Input for `add-project`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddProjectInput {
    /// Title of the project.
    pub title: String,
    /// Notes for the project.
    pub notes: Option<String>,
    /// When to schedule it.
    pub when: Option<String>,
    /// Deadline (YYYY-MM-DD).
    pub deadline: Option<String>,
    /// Tags to apply.
    pub tags: Option<Vec<String>>,
    /// UUID of the area to add to.
    pub area_id: Option<String>,
    /// Title of the area to add to.
    pub area_title: Option<String>,
    /// Initial todos to create in the project.
    pub todos: Option<Vec<String>>,
}

/// Input for `update-todo` and `update-project`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateInput {
    /// UUID of the item to update.
    pub id: String,
    /// New title.
    pub title: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// New schedule.
    pub when: Option<String>,
    /// New deadline.
    pub deadline: Option<String>,
    /// Replacement tags.
    pub tags: Option<Vec<String>>,
    /// Mark as completed.
    pub completed: Option<bool>,
    /// Mark as canceled.
    pub canceled: Option<bool>,
}

/// Input for `show-item`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ShowItemInput {
    /// UUID of an item, or a list id such as inbox, today, upcoming, anytime, someday, logbook.
    pub id: String,
    /// Optional query to filter by.
    pub query: Option<String>,
    /// Optional tags to filter by.
    pub filter_tags: Option<Vec<String>>,
}

/// Input for `notes-create`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NotesCreateInput {
    /// The title of the note.
    pub title: String,
    /// The content of the note.
    pub content: String,
    /// Optional tags for the note.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input for notes tools addressed by title.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoteTitleInput {
    /// The exact title of the note.
    pub title: String,
}
