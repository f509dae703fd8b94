//! Tool catalog, argument types and the dispatcher.

pub mod dispatch;
pub mod inputs;
pub mod registry;

pub use dispatch::Dispatcher;
pub use registry::{registry, ToolSpec};

use crate::error::Error;
use serde::Serialize;
use std::str::FromStr;

macro_rules! tool_names {
    ($($variant:ident => $name:literal,)+) => {
        /// Every tool the bridge exposes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ToolName {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )+
        }

        impl ToolName {
            /// All tools in catalog order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// The wire name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }
    };
}

tool_names! {
    GetInbox => "get-inbox",
    GetToday => "get-today",
    GetUpcoming => "get-upcoming",
    GetAnytime => "get-anytime",
    GetSomeday => "get-someday",
    GetLogbook => "get-logbook",
    GetTrash => "get-trash",
    GetTodos => "get-todos",
    GetProjects => "get-projects",
    GetAreas => "get-areas",
    GetTags => "get-tags",
    GetTaggedItems => "get-tagged-items",
    SearchTodos => "search-todos",
    SearchAdvanced => "search-advanced",
    GetRecent => "get-recent",
    AddTodo => "add-todo",
    AddProject => "add-project",
    UpdateTodo => "update-todo",
    UpdateProject => "update-project",
    ShowItem => "show-item",
    SearchItems => "search-items",
    NotesCreate => "notes-create",
    NotesSearch => "notes-search",
    NotesList => "notes-list",
    NotesGetContent => "notes-get-content",
    NotesOpen => "notes-open",
    NotesDelete => "notes-delete",
}

impl FromStr for ToolName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| Error::UnknownTool(s.to_string()))
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ToolName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of one tool call: ordered text blocks plus an error flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResult {
    /// Text content blocks.
    pub content: Vec<String>,
    /// Whether the call failed.
    pub is_error: bool,
}

impl ToolResult {
    /// A successful single-block result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self { content: vec![text.into()], is_error: false }
    }

    /// A failed single-block result.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self { content: vec![text.into()], is_error: true }
    }

    /// The first text block (empty if there is none).
    #[must_use]
    pub fn first_text(&self) -> &str {
        self.content.first().map_or("", String::as_str)
    }
}
