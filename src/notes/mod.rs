//! Apple Notes integration through the automation interpreter.

pub mod manager;
pub mod models;
pub mod script;

pub use manager::AppleNotes;
pub use models::Note;

use crate::error::Result;
use async_trait::async_trait;

/// Operations the dispatcher needs from a notes application.
#[async_trait]
#[allow(clippy::missing_errors_doc)]
pub trait NotesAutomationPort: Send + Sync {
    /// Create a note. Errors carry the interpreter's error text.
    async fn create_note(&self, title: &str, content: &str, tags: &[String]) -> Result<Note>;

    /// Search note titles with the all-terms-then-any-term policy.
    async fn search_notes(&self, query: &str) -> Result<Vec<Note>>;

    /// The HTML body of the note titled `title`, or `None` if there is none.
    async fn get_note_content(&self, title: &str) -> Result<Option<String>>;

    /// Every note in the account (titles only).
    async fn list_notes(&self) -> Result<Vec<Note>>;

    /// Show a note in the Notes app. `false` means the note was not found.
    async fn open_note(&self, title: &str) -> Result<bool>;

    /// Delete a note. `false` means the interpreter reported a failure.
    async fn delete_note(&self, title: &str) -> Result<bool>;
}
