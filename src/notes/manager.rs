//! Script-runner backed notes implementation.

use crate::error::{Error, Result};
use crate::logging;
use crate::notes::script::{self, TermMatch};
use crate::notes::{Note, NotesAutomationPort};
use crate::traits::{AutomationResult, ScriptRunner};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Apple Notes driven through a [`ScriptRunner`].
pub struct AppleNotes {
    runner: Arc<dyn ScriptRunner>,
    account: String,
    timeout: Duration,
}

impl AppleNotes {
    /// Create a notes client for `account`.
    pub fn new(runner: Arc<dyn ScriptRunner>, account: impl Into<String>, timeout: Duration) -> Self {
        Self { runner, account: account.into(), timeout }
    }

    /// Get the account name.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    async fn run(&self, script: &str) -> AutomationResult {
        self.runner.run(script, self.timeout).await
    }

    async fn titles(&self, script: &str) -> Result<Vec<Note>> {
        let result = self.run(script).await;
        if !result.success {
            return Err(Error::Automation(result.error_text().to_string()));
        }
        Ok(script::parse_titles(&result.output).into_iter().map(Note::titled).collect())
    }
}

#[async_trait]
impl NotesAutomationPort for AppleNotes {
    async fn create_note(&self, title: &str, content: &str, tags: &[String]) -> Result<Note> {
        let result = self.run(&script::create(&self.account, title, content)).await;
        if !result.success {
            return Err(Error::Automation(result.error_text().to_string()));
        }
        Ok(Note::new(title, content, tags.to_vec()))
    }

    async fn search_notes(&self, query: &str) -> Result<Vec<Note>> {
        let terms: Vec<&str> = query.split_whitespace().collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        if terms.len() > 1 {
            match self.titles(&script::search(&self.account, &terms, TermMatch::All)).await {
                Ok(notes) if !notes.is_empty() => return Ok(notes),
                Ok(_) => {}
                Err(e) => logging::log_warning(&format!("All-terms note search failed: {e}")),
            }
        }

        self.titles(&script::search(&self.account, &terms, TermMatch::Any)).await
    }

    async fn get_note_content(&self, title: &str) -> Result<Option<String>> {
        let result = self.run(&script::body(&self.account, title)).await;
        if !result.success {
            logging::log_warning(&format!(
                "Failed to get note content for '{title}': {}",
                result.error_text()
            ));
            return Ok(None);
        }
        Ok(Some(result.output).filter(|body| !body.is_empty()))
    }

    async fn list_notes(&self) -> Result<Vec<Note>> {
        self.titles(&script::list(&self.account)).await
    }

    async fn open_note(&self, title: &str) -> Result<bool> {
        let result = self.run(&script::open(&self.account, title)).await;
        Ok(result.success && result.output.trim().eq_ignore_ascii_case("true"))
    }

    async fn delete_note(&self, title: &str) -> Result<bool> {
        let result = self.run(&script::delete(&self.account, title)).await;
        if !result.success {
            logging::log_warning(&format!("Failed to delete note '{title}': {}", result.error_text()));
        }
        Ok(result.success)
    }
}
