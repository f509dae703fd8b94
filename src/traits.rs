//! Core traits for the OS-facing side effects.
//!
//! Both side effects the bridge has (running an automation script and handing a
//! URL to the OS) sit behind these traits so the dispatcher can be driven by fakes.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of one automation interpreter invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutomationResult {
    /// Whether the interpreter exited successfully.
    pub success: bool,
    /// Trimmed standard output (empty on failure).
    pub output: String,
    /// Error text when `success` is false.
    pub error: Option<String>,
}

impl AutomationResult {
    /// A successful result with the given output.
    #[must_use]
    pub fn ok(output: impl Into<String>) -> Self {
        Self { success: true, output: output.into(), error: None }
    }

    /// A failed result with the given error text.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, output: String::new(), error: Some(error.into()) }
    }

    /// The error text, or a generic message if none was captured.
    #[must_use]
    pub fn error_text(&self) -> &str {
        self.error.as_deref().filter(|e| !e.is_empty()).unwrap_or("unknown automation error")
    }
}

/// Trait for running automation scripts.
///
/// Implementations spawn exactly one interpreter process per call and never
/// return before that process has exited or been killed.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Run `script`, waiting at most `timeout`.
    ///
    /// Failures of any kind are reported inside the result, never as a panic.
    async fn run(&self, script: &str, timeout: Duration) -> AutomationResult;
}

/// Trait for handing URLs to the operating system's default handler.
///
/// Dispatch is fire-and-forget: `Ok` means the URL was handed off, not that the
/// receiving application acted on it.
#[async_trait]
pub trait UrlOpener: Send + Sync {
    /// Hand `url` to the OS.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS handler could not be invoked.
    async fn open(&self, url: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_result() {
        let result = AutomationResult::ok("Alpha, Beta");
        assert!(result.success);
        assert_eq!(result.output, "Alpha, Beta");
        assert!(result.error.is_none());
    }

    #[test]
    fn test_failed_result() {
        let result = AutomationResult::failed("execution error: Notes got an error (-1728)");
        assert!(!result.success);
        assert!(result.output.is_empty());
        assert_eq!(result.error_text(), "execution error: Notes got an error (-1728)");
    }

    #[test]
    fn test_error_text_fallback() {
        let result = AutomationResult { success: false, output: String::new(), error: None };
        assert_eq!(result.error_text(), "unknown automation error");

        let blank = AutomationResult::failed("");
        assert_eq!(blank.error_text(), "unknown automation error");
    }
}
