//! Error types for `tasknote_bridge`.

use std::path::PathBuf;

/// Errors that can occur while serving a tool call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A `SQLite` database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The Things database could not be located.
    #[error("Things database not found: {0}")]
    DatabaseNotFound(String),

    /// A required tool argument was absent.
    #[error("Missing required parameter '{0}'")]
    MissingParameter(String),

    /// A tool argument was present but malformed.
    #[error("{0}")]
    InvalidArgument(String),

    /// The tool name is not in the registry.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// An identifier did not resolve to a project.
    #[error("Invalid project UUID '{0}'")]
    InvalidProjectId(String),

    /// The automation interpreter reported a failure.
    #[error("{0}")]
    Automation(String),

    /// Handing a URL to the OS failed.
    #[error("Failed to open URL: {0}")]
    UrlDispatch(String),

    /// A static file was not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_names_the_parameter() {
        let err = Error::MissingParameter("tag".to_string());
        assert_eq!(err.to_string(), "Missing required parameter 'tag'");
    }

    #[test]
    fn test_unknown_tool_names_the_tool() {
        let err = Error::UnknownTool("frobnicate".to_string());
        assert!(err.to_string().contains("frobnicate"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
