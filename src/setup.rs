//! MCP client configuration snippets.
//!
//! Generates the entries Claude Desktop and VSCode need to launch the
//! `tasknote-mcp` binary, and can merge the Claude Desktop entry into an
//! existing config file.

use crate::error::Result;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

/// Key the server is registered under in client configs.
pub const SERVER_KEY: &str = "things";

/// Name of the stdio server binary.
pub const MCP_BINARY: &str = "tasknote-mcp";

/// Which client to configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SetupTarget {
    /// Claude Desktop.
    Claude,
    /// VSCode.
    Vscode,
}

/// Path of the `tasknote-mcp` binary installed next to the running executable.
///
/// Falls back to the bare binary name, resolved through `PATH` by the client.
#[must_use]
pub fn mcp_binary_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(MCP_BINARY)))
        .filter(|path| path.exists())
        .unwrap_or_else(|| PathBuf::from(MCP_BINARY))
}

/// Claude Desktop config location for an operating system name and home directory.
#[must_use]
pub fn claude_config_path_for(os: &str, home: &Path) -> PathBuf {
    match os {
        "macos" => home.join("Library/Application Support/Claude/claude_desktop_config.json"),
        "windows" => home.join("AppData/Roaming/Claude/claude_desktop_config.json"),
        _ => home.join(".config/claude/claude_desktop_config.json"),
    }
}

/// Claude Desktop config location on this machine.
#[must_use]
pub fn claude_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| claude_config_path_for(std::env::consts::OS, &home))
}

fn server_entry(command: &Path) -> Value {
    json!({"command": command.display().to_string(), "args": []})
}

/// The Claude Desktop `mcpServers` snippet.
#[must_use]
pub fn claude_config(command: &Path) -> Value {
    json!({"mcpServers": {SERVER_KEY: server_entry(command)}})
}

/// The VSCode `settings.json` snippet.
#[must_use]
pub fn vscode_config(command: &Path) -> Value {
    json!({"mcp": {"inputs": [], "servers": {SERVER_KEY: server_entry(command)}}})
}

/// Human-readable setup instructions for `target`.
#[must_use]
pub fn render(target: SetupTarget, command: &Path) -> String {
    let (location, snippet) = match target {
        SetupTarget::Claude => (
            claude_config_path().map_or_else(
                || "Claude Desktop config file".to_string(),
                |p| p.display().to_string(),
            ),
            claude_config(command),
        ),
        SetupTarget::Vscode => ("VSCode settings.json".to_string(), vscode_config(command)),
    };
    let pretty = serde_json::to_string_pretty(&snippet).unwrap_or_default();
    format!(
        "Add this to {location}:\n\n{pretty}\n\n\
         Things must have 'Enable Things URLs' turned on for the write tools."
    )
}

/// Merge the server entry into the Claude Desktop config at `path`.
///
/// Other servers and settings in the file are preserved.
///
/// # Errors
///
/// Returns an error if the existing file is not valid JSON or cannot be written.
pub fn install_claude_config(path: &Path, command: &Path) -> Result<()> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_str(&content)?
        }
    } else {
        Value::Object(Map::new())
    };

    if !config.is_object() {
        config = Value::Object(Map::new());
    }
    if !config["mcpServers"].is_object() {
        config["mcpServers"] = Value::Object(Map::new());
    }
    config["mcpServers"][SERVER_KEY] = server_entry(command);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(&config)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_claude_config_path_per_platform() {
        let home = Path::new("/home/u");
        assert_eq!(
            claude_config_path_for("macos", home),
            PathBuf::from("/home/u/Library/Application Support/Claude/claude_desktop_config.json")
        );
        assert!(claude_config_path_for("windows", home).ends_with("AppData/Roaming/Claude/claude_desktop_config.json"));
        assert_eq!(
            claude_config_path_for("linux", home),
            PathBuf::from("/home/u/.config/claude/claude_desktop_config.json")
        );
    }

    #[test]
    fn test_snippets_point_at_binary() {
        let bin = Path::new("/opt/bin/tasknote-mcp");
        let claude = claude_config(bin);
        assert_eq!(claude["mcpServers"]["things"]["command"], "/opt/bin/tasknote-mcp");

        let vscode = vscode_config(bin);
        assert_eq!(vscode["mcp"]["servers"]["things"]["command"], "/opt/bin/tasknote-mcp");
        assert_eq!(vscode["mcp"]["inputs"], json!([]));
    }

    #[test]
    fn test_render_includes_snippet() {
        let text = render(SetupTarget::Vscode, Path::new("tasknote-mcp"));
        assert!(text.starts_with("Add this to VSCode settings.json:"));
        assert!(text.contains("\"servers\""));
    }

    #[test]
    fn test_install_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Claude/claude_desktop_config.json");

        install_claude_config(&path, Path::new("/bin/tasknote-mcp")).unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, claude_config(Path::new("/bin/tasknote-mcp")));
    }

    #[test]
    fn test_install_preserves_other_servers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"theme": "dark", "mcpServers": {"other": {"command": "x"}, "things": {"command": "old"}}}"#,
        )
        .unwrap();

        install_claude_config(&path, Path::new("new")).unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["theme"], "dark");
        assert_eq!(written["mcpServers"]["other"]["command"], "x");
        assert_eq!(written["mcpServers"]["things"]["command"], "new");
    }

    #[test]
    fn test_install_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{broken").unwrap();
        assert!(install_claude_config(&path, Path::new("x")).is_err());
    }
}
