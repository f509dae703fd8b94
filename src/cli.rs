//! Command-line interface for the bridge.
//!
//! The binary is a thin wrapper: it parses arguments with [`Cli`] and
//! prints the [`Outcome`] returned by [`run`].

use crate::config::BridgeConfig;
use crate::error::{Error, Result};
use crate::setup::{self, SetupTarget};
use crate::tools::{registry, Dispatcher};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::process::ExitCode;

/// Things 3 and Apple Notes bridge.
#[derive(Debug, Parser)]
#[command(name = "tasknote-bridge", version, about)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Serve the HTTP surface and companion page.
    Web {
        /// Port to listen on (defaults to the configured port).
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the tool registry as JSON.
    Tools,
    /// Call one tool and print its text blocks.
    Call {
        /// Tool name, e.g. `get-today`.
        tool: String,
        /// Arguments as a JSON object.
        #[arg(long)]
        args: Option<String>,
    },
    /// Print an MCP client configuration snippet.
    Setup {
        /// Client to configure.
        #[arg(long, value_enum, default_value = "claude")]
        target: SetupTarget,
        /// Merge the entry into the Claude Desktop config file.
        #[arg(long)]
        write: bool,
    },
    /// Print the effective configuration as YAML.
    Config,
}

/// What a command printed and whether it succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the command succeeded.
    pub success: bool,
    /// Output lines.
    pub lines: Vec<String>,
}

impl Outcome {
    fn ok(lines: Vec<String>) -> Self {
        Self { success: true, lines }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self { success: false, lines: vec![message.into()] }
    }

    /// Process exit code for this outcome.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if self.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

impl From<Result<Vec<String>>> for Outcome {
    fn from(result: Result<Vec<String>>) -> Self {
        match result {
            Ok(lines) => Self::ok(lines),
            Err(e) => Self::failed(format!("Error: {e}")),
        }
    }
}

/// Run a parsed command.
pub async fn run(cli: Cli, config: &BridgeConfig) -> Outcome {
    match cli.command {
        Command::Web { port } => {
            let port = port.unwrap_or(config.http_port);
            crate::web::serve(config, port).await.map(|()| Vec::new()).into()
        }
        Command::Tools => tools_json().map(|json| vec![json]).into(),
        Command::Call { tool, args } => {
            call(&Dispatcher::from_config(config), &tool, args.as_deref()).await
        }
        Command::Setup { target, write } => setup_cmd(target, write).into(),
        Command::Config => {
            serde_yaml::to_string(config).map(|yaml| vec![yaml]).map_err(Error::from).into()
        }
    }
}

/// The registry as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn tools_json() -> Result<String> {
    Ok(serde_json::to_string_pretty(registry())?)
}

fn parse_call_args(args: Option<&str>) -> Result<Option<Map<String, Value>>> {
    let Some(raw) = args else {
        return Ok(None);
    };
    match serde_json::from_str(raw)? {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(Error::InvalidArgument("--args must be a JSON object".to_string())),
    }
}

/// Dispatch one tool call and collect its text blocks.
pub async fn call(dispatcher: &Dispatcher, tool: &str, args: Option<&str>) -> Outcome {
    let arguments = match parse_call_args(args) {
        Ok(arguments) => arguments,
        Err(e) => return Outcome::failed(format!("Error: {e}")),
    };
    let result = dispatcher.dispatch(tool, arguments).await;
    Outcome { success: !result.is_error, lines: result.content }
}

fn setup_cmd(target: SetupTarget, write: bool) -> Result<Vec<String>> {
    let binary = setup::mcp_binary_path();
    let mut lines = vec![setup::render(target, &binary)];
    if write {
        if target != SetupTarget::Claude {
            return Err(Error::InvalidArgument(
                "--write is only supported for Claude Desktop".to_string(),
            ));
        }
        let path = setup::claude_config_path()
            .ok_or_else(|| Error::InvalidArgument("home directory not found".to_string()))?;
        setup::install_claude_config(&path, &binary)?;
        lines.push(format!("Updated {}. Restart Claude Desktop to apply.", path.display()));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::AppleNotes;
    use crate::testing::{FakeThingsStore, InMemoryNotesRunner, RecordingUrlOpener};
    use std::sync::Arc;
    use std::time::Duration;

    fn dispatcher() -> Dispatcher {
        let notes = AppleNotes::new(
            Arc::new(InMemoryNotesRunner::with_titles(&["Groceries"])),
            "iCloud".to_string(),
            Duration::from_secs(1),
        );
        Dispatcher::new(
            Arc::new(FakeThingsStore::default()),
            Arc::new(notes),
            Arc::new(RecordingUrlOpener::new()),
        )
    }

    #[test]
    fn test_parse_call() {
        let cli = Cli::try_parse_from([
            "tasknote-bridge",
            "call",
            "notes-search",
            "--args",
            r#"{"query":"x"}"#,
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Call {
                tool: "notes-search".to_string(),
                args: Some(r#"{"query":"x"}"#.to_string()),
            }
        );
    }

    #[test]
    fn test_parse_setup_defaults_to_claude() {
        let cli = Cli::try_parse_from(["tasknote-bridge", "setup"]).unwrap();
        assert_eq!(cli.command, Command::Setup { target: SetupTarget::Claude, write: false });

        let cli = Cli::try_parse_from(["tasknote-bridge", "setup", "--target", "vscode"]).unwrap();
        assert_eq!(cli.command, Command::Setup { target: SetupTarget::Vscode, write: false });
    }

    #[test]
    fn test_parse_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["tasknote-bridge", "frobnicate"]).is_err());
    }

    #[test]
    fn test_tools_json_lists_registry() {
        let json: Value = serde_json::from_str(&tools_json().unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 27);
        assert_eq!(json[0]["name"], "get-inbox");
    }

    #[tokio::test]
    async fn test_call_prints_text_blocks() {
        let outcome = call(&dispatcher(), "notes-list", None).await;
        assert!(outcome.success);
        assert_eq!(outcome.lines, vec!["Found 1 notes:\n• Groceries"]);
    }

    #[tokio::test]
    async fn test_call_tool_error_fails() {
        let outcome = call(&dispatcher(), "nope", None).await;
        assert!(!outcome.success);
        assert_eq!(outcome.lines, vec!["Error: Unknown tool: nope"]);
    }

    #[tokio::test]
    async fn test_call_rejects_non_object_args() {
        let outcome = call(&dispatcher(), "notes-list", Some("[1, 2]")).await;
        assert!(!outcome.success);
        assert!(outcome.lines[0].contains("JSON object"));

        let outcome = call(&dispatcher(), "notes-list", Some("{oops")).await;
        assert!(!outcome.success);
    }

    #[test]
    fn test_setup_write_requires_claude() {
        assert!(setup_cmd(SetupTarget::Vscode, true).is_err());
        let lines = setup_cmd(SetupTarget::Vscode, false).unwrap();
        assert_eq!(lines.len(), 1);
    }
}
