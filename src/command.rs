//! Real process-backed implementations of the OS ports.

use crate::error::{Error, Result};
use crate::traits::{AutomationResult, ScriptRunner, UrlOpener};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

/// Error text reported when the interpreter exceeds its timeout.
pub const TIMEOUT_MESSAGE: &str = "AppleScript execution timed out";

/// The macOS automation interpreter.
const OSASCRIPT: &str = "osascript";

/// Runs scripts through `osascript`, feeding the script text over stdin.
#[derive(Debug, Clone)]
pub struct OsaScriptRunner {
    program: String,
}

impl Default for OsaScriptRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl OsaScriptRunner {
    /// Create a runner for `osascript`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program(OSASCRIPT)
    }

    /// Create a runner that feeds scripts to another interpreter.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[async_trait]
impl ScriptRunner for OsaScriptRunner {
    async fn run(&self, script: &str, timeout: Duration) -> AutomationResult {
        let spawned = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();
        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => return AutomationResult::failed(format!("Error executing AppleScript: {e}")),
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdin = child.stdin.take();

        // The deadline covers draining the pipes as well as the exit.
        let interaction = async {
            let feed = async {
                if let Some(mut stdin) = stdin {
                    // Broken pipe means the interpreter already exited.
                    let _ = stdin.write_all(script.as_bytes()).await;
                    let _ = stdin.shutdown().await;
                }
            };
            let ((), stdout, stderr, status) =
                tokio::join!(feed, read_pipe(stdout), read_pipe(stderr), child.wait());
            status.map(|status| (status, stdout, stderr))
        };
        let outcome = tokio::time::timeout(timeout, interaction).await;

        match outcome {
            Ok(Ok((status, stdout, stderr))) => {
                if status.success() {
                    AutomationResult::ok(stdout.trim())
                } else {
                    AutomationResult::failed(stderr.trim())
                }
            }
            Ok(Err(e)) => AutomationResult::failed(format!("Error executing AppleScript: {e}")),
            Err(_) => {
                // kill() also waits, so the process is reaped before we return.
                let _ = child.kill().await;
                AutomationResult::failed(TIMEOUT_MESSAGE)
            }
        }
    }
}

/// Hands URLs to the OS default-handler mechanism (`open` on macOS).
#[derive(Debug, Clone)]
pub struct SystemUrlOpener {
    program: String,
}

impl Default for SystemUrlOpener {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemUrlOpener {
    /// Create an opener for the current platform.
    #[must_use]
    pub fn new() -> Self {
        let program = if cfg!(target_os = "macos") { "open" } else { "xdg-open" };
        Self::with_program(program)
    }

    /// Create an opener that invokes another program with the URL as its argument.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

#[async_trait]
impl UrlOpener for SystemUrlOpener {
    async fn open(&self, url: &str) -> Result<()> {
        let child = Command::new(&self.program)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::UrlDispatch(format!("{}: {e}", self.program)))?;
        // Fire-and-forget: the runtime reaps the handler process in the background.
        drop(child);
        Ok(())
    }
}
