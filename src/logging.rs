//! File logging for the bridge.
//!
//! Writes logs to `~/.tasknote-bridge/bridge.log` by default.
//! Stdout carries the MCP protocol, so nothing is logged there.

use chrono::{SecondsFormat, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::panic;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

/// Maximum log file size before rotation (1MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Global log file handle (lazily initialized).
static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

/// Initialize the logger at the default location.
///
/// # Errors
///
/// Returns an error if the home directory is unknown or the file cannot be created.
pub fn init_default() -> std::io::Result<()> {
    let path = crate::paths::log_path().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
    })?;
    init(&path)
}

/// Initialize the logger to append to `path`.
///
/// This should be called once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
pub fn init(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    if let Ok(metadata) = fs::metadata(path) {
        if metadata.len() > MAX_LOG_SIZE {
            let backup = path.with_extension("log.old");
            let _ = fs::rename(path, backup);
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = Some(file);
    }

    log_event("Bridge starting");

    Ok(())
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Write a log entry.
fn write_log(message: &str) {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            let ts = timestamp();
            let _ = writeln!(file, "[{ts}] {message}");
            let _ = file.flush();
        }
    }
}

/// Log a general event.
pub fn log_event(message: &str) {
    write_log(&format!("EVENT: {message}"));
}

/// Log a tool call start.
pub fn log_tool_start(tool_name: &str) {
    write_log(&format!("TOOL_START: {tool_name}"));
}

/// Log a tool call completion with duration.
pub fn log_tool_end(tool_name: &str, duration_ms: u128, success: bool) {
    let status = if success { "OK" } else { "ERROR" };
    write_log(&format!("TOOL_END: {tool_name} ({duration_ms}ms) [{status}]"));
}

/// Log an error.
pub fn log_error(message: &str) {
    write_log(&format!("ERROR: {message}"));
}

/// Log a warning.
pub fn log_warning(message: &str) {
    write_log(&format!("WARN: {message}"));
}

#[allow(deprecated)] // PanicInfo is deprecated but PanicHookInfo requires Rust 1.81+
fn log_panic(info: &panic::PanicInfo<'_>) {
    let location = info.location().map_or_else(
        || "unknown".to_string(),
        |loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()),
    );

    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());

    write_log(&format!("PANIC at {location}: {payload}"));

    let backtrace = std::backtrace::Backtrace::capture().to_string();
    if !backtrace.is_empty() && !backtrace.contains("disabled") {
        for line in backtrace.lines() {
            write_log(&format!("  {line}"));
        }
    }
}

/// Install a panic hook that logs panics to the log file.
///
/// This should be called after `init()`.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        log_panic(info);
        original_hook(info);
    }));

    log_event("Panic hook installed");
}

/// Log shutdown.
pub fn log_shutdown(exit_code: Option<i32>) {
    match exit_code {
        Some(code) => write_log(&format!("SHUTDOWN: exit code {code}")),
        None => write_log("SHUTDOWN: normal"),
    }
}

/// A guard that logs tool call duration when dropped.
///
/// ```ignore
/// let mut guard = ToolCallGuard::new("get-inbox");
/// // ... execute tool ...
/// guard.mark_error(); // only on failure
/// ```
pub struct ToolCallGuard {
    tool_name: String,
    start: Instant,
    success: bool,
}

impl ToolCallGuard {
    /// Create a new tool call guard and log the start.
    #[must_use]
    pub fn new(tool_name: &str) -> Self {
        log_tool_start(tool_name);
        Self { tool_name: tool_name.to_string(), start: Instant::now(), success: true }
    }

    /// Mark the tool call as failed.
    pub fn mark_error(&mut self) {
        self.success = false;
    }
}

impl Drop for ToolCallGuard {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_millis();
        log_tool_end(&self.tool_name, duration, self.success);
    }
}
