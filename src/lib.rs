//! # `tasknote_bridge`
//!
//! Exposes Things 3 tasks and Apple Notes as callable tools for assistant
//! hosts, over MCP stdio, a local HTTP endpoint, or the command line.

#[cfg(all(feature = "cli", feature = "web"))]
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
#[cfg(feature = "mcp")]
pub mod mcp;
pub mod notes;
pub mod paths;
pub mod setup;
pub mod testing;
pub mod things;
pub mod tools;
pub mod traits;
#[cfg(feature = "web")]
pub mod web;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
