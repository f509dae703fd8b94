//! MCP (Model Context Protocol) server.
//!
//! Exposes the tool registry over stdio so an assistant host can list and
//! call the Things and Notes tools.

pub mod server;

pub use server::BridgeServer;
