//! MCP server binary for Things and Apple Notes.
//!
//! This binary runs an MCP server that exposes the bridge tools
//! through stdio transport.

use rmcp::ServiceExt;
use tasknote_bridge::config::BridgeConfig;
use tasknote_bridge::logging;
use tasknote_bridge::mcp::BridgeServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Stdout carries the protocol, so logging goes to ~/.tasknote-bridge/bridge.log
    if let Err(e) = logging::init_default() {
        eprintln!("Warning: MCP logging init failed: {e}");
    }
    logging::install_panic_hook();

    let config = BridgeConfig::load().unwrap_or_else(|e| {
        logging::log_warning(&format!("config load failed, using defaults: {e}"));
        BridgeConfig::default()
    });

    let server = BridgeServer::from_config(&config);
    logging::log_event("MCP server created, starting stdio transport");
    let service = server.serve(rmcp::transport::stdio()).await?;
    logging::log_event("MCP server running");
    service.waiting().await?;

    logging::log_shutdown(None);
    Ok(())
}
