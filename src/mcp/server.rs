//! MCP server over the tool dispatcher.

use crate::config::BridgeConfig;
use crate::tools::{registry, Dispatcher, ToolResult};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer};
use std::sync::Arc;

/// Instructions for the MCP server, shown to agents using this server.
const INSTRUCTIONS: &str = "Things 3 and Apple Notes bridge.

Read tools (get-*, search-todos, search-advanced, get-recent) query the local Things database.
Write tools (add-*, update-*, show-item, search-items) hand a things:/// URL to Things. \
Things does not report whether the change was applied, so read the item back if you need to confirm it.
Notes tools (notes-*) address notes by exact title in the configured account.";

/// MCP server for Things and Apple Notes.
#[derive(Clone)]
pub struct BridgeServer {
    dispatcher: Dispatcher,
}

impl BridgeServer {
    /// Create a server over an existing dispatcher.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Build the production server from configuration.
    #[must_use]
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(Dispatcher::from_config(config))
    }

    /// The registry as MCP tool descriptors.
    #[must_use]
    pub fn tools() -> Vec<Tool> {
        registry()
            .iter()
            .map(|spec| {
                Tool::new(spec.name.as_str(), spec.description, Arc::new(spec.input_schema.clone()))
            })
            .collect()
    }

    /// Run one tool call and wrap the outcome for the protocol.
    pub async fn handle_call(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        to_call_result(self.dispatcher.dispatch(name, arguments).await)
    }
}

fn to_call_result(result: ToolResult) -> CallToolResult {
    let content = result.content.into_iter().map(Content::text).collect();
    if result.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

impl rmcp::ServerHandler for BridgeServer {
    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult { next_cursor: None, tools: Self::tools() })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.handle_call(&request.name, request.arguments).await)
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "tasknote-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::AppleNotes;
    use crate::testing::{FakeThingsStore, InMemoryNotesRunner, RecordingUrlOpener};
    use crate::things::{ListView, Todo};
    use rmcp::ServerHandler;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn server(store: FakeThingsStore) -> BridgeServer {
        let notes = AppleNotes::new(
            Arc::new(InMemoryNotesRunner::with_titles(&["Groceries"])),
            "iCloud".to_string(),
            Duration::from_secs(1),
        );
        BridgeServer::new(Dispatcher::new(
            Arc::new(store),
            Arc::new(notes),
            Arc::new(RecordingUrlOpener::new()),
        ))
    }

    fn as_json(result: &CallToolResult) -> Value {
        serde_json::to_value(result).unwrap()
    }

    #[test]
    fn test_tools_mirror_registry() {
        let tools = BridgeServer::tools();
        assert_eq!(tools.len(), 27);
        assert_eq!(tools[0].name, "get-inbox");
        assert_eq!(tools[26].name, "notes-delete");
        assert_eq!(tools[15].input_schema["required"], json!(["title"]));
    }

    #[test]
    fn test_server_info() {
        let info = server(FakeThingsStore::default()).get_info();
        assert_eq!(info.server_info.name, "tasknote-mcp");
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("things:///"));
    }

    #[tokio::test]
    async fn test_call_success_is_not_flagged() {
        let todo = Todo { uuid: "t1".into(), title: "Buy milk".into(), ..Todo::default() };
        let server = server(FakeThingsStore::default().with_view(ListView::Inbox, vec![todo]));

        let value = as_json(&server.handle_call("get-inbox", None).await);

        assert_ne!(value["isError"], Value::Bool(true));
        assert!(value["content"][0]["text"].as_str().unwrap().contains("Title: Buy milk"));
    }

    #[tokio::test]
    async fn test_call_failure_is_flagged() {
        let server = server(FakeThingsStore::default());

        let value = as_json(&server.handle_call("get-everything", None).await);

        assert_eq!(value["isError"], Value::Bool(true));
        assert_eq!(value["content"][0]["text"], "Error: Unknown tool: get-everything");
    }

    #[tokio::test]
    async fn test_call_forwards_arguments() {
        let server = server(FakeThingsStore::default());
        let args = json!({"query": "Groc"}).as_object().cloned();

        let value = as_json(&server.handle_call("notes-search", args).await);

        assert_eq!(value["content"][0]["text"], "Found 1 notes:\n• Groceries");
    }
}
