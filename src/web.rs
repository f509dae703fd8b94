//! HTTP surface for browser clients.
//!
//! Serves the companion page and forwards `POST /api/mcp` calls to the
//! same dispatcher the MCP server uses.

use crate::config::BridgeConfig;
use crate::error::{Error, Result};
use crate::logging;
use crate::tools::Dispatcher;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

struct WebState {
    dispatcher: Dispatcher,
    static_dir: PathBuf,
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the router over a dispatcher and the directory holding `index.html`.
pub fn router(dispatcher: Dispatcher, static_dir: PathBuf) -> Router {
    let state = Arc::new(WebState { dispatcher, static_dir });
    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .route("/status", get(status))
        .route("/api/mcp", post(call_tool))
        .layer(cors_layer())
        .with_state(state)
}

/// Serve the HTTP surface on `port` until the process is stopped.
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails.
pub async fn serve(config: &BridgeConfig, port: u16) -> Result<()> {
    let app = router(Dispatcher::from_config(config), config.static_dir.clone());
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    logging::log_event(&format!("HTTP server listening on http://127.0.0.1:{port}"));
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index(State(state): State<Arc<WebState>>) -> Response {
    let path = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            logging::log_warning(&format!("Cannot read {}: {e}", path.display()));
            (StatusCode::NOT_FOUND, Error::FileNotFound(path).to_string()).into_response()
        }
    }
}

async fn status() -> Json<Value> {
    Json(json!({"status": "ok", "message": "MCP server is running"}))
}

async fn call_tool(State(state): State<Arc<WebState>>, body: Bytes) -> Response {
    let Ok(request) = serde_json::from_slice::<Value>(&body) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Invalid JSON"}))).into_response();
    };
    let Some(tool) = request.get("tool").and_then(Value::as_str).filter(|t| !t.is_empty()) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Missing tool name"})))
            .into_response();
    };
    let arguments = request.get("arguments").and_then(Value::as_object).cloned();

    let result = state.dispatcher.dispatch(tool, arguments).await;
    Json(json!({"success": true, "data": result.first_text(), "tool": tool})).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::AppleNotes;
    use crate::testing::{FakeThingsStore, InMemoryNotesRunner, RecordingUrlOpener};
    use axum::body::Body;
    use axum::http::Request;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(static_dir: PathBuf) -> Router {
        let notes = AppleNotes::new(
            Arc::new(InMemoryNotesRunner::with_titles(&["Groceries", "Recipes"])),
            "iCloud".to_string(),
            Duration::from_secs(1),
        );
        let dispatcher = Dispatcher::new(
            Arc::new(FakeThingsStore::default()),
            Arc::new(notes),
            Arc::new(RecordingUrlOpener::new()),
        );
        router(dispatcher, static_dir)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_mcp(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/mcp")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_status() {
        let request = Request::builder().uri("/status").body(Body::empty()).unwrap();
        let response = app(PathBuf::from("missing")).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"status": "ok", "message": "MCP server is running"})
        );
    }

    #[tokio::test]
    async fn test_index_served_from_static_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>bridge</h1>").unwrap();

        for uri in ["/", "/index.html"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app(dir.path().to_path_buf()).oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&bytes[..], b"<h1>bridge</h1>");
        }
    }

    #[tokio::test]
    async fn test_index_missing_is_404() {
        let dir = TempDir::new().unwrap();
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app(dir.path().to_path_buf()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_json_is_400() {
        let response = app(PathBuf::new()).oneshot(post_mcp("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Invalid JSON"}));
    }

    #[tokio::test]
    async fn test_missing_tool_is_400() {
        let response =
            app(PathBuf::new()).oneshot(post_mcp(r#"{"arguments": {}}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Missing tool name"}));
    }

    #[tokio::test]
    async fn test_tool_call_returns_first_text_block() {
        let response = app(PathBuf::new())
            .oneshot(post_mcp(r#"{"tool": "notes-search", "arguments": {"query": "Rec"}}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"success": true, "data": "Found 1 notes:\n• Recipes", "tool": "notes-search"})
        );
    }

    #[tokio::test]
    async fn test_tool_errors_still_return_200() {
        let response =
            app(PathBuf::new()).oneshot(post_mcp(r#"{"tool": "get-everything"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"], "Error: Unknown tool: get-everything");
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/mcp")
            .header(header::ORIGIN, "http://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app(PathBuf::new()).oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
