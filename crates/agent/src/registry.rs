//! Tool registry.
//!
//! Tools register under their wire name and are dispatched by name with raw
//! JSON arguments. Uses [`RwLock`] so a transport can list and call tools
//! concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Result of a tool invocation.
///
/// Failures travel in-band: `is_error` marks the text as an error message
/// for the calling agent, and the transport never sees a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResponse {
    pub text: String,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResponse {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// A single agent-facing tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Wire name the tool is dispatched under.
    fn name(&self) -> &'static str;

    /// One-line description surfaced in tool listings.
    fn description(&self) -> &'static str;

    /// Invoke the tool. Argument validation failures come back as
    /// error-flagged responses.
    async fn call(&self, args: serde_json::Value) -> ToolResponse;
}

/// Name and description pair for tool discovery.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Registry of all agent tools, keyed by name.
pub struct ToolRegistry {
    tools: RwLock<HashMap<&'static str, Arc<dyn Tool>>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }

    /// Register a tool under its own name, replacing any previous
    /// registration.
    pub async fn register(&self, tool: Arc<dyn Tool>) {
        let name = tool.name();
        self.tools.write().await.insert(name, tool);
        info!(tool = name, "registered tool");
    }

    /// All registered tools, sorted by name.
    pub async fn list(&self) -> Vec<ToolInfo> {
        let tools = self.tools.read().await;
        let mut infos: Vec<ToolInfo> = tools
            .values()
            .map(|tool| ToolInfo {
                name: tool.name(),
                description: tool.description(),
            })
            .collect();
        infos.sort_by_key(|info| info.name);
        infos
    }

    /// Dispatch a call by tool name.
    ///
    /// An unknown name is an error response like any other tool failure.
    pub async fn dispatch(&self, name: &str, args: serde_json::Value) -> ToolResponse {
        let tool = { self.tools.read().await.get(name).cloned() };
        match tool {
            Some(tool) => {
                debug!(tool = name, "dispatching tool call");
                tool.call(args).await
            }
            None => ToolResponse::error(format!("Unknown tool: {name}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echo the arguments back"
        }

        async fn call(&self, args: serde_json::Value) -> ToolResponse {
            ToolResponse::ok(args.to_string())
        }
    }

    #[tokio::test]
    async fn test_register_list_dispatch() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool)).await;

        let infos = registry.list().await;
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].name, "echo");

        let response = registry.dispatch("echo", serde_json::json!({"a": 1})).await;
        assert!(!response.is_error);
        assert_eq!(response.text, r#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_response() {
        let registry = ToolRegistry::new();
        let response = registry.dispatch("nope", serde_json::Value::Null).await;
        assert!(response.is_error);
        assert!(response.text.contains("nope"));
    }
}
