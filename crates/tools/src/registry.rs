//! Tool registry
//!
//! One registry per session, built from explicit configuration rather than
//! any process-global state, so concurrent sessions cannot interfere with
//! each other's tool bindings.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::mcp::{Tool, ToolOutput};

/// Per-session tool registry
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Registered tool names.
    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate and execute a tool call, containing every failure.
    ///
    /// Unknown tools, schema violations, and execution errors all come back
    /// as error-marked output text for the model runtime; nothing escapes
    /// to take the session down.
    pub async fn dispatch(&self, name: &str, input: Value) -> ToolOutput {
        let Some(tool) = self.get(name) else {
            tracing::warn!(tool = name, "Unknown tool invoked");
            return ToolOutput::error(format!("Unknown tool: {}", name));
        };

        if let Err(err) = tool.validate(&input) {
            tracing::warn!(tool = name, error = %err, "Tool input rejected");
            return ToolOutput::error(format!("Could not run {}: {}", name, err.message));
        }

        match tool.execute(input).await {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!(tool = name, error = %err, "Tool execution failed");
                ToolOutput::error(format!("Tool {} failed: {}", name, err.message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::{InputSchema, PropertySchema, ToolError, ToolSchema};
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the message back"
        }

        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.name().to_string(),
                description: self.description().to_string(),
                input_schema: InputSchema::object().property(
                    "message",
                    PropertySchema::string("Message"),
                    true,
                ),
            }
        }

        async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
            let message = input.get("message").and_then(|v| v.as_str()).unwrap_or("");
            Ok(ToolOutput::text(message.to_string()))
        }
    }

    #[tokio::test]
    async fn test_dispatch_success() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let output = registry.dispatch("echo", json!({"message": "hi"})).await;
        assert!(!output.is_error);
        assert_eq!(output.text, "hi");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_is_contained() {
        let registry = ToolRegistry::new();
        let output = registry.dispatch("nope", json!({})).await;
        assert!(output.is_error);
        assert!(output.text.contains("Unknown tool"));
    }

    #[tokio::test]
    async fn test_dispatch_validation_failure_is_contained() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let output = registry.dispatch("echo", json!({})).await;
        assert!(output.is_error);
        assert!(output.text.contains("Missing required field"));
    }
}
