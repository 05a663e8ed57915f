//! Routing model-issued tool calls to handlers.

use super::{DispatchError, ExecutionContext, Registry};
use crate::Operator;
use crate::model::{ToolCall, ToolResult};
use serde_json::Value;
use std::sync::Arc;

/// Validates and executes tool calls against a [`Registry`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Run one tool by name with raw JSON arguments.
    ///
    /// Resolution, decoding, validation and execution each fail with their own
    /// [`DispatchError`] variant. The handler runs at most once.
    pub async fn execute(
        &self,
        name: &str,
        input: Value,
        operator: &dyn Operator,
    ) -> Result<String, DispatchError> {
        let Ok(definition) = self.registry.lookup(name) else {
            return Err(DispatchError::UnknownTool {
                name: name.to_string(),
                available: self.registry.names(),
            });
        };

        let ctx = ExecutionContext::new(&definition.name, operator);
        definition.handler.call(&ctx, input).await
    }

    /// Run a tool call and fold the outcome into the result sent back to the
    /// model. Failures become error results; nothing here aborts the session.
    pub async fn dispatch(&self, call: &ToolCall, operator: &dyn Operator) -> ToolResult {
        match self.execute(&call.name, call.input.clone(), operator).await {
            Ok(output) => {
                tracing::debug!(tool = %call.name, call_id = %call.id, "tool call succeeded");
                ToolResult::success(&call.id, output)
            }
            Err(e) => {
                tracing::warn!(
                    tool = %call.name,
                    call_id = %call.id,
                    kind = e.kind(),
                    error = %e,
                    "tool call failed"
                );
                ToolResult::error(&call.id, e.to_string())
            }
        }
    }
}
