//! The human at the terminal, as seen by the runtime.

use async_trait::async_trait;
use serde_json::Value;

/// Input and output channel to the operator.
///
/// The session reads user turns and prints assistant text through it, and
/// tool handlers use it (via [`ExecutionContext`](crate::ExecutionContext))
/// to ask for confirmation.
#[async_trait]
pub trait Operator: Send + Sync {
    /// Read one line of input. `None` means input is closed.
    async fn read_line(&self) -> Option<String>;

    /// Show a prompt that precedes a [`read_line`](Self::read_line).
    fn prompt(&self, text: &str);

    /// Show assistant text.
    fn show_assistant(&self, text: &str);

    /// Announce a tool call about to run.
    fn show_tool_call(&self, name: &str, input: &Value);

    /// Show a fatal error.
    fn show_error(&self, text: &str);
}
