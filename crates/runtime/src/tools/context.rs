//! Per-call execution context.

use crate::Operator;

/// State handed to a tool handler for the duration of one call.
///
/// It borrows the session's operator, so a handler cannot keep it past the
/// call that received it.
#[derive(Clone, Copy)]
pub struct ExecutionContext<'a> {
    tool: &'a str,
    operator: &'a dyn Operator,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(tool: &'a str, operator: &'a dyn Operator) -> Self {
        Self { tool, operator }
    }

    /// Name of the tool being run.
    pub fn tool(&self) -> &str {
        self.tool
    }

    /// Ask the operator to confirm something.
    ///
    /// Returns the raw response line, or `None` when no input is available.
    pub async fn confirm(&self, prompt: &str) -> Option<String> {
        self.operator.prompt(prompt);
        let response = self.operator.read_line().await;
        tracing::debug!(tool = self.tool, answered = response.is_some(), "confirmation requested");
        response
    }
}

impl std::fmt::Debug for ExecutionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("tool", &self.tool)
            .finish_non_exhaustive()
    }
}
