use std::time::Duration;
use thiserror::Error;

/// Errors a tool handler reports about its own work.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The operation did not finish in time and was terminated. `output` is
    /// whatever it printed before that.
    #[error("command {command:?} timed out after {}s and was terminated\n{output}", .after.as_secs_f64())]
    Timeout {
        command: String,
        after: Duration,
        output: String,
    },

    /// A subprocess ran to completion but exited unsuccessfully.
    #[error("command {command:?} failed ({status})\n{output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },

    #[error("{0}")]
    Failed(String),
}

impl ToolError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Why a single tool call did not produce a result.
///
/// These never end the conversation; the dispatcher turns them into error
/// results the model can read and react to.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown tool {name:?}; available tools: {}", .available.join(", "))]
    UnknownTool {
        name: String,
        available: Vec<String>,
    },

    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("{message}")]
    ValidationFailed { tool: String, message: String },

    #[error(transparent)]
    Handler(#[from] ToolError),
}

impl DispatchError {
    /// Short label for the failure class, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool { .. } => "unknown_tool",
            Self::InvalidArguments { .. } => "invalid_arguments",
            Self::ValidationFailed { .. } => "validation_failed",
            Self::Handler(_) => "handler_error",
        }
    }
}
