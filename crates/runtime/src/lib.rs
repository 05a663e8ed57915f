//! Billdozer runtime: tool registry, dispatch and the conversation engine.
//!
//! # Overview
//!
//! - **Registry**: a concurrent catalog of tools, each with a generated JSON
//!   Schema describing its arguments.
//! - **Dispatcher**: resolves a model-issued tool call, decodes and validates
//!   its arguments, runs the handler and turns the outcome into a result.
//! - **Session**: the turn loop between the operator, the model and the tools.
//! - **Backend**: a trait abstracting LLM providers (Anthropic, etc.).
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use runtime::{AnthropicAuth, AnthropicBackend, Registry, Session};
//!
//! # async fn example(operator: Arc<dyn runtime::Operator>) -> runtime::Result<()> {
//! let auth = AnthropicAuth::ApiKey("sk-ant-api01-...".into());
//! let backend = AnthropicBackend::builder(auth, "claude-sonnet-4-20250514").build();
//! let registry = Arc::new(Registry::new());
//!
//! let mut session = Session::new(backend, registry, operator);
//! session.run().await?;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod model;
mod operator;
pub mod providers;
mod session;
pub mod tools;

pub use error::{Error, Result};

pub use model::{
    Backend, FinishReason, Message, ModelError, ModelRequest, ModelResponse, Part, Role, ToolCall,
    ToolResult, ToolSpec, Usage,
};

pub use providers::{AnthropicAuth, AnthropicBackend, AnthropicBackendBuilder};

pub use operator::Operator;

pub use session::{Session, State, USER_PROMPT};

pub use tools::{
    DispatchError, Dispatcher, ExecutionContext, FieldKind, FieldSpec, Handler, InputShape,
    Registry, RegistryError, SchemaError, Tool, ToolAdapter, ToolDefinition, ToolError,
};
