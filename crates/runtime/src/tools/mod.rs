//! Tool registration, schemas and dispatch.

mod context;
mod dispatch;
pub mod errors;
mod registry;
pub mod schema;
mod tool;

pub use context::ExecutionContext;
pub use dispatch::Dispatcher;
pub use errors::{DispatchError, ToolError};
pub use registry::{Registry, RegistryError, ToolDefinition};
pub use schema::{FieldKind, FieldSpec, InputShape, SchemaError};
pub use tool::{Handler, Tool, ToolAdapter};
