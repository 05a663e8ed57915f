//! Tool traits.

use super::{DispatchError, ExecutionContext, InputShape, ToolError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A capability the model can call.
///
/// `Input` is the decoded argument type; the dispatcher decodes and validates
/// it before `execute` ever runs.
#[async_trait]
pub trait Tool: Send + Sync + 'static {
    type Input: DeserializeOwned + Send + 'static;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// The declared arguments, used to generate the advertised schema.
    fn shape(&self) -> InputShape;

    /// Domain checks on decoded arguments.
    fn validate(&self, _input: &Self::Input) -> Result<(), String> {
        Ok(())
    }

    async fn execute(
        &self,
        ctx: &ExecutionContext<'_>,
        input: Self::Input,
    ) -> Result<String, ToolError>;
}

/// Type-erased entry point stored in the registry.
///
/// Implement this directly to plug in a tool that works on raw JSON; typed
/// tools get it through [`ToolAdapter`].
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, ctx: &ExecutionContext<'_>, input: Value) -> Result<String, DispatchError>;
}

/// Adapts a typed [`Tool`] to a [`Handler`].
pub struct ToolAdapter<T>(pub T);

#[async_trait]
impl<T: Tool> Handler for ToolAdapter<T> {
    async fn call(&self, ctx: &ExecutionContext<'_>, input: Value) -> Result<String, DispatchError> {
        let tool = &self.0;
        let input: T::Input =
            serde_json::from_value(input).map_err(|e| DispatchError::InvalidArguments {
                tool: tool.name().to_string(),
                message: e.to_string(),
            })?;

        tool.validate(&input)
            .map_err(|message| DispatchError::ValidationFailed {
                tool: tool.name().to_string(),
                message,
            })?;

        Ok(tool.execute(ctx, input).await?)
    }
}
