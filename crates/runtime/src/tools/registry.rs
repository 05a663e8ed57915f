//! The tool catalog.

use super::{Handler, SchemaError, Tool, ToolAdapter};
use crate::model::ToolSpec;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

/// Errors from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tool name must not be empty")]
    EmptyName,

    /// Names are unique; a second registration under the same name is refused
    /// and the first definition stays in place.
    #[error("tool already registered: {name}")]
    Duplicate { name: String },

    #[error("tool not found: {name}")]
    NotFound { name: String },

    #[error("schema for tool {tool}: {source}")]
    Schema {
        tool: String,
        #[source]
        source: SchemaError,
    },
}

/// A registered tool.
#[derive(Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub handler: Arc<dyn Handler>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        handler: Arc<dyn Handler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            handler,
        }
    }

    /// Build a definition from a typed tool, generating its schema.
    pub fn from_tool<T: Tool>(tool: T) -> Result<Self, RegistryError> {
        let input_schema = tool.shape().to_schema().map_err(|source| RegistryError::Schema {
            tool: tool.name().to_string(),
            source,
        })?;
        Ok(Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema,
            handler: Arc::new(ToolAdapter(tool)),
        })
    }

    /// The form advertised to the model.
    pub fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

/// Catalog of tools, keyed by name.
///
/// Writers are serialized against each other and against readers; readers
/// share the lock. Listings are ordered by name, so they do not depend on the
/// order concurrent initializers happened to register in.
#[derive(Default)]
pub struct Registry {
    tools: RwLock<BTreeMap<String, ToolDefinition>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool.
    pub fn register(&self, definition: ToolDefinition) -> Result<(), RegistryError> {
        if definition.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);
        if tools.contains_key(&definition.name) {
            return Err(RegistryError::Duplicate {
                name: definition.name,
            });
        }
        tracing::debug!(tool = %definition.name, "registered tool");
        tools.insert(definition.name.clone(), definition);
        Ok(())
    }

    /// Generate the schema for a typed tool and add it.
    pub fn register_tool<T: Tool>(&self, tool: T) -> Result<(), RegistryError> {
        self.register(ToolDefinition::from_tool(tool)?)
    }

    /// Get a tool by name.
    pub fn lookup(&self, name: &str) -> Result<ToolDefinition, RegistryError> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.get(name).cloned().ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
        })
    }

    /// Snapshot of all definitions, ordered by name.
    pub fn list(&self) -> Vec<ToolDefinition> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.values().cloned().collect()
    }

    /// The tool list to advertise to the model.
    pub fn specs(&self) -> Vec<ToolSpec> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.values().map(ToolDefinition::spec).collect()
    }

    /// Names of all registered tools, ordered.
    pub fn names(&self) -> Vec<String> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tools.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("tools", &self.names()).finish()
    }
}
