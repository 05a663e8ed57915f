//! Input shapes and the JSON Schema advertised to the model.
//!
//! A tool declares its accepted arguments as an [`InputShape`]: an ordered
//! list of [`FieldSpec`]s. [`InputShape::to_schema`] turns that into the
//! object schema the provider expects in its tool list.

use serde_json::{Map, Value, json};
use std::collections::HashSet;
use thiserror::Error;

/// A shape that cannot be advertised to the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("field `{field}` has unsupported type {kind}")]
    Unsupported { field: String, kind: &'static str },

    #[error("field name must not be empty")]
    EmptyFieldName,

    #[error("field `{field}` is declared more than once")]
    DuplicateField { field: String },
}

/// The kind of value a field accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    /// A list of values of a primitive kind.
    Array(Box<FieldKind>),
    /// Nested objects are not representable in a flat tool schema.
    Object(Vec<FieldSpec>),
}

impl FieldKind {
    fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    fn is_primitive(&self) -> bool {
        !matches!(self, Self::Array(_) | Self::Object(_))
    }
}

/// One named argument of a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub optional: bool,
    pub default: Option<Value>,
    pub description: String,
}

impl FieldSpec {
    /// A field the model must always supply.
    pub fn required(name: impl Into<String>, kind: FieldKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
            default: None,
            description: description.into(),
        }
    }

    /// A field the model may omit.
    pub fn optional(name: impl Into<String>, kind: FieldKind, description: impl Into<String>) -> Self {
        Self {
            optional: true,
            ..Self::required(name, kind, description)
        }
    }

    /// Attach a default value. Fields with a default are never required.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    fn is_required(&self) -> bool {
        !self.optional && self.default.is_none()
    }

    fn property(&self) -> Result<Value, SchemaError> {
        let mut property = Map::new();
        property.insert("type".into(), json!(self.kind.type_name()));

        match &self.kind {
            FieldKind::Array(items) if items.is_primitive() => {
                property.insert("items".into(), json!({ "type": items.type_name() }));
            }
            FieldKind::Array(items) => {
                return Err(SchemaError::Unsupported {
                    field: self.name.clone(),
                    kind: if matches!(**items, FieldKind::Object(_)) {
                        "array of object"
                    } else {
                        "nested array"
                    },
                });
            }
            FieldKind::Object(_) => {
                return Err(SchemaError::Unsupported {
                    field: self.name.clone(),
                    kind: "object",
                });
            }
            _ => {}
        }

        if !self.description.is_empty() {
            property.insert("description".into(), json!(self.description));
        }
        if let Some(default) = &self.default {
            property.insert("default".into(), default.clone());
        }
        Ok(Value::Object(property))
    }
}

/// The declared arguments of a tool, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputShape {
    pub fields: Vec<FieldSpec>,
}

impl InputShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the shape.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Generate the object schema for this shape.
    ///
    /// Deterministic: the same shape always yields the same value.
    pub fn to_schema(&self) -> Result<Value, SchemaError> {
        let mut seen = HashSet::new();
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyFieldName);
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    field: field.name.clone(),
                });
            }
            properties.insert(field.name.clone(), field.property()?);
            if field.is_required() {
                required.push(Value::String(field.name.clone()));
            }
        }

        Ok(json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        }))
    }
}
