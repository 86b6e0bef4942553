//! Attribute schemas supplied by the embedding application.
//!
//! The engine never owns a registry. It borrows one for the duration of a
//! parse and asks it for the schema of each resource `type` it decodes.
//!
//! ```rust
//! use serde_jsonapi::{AttributeRule, AttributeSchema, AttributeType, Engine, SchemaRegistry};
//!
//! let registry = SchemaRegistry::new().with(
//!     "articles",
//!     AttributeSchema::new()
//!         .field("title", AttributeRule::new(AttributeType::String).required())
//!         .field("pages", AttributeRule::new(AttributeType::Integer).nullable()),
//! );
//!
//! let engine = Engine::new().with_registry(&registry);
//! let ok = engine.parse_str(r#"{"data":{"type":"articles","id":"1","attributes":{"title":"A","pages":null}}}"#);
//! assert!(ok.is_ok());
//!
//! let bad = engine.parse_str(r#"{"data":{"type":"articles","id":"1","attributes":{"pages":"ten"}}}"#);
//! assert_eq!(bad.unwrap_err().validation_errors().map(|v| v.len()), Some(2));
//! ```

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{ErrorKind, Violation};
use crate::map::Attributes;
use crate::pointer::Pointer;

/// Looks up the attribute schema of a resource type.
///
/// Implementations are read concurrently by every in-flight parse and must
/// not change while a parse is running if callers want consistent results.
pub trait TypeRegistry: Send + Sync {
    /// The schema for `kind`, or `None` if the type is unknown.
    fn resolve_attribute_schema(&self, kind: &str) -> Option<&AttributeSchema>;
}

/// JSON type an attribute value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeType {
    #[default]
    Any,
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl AttributeType {
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            AttributeType::Any => true,
            AttributeType::String => value.is_string(),
            AttributeType::Number => value.is_number(),
            AttributeType::Integer => value.is_i64() || value.is_u64(),
            AttributeType::Boolean => value.is_boolean(),
            AttributeType::Array => value.is_array(),
            AttributeType::Object => value.is_object(),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttributeType::Any => "any",
            AttributeType::String => "string",
            AttributeType::Number => "number",
            AttributeType::Integer => "integer",
            AttributeType::Boolean => "boolean",
            AttributeType::Array => "array",
            AttributeType::Object => "object",
        })
    }
}

/// Constraints on one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeRule {
    pub ty: AttributeType,
    pub required: bool,
    pub nullable: bool,
}

impl AttributeRule {
    #[must_use]
    pub const fn new(ty: AttributeType) -> Self {
        AttributeRule {
            ty,
            required: false,
            nullable: false,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Attribute rules of one resource type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeSchema {
    rules: IndexMap<String, AttributeRule>,
    deny_unknown: bool,
}

impl AttributeSchema {
    #[must_use]
    pub fn new() -> Self {
        AttributeSchema::default()
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, rule: AttributeRule) -> Self {
        self.rules.insert(name.into(), rule);
        self
    }

    /// Rejects attributes the schema does not declare.
    #[must_use]
    pub fn deny_unknown(mut self) -> Self {
        self.deny_unknown = true;
        self
    }

    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&AttributeRule> {
        self.rules.get(name)
    }

    /// Checks `attributes` of the resource located at `resource`.
    #[must_use]
    pub fn check(&self, attributes: Option<&Attributes>, resource: &Pointer) -> Vec<Violation> {
        let base = resource.push("attributes");
        let mut violations = Vec::new();

        for (name, rule) in &self.rules {
            match attributes.and_then(|a| a.get(name)) {
                None if rule.required => violations.push(Violation::new(
                    ErrorKind::InvalidAttribute,
                    base.as_str(),
                    format!("required attribute `{name}` is missing"),
                )),
                None => {}
                Some(Value::Null) if rule.nullable => {}
                Some(value) if !rule.ty.matches(value) || value.is_null() => {
                    violations.push(Violation::new(
                        ErrorKind::InvalidAttribute,
                        base.push(name).as_str(),
                        format!("attribute `{name}` must be {}", describe(rule)),
                    ));
                }
                Some(_) => {}
            }
        }

        if self.deny_unknown {
            for name in attributes.into_iter().flat_map(|a| a.keys()) {
                if !self.rules.contains_key(name) && !name.starts_with('@') {
                    violations.push(Violation::new(
                        ErrorKind::InvalidAttribute,
                        base.push(name).as_str(),
                        format!("attribute `{name}` is not declared"),
                    ));
                }
            }
        }
        violations
    }
}

fn describe(rule: &AttributeRule) -> String {
    let expected = match rule.ty {
        AttributeType::Any => return "non-null".to_string(),
        AttributeType::Array | AttributeType::Integer | AttributeType::Object => {
            format!("an {}", rule.ty)
        }
        _ => format!("a {}", rule.ty),
    };
    if rule.nullable {
        format!("{expected} or null")
    } else {
        expected
    }
}

/// An in-memory [`TypeRegistry`].
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, AttributeSchema>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        SchemaRegistry::default()
    }

    /// Registers `schema` for `kind`, returning the schema it replaces.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        schema: AttributeSchema,
    ) -> Option<AttributeSchema> {
        self.schemas.insert(kind.into(), schema)
    }

    #[must_use]
    pub fn with(mut self, kind: impl Into<String>, schema: AttributeSchema) -> Self {
        self.register(kind, schema);
        self
    }
}

impl TypeRegistry for SchemaRegistry {
    fn resolve_attribute_schema(&self, kind: &str) -> Option<&AttributeSchema> {
        self.schemas.get(kind)
    }
}
