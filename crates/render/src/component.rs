//! Renderable unit contract: property schemas, bound props, and components.

use crate::context::RenderContext;
use crate::error::{RegistryError, RenderError};
use crate::renderable::Renderable;
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::Arc;

/// Kind of a declared property field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropKind {
    /// Text.
    String,
    /// Set by a `!Name` flag.
    Bool,
    /// Signed integer parsed from text.
    Int,
    /// Floating point number parsed from text.
    Float,
    /// A renderable value: markdown text or a nested component.
    Component,
    /// Open bag receiving every property no other field claims.
    Attributes,
}

impl PropKind {
    /// Name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropKind::String => "string",
            PropKind::Bool => "boolean",
            PropKind::Int => "integer",
            PropKind::Float => "float",
            PropKind::Component => "component",
            PropKind::Attributes => "attributes",
        }
    }
}

/// One declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropField {
    /// Field name; matched case-insensitively.
    pub name: String,
    /// Field kind.
    pub kind: PropKind,
}

/// Declared property shape of a unit.
///
/// Built once when the unit is constructed:
///
/// ```
/// use slotdown_render::PropSchema;
///
/// let schema = PropSchema::new()
///     .string("Title")
///     .bool("Visible")
///     .component("Icon");
/// assert_eq!(schema.fields().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropSchema {
    fields: Vec<PropField>,
}

impl PropSchema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    pub fn field(mut self, name: impl Into<String>, kind: PropKind) -> Self {
        self.fields.push(PropField {
            name: name.into(),
            kind,
        });
        self
    }

    /// Adds a string field.
    pub fn string(self, name: impl Into<String>) -> Self {
        self.field(name, PropKind::String)
    }

    /// Adds a boolean field.
    pub fn bool(self, name: impl Into<String>) -> Self {
        self.field(name, PropKind::Bool)
    }

    /// Adds an integer field.
    pub fn int(self, name: impl Into<String>) -> Self {
        self.field(name, PropKind::Int)
    }

    /// Adds a float field.
    pub fn float(self, name: impl Into<String>) -> Self {
        self.field(name, PropKind::Float)
    }

    /// Adds a component field.
    pub fn component(self, name: impl Into<String>) -> Self {
        self.field(name, PropKind::Component)
    }

    /// Adds the attribute bag field.
    pub fn attributes(self, name: impl Into<String>) -> Self {
        self.field(name, PropKind::Attributes)
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[PropField] {
        &self.fields
    }

    /// The attribute bag field, if declared.
    pub fn attributes_field(&self) -> Option<&PropField> {
        self.fields.iter().find(|f| f.kind == PropKind::Attributes)
    }

    /// Checks the schema for registration under `component`.
    pub fn validate(&self, component: &str) -> Result<(), RegistryError> {
        let mut seen = HashSet::new();
        let mut bags = 0;
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(RegistryError::EmptyFieldName {
                    component: component.to_string(),
                });
            }
            if !seen.insert(field.name.to_lowercase()) {
                return Err(RegistryError::DuplicateField {
                    component: component.to_string(),
                    field: field.name.clone(),
                });
            }
            if field.kind == PropKind::Attributes {
                bags += 1;
            }
        }
        if bags > 1 {
            return Err(RegistryError::MultipleAttributeBags {
                component: component.to_string(),
            });
        }
        Ok(())
    }
}

/// A bound property value.
#[derive(Clone)]
pub enum PropValue {
    /// Text.
    String(String),
    /// Flag.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// Renderable value.
    Component(Arc<dyn Renderable>),
    /// Unclaimed properties in source order.
    Attributes(Vec<(String, String)>),
}

impl std::fmt::Debug for PropValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropValue::String(v) => f.debug_tuple("String").field(v).finish(),
            PropValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            PropValue::Int(v) => f.debug_tuple("Int").field(v).finish(),
            PropValue::Float(v) => f.debug_tuple("Float").field(v).finish(),
            PropValue::Component(_) => f.write_str("Component(..)"),
            PropValue::Attributes(v) => f.debug_tuple("Attributes").field(v).finish(),
        }
    }
}

/// Bound properties keyed by lowercased field name.
///
/// Fields with no matching property are absent; accessors return `None`.
#[derive(Debug, Clone, Default)]
pub struct Props {
    values: HashMap<String, PropValue>,
}

impl Props {
    /// Empty props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of a field.
    pub fn insert(&mut self, name: &str, value: PropValue) {
        self.values.insert(name.to_lowercase(), value);
    }

    /// Raw value of a field.
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.values.get(&name.to_lowercase())
    }

    /// String field value.
    pub fn string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean field value.
    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer field value.
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            PropValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float field value.
    pub fn float(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            PropValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Component field value.
    pub fn component(&self, name: &str) -> Option<&Arc<dyn Renderable>> {
        match self.get(name)? {
            PropValue::Component(c) => Some(c),
            _ => None,
        }
    }

    /// Attribute bag contents.
    pub fn attributes(&self, name: &str) -> Option<&[(String, String)]> {
        match self.get(name)? {
            PropValue::Attributes(a) => Some(a),
            _ => None,
        }
    }

    /// Number of bound fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no field is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A registered renderable unit.
pub trait Component: Send + Sync {
    /// Declared property shape.
    fn schema(&self) -> &PropSchema;

    /// Writes the unit's output.
    ///
    /// `ctx.children()` holds the composed children and `ctx.slot()` any slot
    /// content handed down by an enclosing page render.
    fn render(
        &self,
        props: &Props,
        ctx: &RenderContext,
        w: &mut dyn io::Write,
    ) -> Result<(), RenderError>;
}

/// A unit backed by a closure.
pub struct FnComponent<F> {
    schema: PropSchema,
    render: F,
}

impl<F> FnComponent<F>
where
    F: Fn(&Props, &RenderContext, &mut dyn io::Write) -> Result<(), RenderError> + Send + Sync,
{
    /// Creates a unit from a schema and a render closure.
    pub fn new(schema: PropSchema, render: F) -> Self {
        Self { schema, render }
    }
}

impl<F> Component for FnComponent<F>
where
    F: Fn(&Props, &RenderContext, &mut dyn io::Write) -> Result<(), RenderError> + Send + Sync,
{
    fn schema(&self) -> &PropSchema {
        &self.schema
    }

    fn render(
        &self,
        props: &Props,
        ctx: &RenderContext,
        w: &mut dyn io::Write,
    ) -> Result<(), RenderError> {
        (self.render)(props, ctx, w)
    }
}

/// Shorthand for `Arc::new(FnComponent::new(schema, render))`.
pub fn unit<F>(schema: PropSchema, render: F) -> Arc<dyn Component>
where
    F: Fn(&Props, &RenderContext, &mut dyn io::Write) -> Result<(), RenderError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnComponent::new(schema, render))
}
