use slotdown_core::MarkupError;
use thiserror::Error;

/// Property binding failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    /// Properties that match no declared field and no attribute bag.
    #[error("unknown properties: {}", names.join(", "))]
    UnknownProperty {
        /// Property names in source order
        names: Vec<String>,
    },
    /// A value whose kind cannot fill the declared field.
    #[error("property {name} expects {expected} got {found}")]
    TypeMismatch {
        /// Declared field name
        name: String,
        /// Declared field kind
        expected: &'static str,
        /// Kind of the supplied value
        found: &'static str,
    },
    /// A string that does not parse as the declared numeric kind.
    #[error("property {name} expects {expected} got {value:?}")]
    InvalidNumber {
        /// Declared field name
        name: String,
        /// Declared field kind
        expected: &'static str,
        /// Supplied text
        value: String,
    },
    /// A value the attribute bag cannot hold.
    #[error("property {name} cannot pass a {found} through the attribute bag")]
    UnsupportedValue {
        /// Property name
        name: String,
        /// Kind of the supplied value
        found: &'static str,
    },
}

/// Name resolution failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    /// Component missing from the top-level layout.
    #[error("component {name} not found")]
    ComponentNotFound {
        /// Component name as written
        name: String,
    },
    /// Component missing from both the inherited namespace and the top-level layout.
    #[error("component {name} not found in namespace {namespace}")]
    ComponentNotInNamespace {
        /// Component name as written
        name: String,
        /// Inherited namespace name
        namespace: String,
    },
    /// No sub-namespace registered under the name.
    #[error("namespace {name} not found in layout {layout}")]
    NamespaceNotFound {
        /// Namespace name
        name: String,
        /// Layout searched
        layout: String,
    },
    /// No layout registered under the name.
    #[error("layout {name} not found")]
    LayoutNotFound {
        /// Layout name
        name: String,
    },
    /// `\Slot` rendered without slot content in the context.
    #[error("slot not found in render context")]
    SlotNotFound,
}

/// Registration contract violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// Blank component name.
    #[error("component name cannot be empty")]
    EmptyName,
    /// Blank field name in a schema.
    #[error("component {component} declares a field with an empty name")]
    EmptyFieldName {
        /// Component being registered
        component: String,
    },
    /// Two fields whose names match case-insensitively.
    #[error("component {component} declares field {field} more than once")]
    DuplicateField {
        /// Component being registered
        component: String,
        /// Repeated field name
        field: String,
    },
    /// More than one attribute bag field.
    #[error("component {component} declares more than one attribute bag")]
    MultipleAttributeBags {
        /// Component being registered
        component: String,
    },
}

/// Any failure while compiling a document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Markup or host markdown failed to parse.
    #[error(transparent)]
    Markup(#[from] MarkupError),
    /// Properties could not be bound.
    #[error(transparent)]
    Bind(#[from] BindError),
    /// A name did not resolve.
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// Registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Failure inside a named component.
    #[error("component {name}: {source}")]
    Component {
        /// Component name as written
        name: String,
        /// Underlying failure
        source: Box<RenderError>,
    },
    /// Failure raised by a unit's own render code.
    #[error("{0}")]
    Message(String),
    /// Output sink failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Wraps `source` with the name of the component it happened in.
    pub fn component(name: impl Into<String>, source: impl Into<RenderError>) -> Self {
        Self::Component {
            name: name.into(),
            source: Box::new(source.into()),
        }
    }

    /// Creates a free-form error for use inside unit implementations.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Follows component wrappers down to the failure that started it.
    pub fn root_cause(&self) -> &RenderError {
        match self {
            RenderError::Component { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
