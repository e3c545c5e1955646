//! Component tree produced by the markup parser.

use crate::error::SourceLocation;
use crate::lexer::INDENT_WIDTH;
use serde::Serialize;

/// A parsed markup node: a component invocation or a line of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// `\Name` with its properties and children.
    Component(ComponentNode),
    /// Free-form text (markdown) line.
    Text(TextNode),
}

impl Node {
    /// Returns the component if this node is one.
    pub fn as_component(&self) -> Option<&ComponentNode> {
        match self {
            Node::Component(c) => Some(c),
            Node::Text(_) => None,
        }
    }

    /// Returns the text if this node is a text node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(t) => Some(&t.value),
            Node::Component(_) => None,
        }
    }
}

/// One component invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentNode {
    /// Component name as written (lookups are case-insensitive).
    pub name: String,
    /// Properties in source order.
    pub properties: Vec<Property>,
    /// Child nodes in source order.
    pub children: Vec<Node>,
    /// Location of the `\` marker.
    pub location: SourceLocation,
}

impl ComponentNode {
    /// Creates an empty component node.
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            children: Vec::new(),
            location,
        }
    }

    /// Returns the first property whose name matches case-insensitively.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| &p.value)
    }
}

/// A `Name: value` pair or a `!Name` flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    /// Property name as written.
    pub name: String,
    /// Parsed value.
    pub value: PropertyValue,
}

impl Property {
    /// Creates a property.
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Creates a string-valued property.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, PropertyValue::String(value.into()))
    }
}

/// Value of a property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum PropertyValue {
    /// Quoted, numeric, or multi-line text.
    String(String),
    /// `!Name`, the boolean `true`.
    Flag,
    /// A single nested component given as a block.
    Component(Box<ComponentNode>),
}

impl PropertyValue {
    /// Returns the string value, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested component, if any.
    pub fn as_component(&self) -> Option<&ComponentNode> {
        match self {
            PropertyValue::Component(c) => Some(c),
            _ => None,
        }
    }

    /// Short name of the value kind for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "string",
            PropertyValue::Flag => "boolean",
            PropertyValue::Component(_) => "component",
        }
    }
}

/// A text leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextNode {
    /// Text exactly as lexed.
    pub value: String,
}

impl TextNode {
    /// Creates a text node.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Root sequence of a parsed markup block.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Document {
    /// Top-level nodes in source order.
    pub nodes: Vec<Node>,
}

impl Document {
    /// Creates a document from its root nodes.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Returns true if the document has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serializes the tree back to canonical markup.
    ///
    /// Indentation is always four spaces. Single-line strings are quoted with
    /// `"` escaped, multi-line strings become indented blocks, and component
    /// values are nested one level below their property.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            write_node(&mut out, node, 0);
        }
        out
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_markup())
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth * INDENT_WIDTH {
        out.push(' ');
    }
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    match node {
        Node::Text(text) => {
            indent(out, depth);
            out.push_str(&text.value);
            out.push('\n');
        }
        Node::Component(component) => write_component(out, component, depth),
    }
}

fn write_component(out: &mut String, component: &ComponentNode, depth: usize) {
    indent(out, depth);
    out.push('\\');
    out.push_str(&component.name);
    out.push('\n');
    for property in &component.properties {
        write_property(out, property, depth + 1);
    }
    for child in &component.children {
        write_node(out, child, depth + 1);
    }
}

fn write_property(out: &mut String, property: &Property, depth: usize) {
    indent(out, depth);
    match &property.value {
        PropertyValue::Flag => {
            out.push('!');
            out.push_str(&property.name);
            out.push('\n');
        }
        PropertyValue::String(value) if !value.contains('\n') => {
            out.push_str(&property.name);
            out.push_str(": \"");
            out.push_str(&value.replace('"', "\\\""));
            out.push_str("\"\n");
        }
        PropertyValue::String(value) => {
            out.push_str(&property.name);
            out.push_str(":\n");
            for line in value.lines() {
                indent(out, depth + 1);
                out.push_str(line);
                out.push('\n');
            }
        }
        PropertyValue::Component(component) => {
            out.push_str(&property.name);
            out.push_str(":\n");
            write_component(out, component, depth + 1);
        }
    }
}
