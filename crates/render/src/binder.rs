//! Binds parsed properties to a unit's declared schema.

use crate::component::{Component, PropField, PropKind, PropSchema, PropValue, Props};
use crate::error::{BindError, RenderError};
use crate::renderable::{Bound, Renderable};
use slotdown_core::{ComponentNode, Property, PropertyValue};
use std::sync::Arc;

/// Turns property values that are themselves content into renderables.
pub trait NodeResolver {
    /// Resolves and builds a component given as a property value.
    fn resolve_component(&self, node: &ComponentNode) -> Result<Arc<dyn Renderable>, RenderError>;

    /// Wraps markdown text so that it renders through the full pipeline.
    fn markdown(&self, source: &str) -> Arc<dyn Renderable>;
}

/// Binds `properties` to `unit`'s schema and pairs the result with the unit.
pub fn build(
    unit: &Arc<dyn Component>,
    properties: &[Property],
    resolver: &dyn NodeResolver,
) -> Result<Arc<dyn Renderable>, RenderError> {
    let props = bind(unit.schema(), properties, resolver)?;
    Ok(Arc::new(Bound::new(Arc::clone(unit), props)))
}

/// Binds `properties` to `schema`.
///
/// Field names match case-insensitively and the last matching property
/// wins. Properties claimed by no field go to the attribute bag when the
/// schema has one, otherwise binding fails naming every one of them.
pub fn bind(
    schema: &PropSchema,
    properties: &[Property],
    resolver: &dyn NodeResolver,
) -> Result<Props, RenderError> {
    let mut claimed = vec![false; properties.len()];
    let mut props = Props::new();

    for field in schema.fields() {
        if field.kind == PropKind::Attributes {
            continue;
        }
        let mut matched = None;
        for (i, property) in properties.iter().enumerate() {
            if property.name.eq_ignore_ascii_case(&field.name) {
                claimed[i] = true;
                matched = Some(property);
            }
        }
        if let Some(property) = matched {
            props.insert(&field.name, coerce(field, &property.value, resolver)?);
        }
    }

    if let Some(bag) = schema.attributes_field() {
        let mut attributes = Vec::new();
        for (property, claimed) in properties.iter().zip(claimed.iter_mut()) {
            if *claimed {
                continue;
            }
            *claimed = true;
            let value = match &property.value {
                PropertyValue::String(s) => s.clone(),
                PropertyValue::Flag => "true".to_string(),
                PropertyValue::Component(_) => {
                    return Err(BindError::UnsupportedValue {
                        name: property.name.clone(),
                        found: property.value.kind_name(),
                    }
                    .into());
                }
            };
            attributes.push((property.name.clone(), value));
        }
        props.insert(&bag.name, PropValue::Attributes(attributes));
    }

    let unknown: Vec<String> = properties
        .iter()
        .zip(&claimed)
        .filter(|(_, claimed)| !**claimed)
        .map(|(p, _)| p.name.clone())
        .collect();
    if !unknown.is_empty() {
        return Err(BindError::UnknownProperty { names: unknown }.into());
    }
    Ok(props)
}

fn coerce(
    field: &PropField,
    value: &PropertyValue,
    resolver: &dyn NodeResolver,
) -> Result<PropValue, RenderError> {
    let bound = match (field.kind, value) {
        (PropKind::String, PropertyValue::String(s)) => PropValue::String(s.clone()),
        (PropKind::Bool, PropertyValue::Flag) => PropValue::Bool(true),
        (PropKind::Int, PropertyValue::String(s)) => {
            PropValue::Int(s.trim().parse().map_err(|_| invalid_number(field, s))?)
        }
        (PropKind::Float, PropertyValue::String(s)) => {
            PropValue::Float(s.trim().parse().map_err(|_| invalid_number(field, s))?)
        }
        (PropKind::Component, PropertyValue::String(s)) => PropValue::Component(resolver.markdown(s)),
        (PropKind::Component, PropertyValue::Component(node)) => {
            PropValue::Component(resolver.resolve_component(node)?)
        }
        _ => {
            return Err(BindError::TypeMismatch {
                name: field.name.clone(),
                expected: field.kind.as_str(),
                found: value.kind_name(),
            }
            .into());
        }
    };
    Ok(bound)
}

fn invalid_number(field: &PropField, value: &str) -> BindError {
    BindError::InvalidNumber {
        name: field.name.clone(),
        expected: field.kind.as_str(),
        value: value.to_string(),
    }
}
