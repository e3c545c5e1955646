//! Composable render values.

use crate::component::{Component, Props};
use crate::context::RenderContext;
use crate::error::RenderError;
use std::io;
use std::sync::Arc;

/// Anything that can write itself given a render context.
///
/// Children, slots, and component-valued properties are all passed around
/// as `Arc<dyn Renderable>`.
pub trait Renderable: Send + Sync {
    /// Writes output for this value.
    fn render(&self, ctx: &RenderContext, w: &mut dyn io::Write) -> Result<(), RenderError>;
}

impl<F> Renderable for F
where
    F: Fn(&RenderContext, &mut dyn io::Write) -> Result<(), RenderError> + Send + Sync,
{
    fn render(&self, ctx: &RenderContext, w: &mut dyn io::Write) -> Result<(), RenderError> {
        (self)(ctx, w)
    }
}

/// Pre-rendered output written verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawHtml(pub String);

impl Renderable for RawHtml {
    fn render(&self, _ctx: &RenderContext, w: &mut dyn io::Write) -> Result<(), RenderError> {
        w.write_all(self.0.as_bytes())?;
        Ok(())
    }
}

/// Renders each part in order with the same context.
#[derive(Clone, Default)]
pub struct Join(pub Vec<Arc<dyn Renderable>>);

impl Renderable for Join {
    fn render(&self, ctx: &RenderContext, w: &mut dyn io::Write) -> Result<(), RenderError> {
        for part in &self.0 {
            part.render(ctx, w)?;
        }
        Ok(())
    }
}

/// A registered unit paired with its bound properties.
pub struct Bound {
    unit: Arc<dyn Component>,
    props: Props,
}

impl Bound {
    /// Pairs `unit` with `props`.
    pub fn new(unit: Arc<dyn Component>, props: Props) -> Self {
        Self { unit, props }
    }

    /// The bound properties.
    pub fn props(&self) -> &Props {
        &self.props
    }
}

impl Renderable for Bound {
    fn render(&self, ctx: &RenderContext, w: &mut dyn io::Write) -> Result<(), RenderError> {
        self.unit.render(&self.props, ctx, w)
    }
}

/// Renders `value` into a string.
pub fn render_to_string(value: &dyn Renderable, ctx: &RenderContext) -> Result<String, RenderError> {
    let mut buf = Vec::new();
    value.render(ctx, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_renders_parts_in_order() {
        let shout = |_: &RenderContext, w: &mut dyn io::Write| -> Result<(), RenderError> {
            w.write_all(b"!")?;
            Ok(())
        };
        let parts: Vec<Arc<dyn Renderable>> = vec![
            Arc::new(RawHtml("<b>a</b>".into())),
            Arc::new(shout),
            Arc::new(RawHtml("b".into())),
        ];
        let joined = Join(parts);
        let out = render_to_string(&joined, &RenderContext::new()).unwrap();
        assert_eq!(out, "<b>a</b>!b");
    }

    #[test]
    fn test_empty_join_renders_nothing() {
        let out = render_to_string(&Join::default(), &RenderContext::new()).unwrap();
        assert!(out.is_empty());
    }
}
