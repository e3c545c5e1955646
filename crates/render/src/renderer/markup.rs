//! Component resolution and composition for parsed markup.

use super::Renderer;
use crate::binder::{self, NodeResolver};
use crate::component::Component;
use crate::context::RenderContext;
use crate::error::{LookupError, RenderError};
use crate::registry::Layout;
use crate::renderable::{Join, Renderable};
use slotdown_core::{ComponentNode, Node};
use std::io;
use std::sync::Arc;

/// Reserved component name that renders the context's slot content.
pub const SLOT: &str = "Slot";

impl Renderer {
    pub(super) fn render_node(
        &self,
        node: &Node,
        namespace: &Arc<Layout>,
        ctx: &RenderContext,
        w: &mut dyn io::Write,
    ) -> Result<(), RenderError> {
        match node {
            Node::Text(text) => self.render_source(&text.value, ctx, w),
            Node::Component(component) => self.instantiate(component, namespace)?.render(ctx, w),
        }
    }

    /// Resolves, binds, and composes `node` into a renderable.
    ///
    /// `namespace` is the namespace inherited from the enclosing component.
    /// Nothing is written until the result is rendered.
    pub fn instantiate(
        &self,
        node: &ComponentNode,
        namespace: &Arc<Layout>,
    ) -> Result<Arc<dyn Renderable>, RenderError> {
        if node.name == SLOT {
            return Ok(Arc::new(|ctx: &RenderContext, w: &mut dyn io::Write| {
                ctx.render_slot(w)
            }));
        }

        let (unit, own) = self.resolve(&node.name, namespace)?;
        log::debug!("resolved component {} from {}", node.name, namespace.name());

        let scope = Scope::new(self, Arc::clone(&own));
        let bound = binder::build(&unit, &node.properties, &scope)
            .map_err(|e| RenderError::component(&node.name, e))?;
        let children = self.compose_children(&node.children, &own);
        let name = node.name.clone();

        Ok(Arc::new(move |ctx: &RenderContext, w: &mut dyn io::Write| {
            bound
                .render(&ctx.with_children(Arc::clone(&children)), w)
                .map_err(|e| RenderError::component(&name, e))
        }))
    }

    /// Finds `name` in the inherited namespace, then in the top-level layout.
    ///
    /// Returns the unit together with its own child namespace.
    fn resolve(
        &self,
        name: &str,
        namespace: &Arc<Layout>,
    ) -> Result<(Arc<dyn Component>, Arc<Layout>), LookupError> {
        if let Some(found) = namespace.lookup(name) {
            return Ok(found);
        }
        if Arc::ptr_eq(namespace, &self.layout) {
            return Err(LookupError::ComponentNotFound {
                name: name.to_string(),
            });
        }
        self.layout
            .lookup(name)
            .ok_or_else(|| LookupError::ComponentNotInNamespace {
                name: name.to_string(),
                namespace: namespace.name().to_string(),
            })
    }

    /// Joins `children` into one renderable that renders each lazily.
    fn compose_children(&self, children: &[Node], namespace: &Arc<Layout>) -> Arc<dyn Renderable> {
        let parts = children
            .iter()
            .map(|child| {
                let renderer = self.clone();
                let child = child.clone();
                let namespace = Arc::clone(namespace);
                Arc::new(move |ctx: &RenderContext, w: &mut dyn io::Write| {
                    renderer.render_node(&child, &namespace, ctx, w)
                }) as Arc<dyn Renderable>
            })
            .collect();
        Arc::new(Join(parts))
    }
}

/// Resolves property values inside one component's namespace.
pub(super) struct Scope<'r> {
    renderer: &'r Renderer,
    namespace: Arc<Layout>,
}

impl<'r> Scope<'r> {
    pub(super) fn new(renderer: &'r Renderer, namespace: Arc<Layout>) -> Self {
        Self {
            renderer,
            namespace,
        }
    }
}

impl NodeResolver for Scope<'_> {
    fn resolve_component(&self, node: &ComponentNode) -> Result<Arc<dyn Renderable>, RenderError> {
        self.renderer.instantiate(node, &self.namespace)
    }

    fn markdown(&self, source: &str) -> Arc<dyn Renderable> {
        let renderer = self.renderer.clone();
        let source = source.to_string();
        Arc::new(move |ctx: &RenderContext, w: &mut dyn io::Write| {
            renderer.render_source(&source, ctx, w)
        })
    }
}
