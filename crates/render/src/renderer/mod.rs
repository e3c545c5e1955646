//! Tree-walking renderer over host markdown and embedded markup.
//!
//! # Module Structure
//!
//! - `walk` - pre-order mdast traversal with enter/exit callbacks
//! - `html` - fallback HTML output for unregistered markdown nodes
//! - `markup` - component resolution, binding, and child composition

mod html;
mod markup;
mod walk;

pub use html::{HtmlRenderer, NodeRenderer};
pub use walk::{WalkStatus, walk};

use crate::binder;
use crate::compiler::CompilerOptions;
use crate::component::Component;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::registry::Layout;
use crate::renderable::RawHtml;
use markdown::mdast::Node;
use markup::Scope;
use slotdown_core::{Document, HostDocument, Property, is_trigger};
use std::io;
use std::sync::Arc;

/// Renders documents against a top-level layout.
///
/// Cloning is cheap; all state is shared behind `Arc`s.
#[derive(Clone)]
pub struct Renderer {
    layout: Arc<Layout>,
    fallback: Arc<dyn NodeRenderer>,
    options: Arc<CompilerOptions>,
}

impl Renderer {
    /// Creates a renderer using [`HtmlRenderer`] as the fallback.
    pub fn new(layout: Arc<Layout>, options: CompilerOptions) -> Self {
        Self {
            layout,
            fallback: Arc::new(HtmlRenderer::new(options.allow_raw_html)),
            options: Arc::new(options),
        }
    }

    /// Replaces the fallback renderer.
    pub fn with_fallback(mut self, fallback: Arc<dyn NodeRenderer>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Top-level layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Active options.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Parses `source` and every markup block in it.
    pub fn parse(&self, source: &str) -> Result<HostDocument, RenderError> {
        let host = HostDocument::parse(source, &self.options.parse_options(), &self.options.trigger)?;
        Ok(host)
    }

    /// Parses and renders `source`.
    pub fn render_source(
        &self,
        source: &str,
        ctx: &RenderContext,
        w: &mut dyn io::Write,
    ) -> Result<(), RenderError> {
        let host = self.parse(source)?;
        self.render_host(&host, source, ctx, w)
    }

    /// Renders an already parsed document.
    pub fn render_host(
        &self,
        host: &HostDocument,
        source: &str,
        ctx: &RenderContext,
        w: &mut dyn io::Write,
    ) -> Result<(), RenderError> {
        walk(&host.root, &mut |node: &Node, entering: bool| {
            self.visit(host, source, node, entering, ctx, w)
        })?;
        Ok(())
    }

    fn visit(
        &self,
        host: &HostDocument,
        source: &str,
        node: &Node,
        entering: bool,
        ctx: &RenderContext,
        w: &mut dyn io::Write,
    ) -> Result<WalkStatus, RenderError> {
        if let Node::Code(code) = node
            && is_trigger(code, host.trigger())
        {
            if entering {
                match host.block(code) {
                    Some(document) => self.render_document(document, ctx, w)?,
                    None => log::warn!("markup block without a parsed document skipped"),
                }
            }
            return Ok(WalkStatus::SkipChildren);
        }

        if let Some(tag) = element_tag(node)
            && let Some(unit) = self.layout.get(tag)
        {
            if entering {
                self.render_element(tag, &unit, host, source, node, ctx, w)?;
            }
            return Ok(WalkStatus::SkipChildren);
        }

        self.fallback.render(w, host, source, node, entering)
    }

    fn render_document(
        &self,
        document: &Document,
        ctx: &RenderContext,
        w: &mut dyn io::Write,
    ) -> Result<(), RenderError> {
        log::debug!("rendering markup block with {} root nodes", document.nodes.len());
        for node in &document.nodes {
            self.render_node(node, &self.layout, ctx, w)?;
        }
        Ok(())
    }

    /// Renders a markdown element through the unit registered for its tag.
    ///
    /// Children are rendered first and handed to the unit as raw HTML. Links
    /// pass their target as `Href` and headings their generated `Id`.
    #[allow(clippy::too_many_arguments)]
    fn render_element(
        &self,
        tag: &'static str,
        unit: &Arc<dyn Component>,
        host: &HostDocument,
        source: &str,
        node: &Node,
        ctx: &RenderContext,
        w: &mut dyn io::Write,
    ) -> Result<(), RenderError> {
        let mut inner = Vec::new();
        for child in node.children().into_iter().flatten() {
            walk(child, &mut |n: &Node, entering: bool| {
                self.visit(host, source, n, entering, ctx, &mut inner)
            })?;
        }
        let children = RawHtml(String::from_utf8_lossy(&inner).into_owned());

        let properties = match node {
            Node::Link(link) => vec![Property::string("Href", &link.url)],
            Node::Heading(heading) => host
                .heading_id(heading)
                .map(|id| vec![Property::string("Id", id)])
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        let scope = Scope::new(self, Arc::clone(&self.layout));
        let bound = binder::build(unit, &properties, &scope)
            .map_err(|e| RenderError::component(tag, e))?;
        bound
            .render(&ctx.with_children(Arc::new(children)), w)
            .map_err(|e| RenderError::component(tag, e))
    }
}

/// Tag name under which a unit can take over a markdown element.
fn element_tag(node: &Node) -> Option<&'static str> {
    let tag = match node {
        Node::Heading(heading) => match heading.depth {
            1 => "h1",
            2 => "h2",
            3 => "h3",
            4 => "h4",
            5 => "h5",
            _ => "h6",
        },
        Node::Paragraph(_) => "p",
        Node::ThematicBreak(_) => "hr",
        Node::Link(_) => "a",
        Node::List(_) => "ul",
        Node::ListItem(_) => "li",
        _ => return None,
    };
    Some(tag)
}
