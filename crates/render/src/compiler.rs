//! Compiler facade: options, one-shot conversion, and page rendering.

use crate::context::{PageContext, RenderContext};
use crate::error::RenderError;
use crate::registry::{Layout, Registry};
use crate::renderable::Renderable;
use crate::renderer::{NodeRenderer, Renderer};
use serde::{Deserialize, Serialize};
use slotdown_core::{DEFAULT_TRIGGER, ParseOptions};
use std::io;
use std::sync::Arc;

/// Compiler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Fence info string that marks markup blocks.
    #[serde(default = "default_trigger")]
    pub trigger: String,
    /// Whether GitHub Flavored Markdown constructs are parsed.
    #[serde(default = "default_gfm")]
    pub gfm: bool,
    /// Whether raw HTML in markdown passes through unescaped.
    #[serde(default)]
    pub allow_raw_html: bool,
}

fn default_trigger() -> String {
    DEFAULT_TRIGGER.to_string()
}

fn default_gfm() -> bool {
    true
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            trigger: default_trigger(),
            gfm: default_gfm(),
            allow_raw_html: false,
        }
    }
}

impl CompilerOptions {
    /// Reads options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Host markdown parse options.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            gfm: self.gfm,
            raw_html: self.allow_raw_html,
            ..ParseOptions::default()
        }
    }
}

/// Compiles markdown with embedded component markup against one layout.
///
/// Registration happens before the compiler is built; afterwards it is
/// read-only and can be shared across threads.
///
/// ```
/// use slotdown_render::{Compiler, Layout, PropSchema, unit};
///
/// let mut layout = Layout::new("Site");
/// layout
///     .register(
///         "Badge",
///         unit(PropSchema::new().string("Label"), |props, _, w| {
///             write!(w, "<span>{}</span>", props.string("Label").unwrap_or_default())?;
///             Ok(())
///         }),
///     )
///     .unwrap();
///
/// let html = Compiler::new(layout)
///     .render_to_string("```slotdown\n\\Badge\n    Label: \"new\"\n```")
///     .unwrap();
/// assert_eq!(html, "<span>new</span>");
/// ```
#[derive(Clone)]
pub struct Compiler {
    renderer: Renderer,
}

impl Compiler {
    /// A compiler with default options.
    pub fn new(layout: Layout) -> Self {
        Self::with_options(layout, CompilerOptions::default())
    }

    /// A compiler with the given options.
    pub fn with_options(layout: Layout, options: CompilerOptions) -> Self {
        Self {
            renderer: Renderer::new(Arc::new(layout), options),
        }
    }

    /// A compiler for the layout registered in `registry` under `name`.
    pub fn from_registry(
        registry: &Registry,
        name: &str,
        options: CompilerOptions,
    ) -> Result<Self, RenderError> {
        let layout = registry.layout(name)?;
        Ok(Self::with_options(layout.clone(), options))
    }

    /// Replaces the fallback renderer for unregistered markdown nodes.
    pub fn with_fallback(mut self, fallback: Arc<dyn NodeRenderer>) -> Self {
        self.renderer = self.renderer.with_fallback(fallback);
        self
    }

    /// Active options.
    pub fn options(&self) -> &CompilerOptions {
        self.renderer.options()
    }

    /// Top-level layout.
    pub fn layout(&self) -> &Layout {
        self.renderer.layout()
    }

    /// Renders `source` with an empty context.
    pub fn convert(&self, source: &str, w: &mut dyn io::Write) -> Result<(), RenderError> {
        self.convert_with(source, &RenderContext::new(), w)
    }

    /// Renders `source` with `ctx`.
    pub fn convert_with(
        &self,
        source: &str,
        ctx: &RenderContext,
        w: &mut dyn io::Write,
    ) -> Result<(), RenderError> {
        self.renderer.render_source(source, ctx, w)
    }

    /// Renders `source` to a string.
    pub fn render_to_string(&self, source: &str) -> Result<String, RenderError> {
        let mut out = Vec::new();
        self.convert(source, &mut out)?;
        String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
    }

    /// Parses `source` now and returns a value that renders it later.
    ///
    /// Parse errors surface here rather than at render time.
    pub fn to_renderable(&self, source: &str) -> Result<Arc<dyn Renderable>, RenderError> {
        let host = Arc::new(self.renderer.parse(source)?);
        let source: Arc<str> = Arc::from(source);
        let renderer = self.renderer.clone();
        Ok(Arc::new(
            move |ctx: &RenderContext, w: &mut dyn io::Write| {
                renderer.render_host(&host, &source, ctx, w)
            },
        ))
    }

    /// Renders `layout_source` with `page_source` as its slot content.
    ///
    /// `\Slot` anywhere in the layout markup renders the page.
    pub fn render_page(
        &self,
        layout_source: &str,
        page_source: &str,
        page: PageContext,
        w: &mut dyn io::Write,
    ) -> Result<(), RenderError> {
        log::debug!("rendering page {}", page.url);
        let slot = self.to_renderable(page_source)?;
        let ctx = RenderContext::new().with_page(page).with_slot(slot);
        self.convert_with(layout_source, &ctx, w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_json_fill_defaults() {
        let options = CompilerOptions::from_json(r#"{"allowRawHtml": true}"#).unwrap();
        assert_eq!(options.trigger, "slotdown");
        assert!(options.gfm);
        assert!(options.allow_raw_html);

        let options = CompilerOptions::from_json(r#"{"trigger": "ui", "gfm": false}"#).unwrap();
        assert_eq!(options.trigger, "ui");
        assert!(!options.parse_options().gfm);
    }

    #[test]
    fn test_plain_markdown_passes_through() {
        let compiler = Compiler::new(Layout::new("Empty"));
        assert_eq!(
            compiler.render_to_string("Hello *world*").unwrap(),
            "<p>Hello <em>world</em></p>"
        );
    }

    #[test]
    fn test_missing_layout_in_registry() {
        let err = Compiler::from_registry(&Registry::new(), "Docs", CompilerOptions::default())
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "layout Docs not found");
    }

    #[test]
    fn test_to_renderable_reports_parse_errors_early() {
        let compiler = Compiler::new(Layout::new("Empty"));
        let err = compiler
            .to_renderable("```slotdown\n\\Card\n  Broken\n```")
            .err()
            .unwrap();
        assert!(matches!(err, RenderError::Markup(e) if e.is_lex_error()));
    }
}
