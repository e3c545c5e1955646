//! Default HTML output for markdown nodes no unit is registered for.

use super::walk::WalkStatus;
use crate::error::RenderError;
use html_escape::{encode_double_quoted_attribute, encode_text};
use markdown::mdast::Node;
use slotdown_core::HostDocument;
use std::io;

/// Fallback renderer for host markdown nodes.
///
/// Called once when a node is entered and once when it is exited. `host` is
/// the document being walked, for lookups such as heading ids.
pub trait NodeRenderer: Send + Sync {
    /// Writes the output for one side of `node`.
    fn render(
        &self,
        w: &mut dyn io::Write,
        host: &HostDocument,
        source: &str,
        node: &Node,
        entering: bool,
    ) -> Result<WalkStatus, RenderError>;
}

/// CommonMark-style HTML without added whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer {
    allow_raw_html: bool,
}

impl HtmlRenderer {
    /// Creates a renderer. Raw HTML nodes are escaped unless allowed.
    pub fn new(allow_raw_html: bool) -> Self {
        Self { allow_raw_html }
    }
}

fn tag(w: &mut dyn io::Write, entering: bool, name: &str) -> io::Result<()> {
    if entering {
        write!(w, "<{name}>")
    } else {
        write!(w, "</{name}>")
    }
}

impl NodeRenderer for HtmlRenderer {
    fn render(
        &self,
        w: &mut dyn io::Write,
        host: &HostDocument,
        _source: &str,
        node: &Node,
        entering: bool,
    ) -> Result<WalkStatus, RenderError> {
        match node {
            Node::Root(_) => {}
            Node::Paragraph(_) => tag(w, entering, "p")?,
            Node::Heading(heading) if entering => match host.heading_id(heading) {
                Some(id) => write!(
                    w,
                    "<h{} id=\"{}\">",
                    heading.depth,
                    encode_double_quoted_attribute(id)
                )?,
                None => write!(w, "<h{}>", heading.depth)?,
            },
            Node::Heading(heading) => write!(w, "</h{}>", heading.depth)?,
            Node::Blockquote(_) => tag(w, entering, "blockquote")?,
            Node::List(list) if entering && list.ordered => match list.start {
                Some(start) if start != 1 => write!(w, "<ol start=\"{start}\">")?,
                _ => w.write_all(b"<ol>")?,
            },
            Node::List(list) => tag(w, entering, if list.ordered { "ol" } else { "ul" })?,
            Node::ListItem(item) => {
                tag(w, entering, "li")?;
                if entering && let Some(checked) = item.checked {
                    let checked = if checked { " checked" } else { "" };
                    write!(w, "<input type=\"checkbox\" disabled{checked} /> ")?;
                }
            }
            Node::Emphasis(_) => tag(w, entering, "em")?,
            Node::Strong(_) => tag(w, entering, "strong")?,
            Node::Delete(_) => tag(w, entering, "del")?,
            Node::Text(text) if entering => w.write_all(encode_text(&text.value).as_bytes())?,
            Node::InlineCode(code) => {
                if entering {
                    write!(w, "<code>{}</code>", encode_text(&code.value))?;
                }
                return Ok(WalkStatus::SkipChildren);
            }
            Node::Code(code) => {
                if entering {
                    match &code.lang {
                        Some(lang) => write!(
                            w,
                            "<pre><code class=\"language-{}\">",
                            encode_double_quoted_attribute(lang)
                        )?,
                        None => w.write_all(b"<pre><code>")?,
                    }
                    w.write_all(encode_text(&code.value).as_bytes())?;
                    if !code.value.is_empty() {
                        w.write_all(b"\n")?;
                    }
                    w.write_all(b"</code></pre>")?;
                }
                return Ok(WalkStatus::SkipChildren);
            }
            Node::Link(link) if entering => {
                write!(w, "<a href=\"{}\"", encode_double_quoted_attribute(&link.url))?;
                if let Some(title) = &link.title {
                    write!(w, " title=\"{}\"", encode_double_quoted_attribute(title))?;
                }
                w.write_all(b">")?;
            }
            Node::Link(_) => w.write_all(b"</a>")?,
            Node::Image(image) if entering => {
                write!(
                    w,
                    "<img src=\"{}\" alt=\"{}\"",
                    encode_double_quoted_attribute(&image.url),
                    encode_double_quoted_attribute(&image.alt)
                )?;
                if let Some(title) = &image.title {
                    write!(w, " title=\"{}\"", encode_double_quoted_attribute(title))?;
                }
                w.write_all(b" />")?;
            }
            Node::Break(_) if entering => w.write_all(b"<br />")?,
            Node::ThematicBreak(_) if entering => w.write_all(b"<hr />")?,
            Node::Html(html) if entering => {
                if self.allow_raw_html {
                    w.write_all(html.value.as_bytes())?;
                } else {
                    log::debug!("escaping raw HTML: {}", html.value);
                    w.write_all(encode_text(&html.value).as_bytes())?;
                }
            }
            Node::Table(_) => tag(w, entering, "table")?,
            Node::TableRow(_) => tag(w, entering, "tr")?,
            Node::TableCell(_) => tag(w, entering, "td")?,
            Node::Text(_)
            | Node::Image(_)
            | Node::Break(_)
            | Node::ThematicBreak(_)
            | Node::Html(_) => {}
            _ => {
                if entering {
                    log::warn!("Unhandled markdown node type: {:?}", node);
                }
            }
        }
        Ok(WalkStatus::Continue)
    }
}
