//! Host markdown parsing and extraction of fenced markup blocks.

use crate::error::{MarkupError, SourceLocation};
use crate::node::Document;
use crate::parser;
use crate::slug::{Slugger, heading_text};
use markdown::mdast::{Code, Heading, Node};
use markdown::message::{Message, Place};
use std::collections::HashMap;

/// Fence info string that marks a code block as component markup.
pub const DEFAULT_TRIGGER: &str = "slotdown";

/// Host markdown parse options.
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Allow raw HTML nodes in the AST.
    pub raw_html: bool,
    /// Enable indented code blocks.
    pub code_indented: bool,
}

impl ParseOptions {
    /// CommonMark defaults with GFM enabled and raw HTML disabled.
    pub const fn markdown() -> Self {
        Self {
            gfm: true,
            raw_html: false,
            code_indented: true,
        }
    }

    /// Convert to markdown-rs `ParseOptions`.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            code_indented: self.code_indented,
            html_flow: self.raw_html,
            html_text: self.raw_html,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        markdown::ParseOptions {
            constructs,
            ..markdown::ParseOptions::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::markdown()
    }
}

/// Parse markdown into an MDAST tree.
pub fn parse_mdast(input: &str, options: &ParseOptions) -> Result<Node, MarkupError> {
    markdown::to_mdast(input, &options.to_markdown()).map_err(|err| MarkupError::Markdown {
        message: err.to_string(),
        location: message_location(&err),
    })
}

fn message_location(message: &Message) -> SourceLocation {
    match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => SourceLocation::new(point.line, point.column),
            Place::Position(position) => {
                SourceLocation::new(position.start.line, position.start.column)
            }
        },
        None => SourceLocation::new(1, 1),
    }
}

/// A parsed host document with its markup blocks already parsed.
///
/// Blocks are keyed by the byte offset where their fence starts in the host
/// source, so a renderer walking [`HostDocument::root`] can find the parsed
/// tree for any trigger block it meets. Heading ids are assigned the same
/// way, in document order.
#[derive(Debug, Clone)]
pub struct HostDocument {
    /// Host markdown tree.
    pub root: Node,
    trigger: String,
    blocks: HashMap<usize, Document>,
    headings: HashMap<usize, String>,
}

impl HostDocument {
    /// Parses `source` as markdown and every `trigger` fenced block as markup.
    ///
    /// Fails on the first block that does not parse. Error lines point into
    /// `source`.
    pub fn parse(source: &str, options: &ParseOptions, trigger: &str) -> Result<Self, MarkupError> {
        let root = parse_mdast(source, options)?;
        let mut blocks = HashMap::new();
        let mut headings = HashMap::new();
        let mut slugger = Slugger::new();
        let mut pending = vec![&root];
        while let Some(node) = pending.pop() {
            if let Node::Code(code) = node
                && is_trigger(code, trigger)
            {
                let Some(position) = &code.position else {
                    log::warn!("markup block without position info skipped");
                    continue;
                };
                let document =
                    parser::parse(&code.value).map_err(|e| e.offset_lines(position.start.line))?;
                blocks.insert(position.start.offset, document);
                continue;
            }
            if let Node::Heading(heading) = node
                && let Some(position) = &heading.position
            {
                let id = slugger.next_slug(&heading_text(&heading.children));
                headings.insert(position.start.offset, id);
            }
            if let Some(children) = node.children() {
                pending.extend(children.iter().rev());
            }
        }
        log::debug!("host document has {} markup blocks", blocks.len());
        Ok(Self {
            root,
            trigger: trigger.to_string(),
            blocks,
            headings,
        })
    }

    /// The fence info string blocks were extracted with.
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Returns the parsed markup for a trigger code node of this document.
    pub fn block(&self, code: &Code) -> Option<&Document> {
        if !is_trigger(code, &self.trigger) {
            return None;
        }
        let position = code.position.as_ref()?;
        self.blocks.get(&position.start.offset)
    }

    /// Generated id of a heading of this document.
    pub fn heading_id(&self, heading: &Heading) -> Option<&str> {
        let position = heading.position.as_ref()?;
        self.headings.get(&position.start.offset).map(String::as_str)
    }

    /// Number of markup blocks found.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

/// True if `code` is a fenced block whose info string is exactly `trigger`.
pub fn is_trigger(code: &Code, trigger: &str) -> bool {
    code.lang.as_deref() == Some(trigger)
}
