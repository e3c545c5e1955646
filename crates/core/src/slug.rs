//! Heading ids for host documents.

use markdown::mdast::Node;
use std::collections::HashMap;

/// Generates unique heading ids within one document.
///
/// A slug that was already handed out gets a `-1`, `-2`, ... suffix.
///
/// ```
/// use slotdown_core::Slugger;
///
/// let mut slugger = Slugger::new();
/// assert_eq!(slugger.next_slug("Getting Started"), "getting-started");
/// assert_eq!(slugger.next_slug("Getting Started"), "getting-started-1");
/// ```
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    /// Creates a slugger with no ids handed out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for the next heading with `text`.
    pub fn next_slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        slug
    }
}

/// Lowercases `text`, turns spaces into hyphens and drops punctuation.
///
/// Text with nothing left falls back to `heading`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.trim().chars() {
        if ch.is_alphanumeric() || ch == '-' || ch == '_' {
            slug.extend(ch.to_lowercase());
        } else if ch == ' ' {
            slug.push('-');
        }
    }
    if slug.is_empty() {
        slug.push_str("heading");
    }
    slug
}

/// Plain text of a heading's inline children.
pub fn heading_text(children: &[Node]) -> String {
    let mut text = String::new();
    collect_text(children, &mut text);
    text.trim().to_string()
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(&text.value),
            Node::InlineCode(code) => out.push_str(&code.value),
            Node::Image(image) => out.push_str(&image.alt),
            other => {
                if let Some(children) = other.children() {
                    collect_text(children, out);
                }
            }
        }
    }
}
