#![deny(missing_docs)]
//! Slotdown core: component markup tokenizer, parser, and host markdown parsing.

/// Core error and location types.
pub mod error;
/// Host markdown parsing and markup block extraction.
pub mod host;
/// Indentation-aware markup lexer.
pub mod lexer;
/// Parsed component tree.
pub mod node;
/// Recursive-descent markup parser.
pub mod parser;
/// Heading id generation.
pub mod slug;
/// Markup token types.
pub mod token;

pub use error::{MarkupError, SourceLocation};
pub use host::{DEFAULT_TRIGGER, HostDocument, ParseOptions, is_trigger, parse_mdast};
pub use lexer::{INDENT_WIDTH, Lexer, tokenize};
pub use node::{ComponentNode, Document, Node, Property, PropertyValue, TextNode};
pub use parser::{Parser, parse};
pub use slug::{Slugger, heading_text, slugify};
pub use token::{Token, TokenKind};
