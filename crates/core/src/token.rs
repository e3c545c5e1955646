//! Token types produced by the markup lexer.

use crate::error::SourceLocation;
use serde::Serialize;

/// Kinds of structural tokens in component markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// End of input. Returned forever once reached.
    EndOfInput,
    /// `\n`
    LineBreak,
    /// One indentation level: a tab or four spaces.
    Indent,
    /// `\HeroV2`, `\Button`, `\Card`
    ComponentMarker,
    /// `Title`, `Href`, `Description` (always followed by a colon)
    PropertyName,
    /// Quoted string contents or a free-form line of text.
    Text,
    /// Unquoted numeric property value: `24`, `3.14`
    Number,
    /// `!Visible`, `!Hidden`
    BooleanFlag,
    /// `:`
    Colon,
    /// `"`
    Quote,
}

impl TokenKind {
    /// Human readable token name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::EndOfInput => "end of input",
            TokenKind::LineBreak => "line break",
            TokenKind::Indent => "indent",
            TokenKind::ComponentMarker => "component",
            TokenKind::PropertyName => "property",
            TokenKind::Text => "text",
            TokenKind::Number => "number",
            TokenKind::BooleanFlag => "flag",
            TokenKind::Colon => "colon",
            TokenKind::Quote => "quote",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single lexed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Token text with markers (`\`, `!`) stripped and escapes resolved.
    pub value: String,
    /// Where the token starts.
    pub location: SourceLocation,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, value: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            value: value.into(),
            location,
        }
    }

    /// Returns true if this token has the given kind.
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
