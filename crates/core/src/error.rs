use crate::token::TokenKind;
use serde::Serialize;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in characters)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors raised while tokenizing or parsing component markup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarkupError {
    /// Indentation that is neither a tab nor a run of four spaces.
    #[error("malformed indentation at {location}: expected a tab or four spaces")]
    MalformedIndent {
        /// Source location
        location: SourceLocation,
    },
    /// A token that cannot appear at this position.
    #[error("unexpected {found} {value:?} at {location}")]
    UnexpectedToken {
        /// Kind of the offending token
        found: TokenKind,
        /// Raw token value
        value: String,
        /// Source location
        location: SourceLocation,
    },
    /// Property name not followed by a colon.
    #[error("{location} expected colon after property name got {value:?}")]
    ExpectedColon {
        /// Raw token value
        value: String,
        /// Source location
        location: SourceLocation,
    },
    /// A quoted string that does not follow `"text"`.
    #[error("malformed string at {location}: {message}")]
    MalformedString {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// A property value that starts with neither a quote, a number nor a line break.
    #[error("{location} expected quote, number or newline got {value:?}")]
    ExpectedPropertyValue {
        /// Raw token value
        value: String,
        /// Source location
        location: SourceLocation,
    },
    /// A property block with more than one component.
    #[error("{location} a property value can only contain one component got {count}")]
    TooManyComponents {
        /// Number of components found in the block
        count: usize,
        /// Source location
        location: SourceLocation,
    },
    /// A property block that mixes a component with text lines.
    #[error("{location} a property value cannot mix a component with text")]
    MixedPropertyValue {
        /// Source location
        location: SourceLocation,
    },
    /// markdown-rs parser error surfaced through the host adapter.
    #[error("markdown error at {location}: {message}")]
    Markdown {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
}

impl MarkupError {
    /// Create an unexpected token error
    pub fn unexpected(found: TokenKind, value: impl Into<String>, location: SourceLocation) -> Self {
        Self::UnexpectedToken {
            found,
            value: value.into(),
            location,
        }
    }

    /// Create a malformed string error
    pub fn malformed_string(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::MalformedString {
            message: message.into(),
            location,
        }
    }

    /// Whether this error came from the tokenizer rather than the parser.
    ///
    /// Lexing errors abort the whole parse: every later scoping decision
    /// depends on the indentation that failed to lex.
    pub fn is_lex_error(&self) -> bool {
        matches!(self, MarkupError::MalformedIndent { .. })
    }

    /// Shifts the reported line by `lines`.
    ///
    /// Used when markup is parsed out of a larger host document so that
    /// locations point into the host source.
    pub fn offset_lines(mut self, lines: usize) -> Self {
        self.location_mut().line += lines;
        self
    }

    /// Location of the offending input.
    pub fn location(&self) -> SourceLocation {
        match self {
            MarkupError::MalformedIndent { location }
            | MarkupError::UnexpectedToken { location, .. }
            | MarkupError::ExpectedColon { location, .. }
            | MarkupError::MalformedString { location, .. }
            | MarkupError::ExpectedPropertyValue { location, .. }
            | MarkupError::TooManyComponents { location, .. }
            | MarkupError::MixedPropertyValue { location }
            | MarkupError::Markdown { location, .. } => *location,
        }
    }

    fn location_mut(&mut self) -> &mut SourceLocation {
        match self {
            MarkupError::MalformedIndent { location }
            | MarkupError::UnexpectedToken { location, .. }
            | MarkupError::ExpectedColon { location, .. }
            | MarkupError::MalformedString { location, .. }
            | MarkupError::ExpectedPropertyValue { location, .. }
            | MarkupError::TooManyComponents { location, .. }
            | MarkupError::MixedPropertyValue { location }
            | MarkupError::Markdown { location, .. } => location,
        }
    }
}
