//! Indentation-aware lexer for component markup.
//!
//! The lexer is lazy: tokens are produced one at a time by [`Lexer::next`],
//! and [`Lexer::peek`] looks one token ahead without consuming input. Several
//! rules depend on the previously returned token (indentation is only
//! recognized at line start, string contents only after an opening quote),
//! so `peek` never updates that state.

use crate::error::{MarkupError, SourceLocation};
use crate::token::{Token, TokenKind};

/// Number of spaces that make up one indentation level.
pub const INDENT_WIDTH: usize = 4;

/// Markup lexer over a borrowed source string.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    previous: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            previous: None,
        }
    }

    /// Returns the next token and advances past it.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Token, MarkupError> {
        let token = self.lex()?;
        log::trace!("token {:?} {:?} at {}", token.kind, token.value, token.location);
        self.previous = Some(token.clone());
        Ok(token)
    }

    /// Returns the next token without advancing.
    pub fn peek(&mut self) -> Result<Token, MarkupError> {
        let (pos, line, column) = (self.pos, self.line, self.column);
        let token = self.lex();
        self.pos = pos;
        self.line = line;
        self.column = column;
        token
    }

    /// Returns the last token returned by [`Lexer::next`].
    pub fn previous(&self) -> Option<&Token> {
        self.previous.as_ref()
    }

    fn lex(&mut self) -> Result<Token, MarkupError> {
        loop {
            if self.is_eof() {
                return Ok(Token::new(TokenKind::EndOfInput, "", self.location()));
            }

            if self.is_indent() {
                return self.lex_indent();
            }

            if self.previous_is(TokenKind::Quote)
                && let Some(end) = self.closing_quote()
            {
                return Ok(self.lex_string(end));
            }

            let location = self.location();
            match self.current() {
                b' ' | b'\t' => {
                    self.advance();
                    continue;
                }
                b'\r' if self.byte_at(self.pos + 1) == Some(b'\n') => {
                    self.advance();
                    continue;
                }
                b'\\' | b'!' if !self.byte_at(self.pos + 1).is_some_and(is_name_byte) => {
                    return Ok(self.lex_text());
                }
                b'\\' => return Ok(self.lex_marker(TokenKind::ComponentMarker)),
                b'!' => return Ok(self.lex_marker(TokenKind::BooleanFlag)),
                b'"' => {
                    self.advance();
                    return Ok(Token::new(TokenKind::Quote, "\"", location));
                }
                b':' => {
                    self.advance();
                    return Ok(Token::new(TokenKind::Colon, ":", location));
                }
                b'\n' => {
                    self.advance();
                    return Ok(Token::new(TokenKind::LineBreak, "\n", location));
                }
                _ => {}
            }

            if self.previous_is(TokenKind::Colon)
                && let Some(end) = self.number_end()
            {
                let value = self.take_until(end);
                return Ok(Token::new(TokenKind::Number, value, location));
            }

            if self.is_property() {
                return Ok(self.lex_property());
            }

            return Ok(self.lex_text());
        }
    }

    fn previous_is(&self, kind: TokenKind) -> bool {
        self.previous.as_ref().is_some_and(|t| t.is(kind))
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn is_indent(&self) -> bool {
        if self.pos == 0 {
            return false;
        }
        if !matches!(self.current(), b' ' | b'\t') {
            return false;
        }
        self.previous_is(TokenKind::Indent) || self.previous_is(TokenKind::LineBreak)
    }

    fn lex_indent(&mut self) -> Result<Token, MarkupError> {
        let location = self.location();
        if self.current() == b'\t' {
            self.advance();
            return Ok(Token::new(TokenKind::Indent, "\t", location));
        }
        let mut size = 0;
        while !self.is_eof() && self.current() == b' ' {
            size += 1;
            self.advance();
            if size == INDENT_WIDTH {
                return Ok(Token::new(TokenKind::Indent, "\t", location));
            }
        }
        Err(MarkupError::MalformedIndent { location })
    }

    /// Byte offset of the unescaped `"` closing a string on this line.
    fn closing_quote(&self) -> Option<usize> {
        let bytes = self.input.as_bytes();
        let mut i = self.pos;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => return None,
                b'\\' if bytes.get(i + 1) == Some(&b'"') => i += 2,
                b'"' => return Some(i),
                _ => i += 1,
            }
        }
        None
    }

    fn lex_string(&mut self, end: usize) -> Token {
        let location = self.location();
        let raw = self.take_until(end);
        Token::new(TokenKind::Text, raw.replace("\\\"", "\""), location)
    }

    /// Lexes `\Name` or `!Name`, stripping the leading marker.
    fn lex_marker(&mut self, kind: TokenKind) -> Token {
        let location = self.location();
        self.advance();
        let start = self.pos;
        while !self.is_eof() && is_name_byte(self.current()) {
            self.advance();
        }
        Token::new(kind, &self.input[start..self.pos], location)
    }

    /// End offset of a numeric literal filling the rest of the line.
    fn number_end(&self) -> Option<usize> {
        let rest = &self.input[self.pos..];
        let line = rest.split('\n').next().unwrap_or_default();
        let literal = line.trim_end_matches([' ', '\t', '\r']);
        is_number(literal).then(|| self.pos + literal.len())
    }

    fn is_property(&self) -> bool {
        let rest = &self.input.as_bytes()[self.pos..];
        for &b in rest {
            match b {
                b':' => return true,
                b'\n' => return false,
                b if is_name_byte(b) => {}
                _ => return false,
            }
        }
        false
    }

    fn lex_property(&mut self) -> Token {
        let location = self.location();
        let start = self.pos;
        while !self.is_eof() && self.current() != b':' {
            self.advance();
        }
        Token::new(
            TokenKind::PropertyName,
            &self.input[start..self.pos],
            location,
        )
    }

    fn lex_text(&mut self) -> Token {
        let location = self.location();
        let start = self.pos;
        while !self.is_eof() && self.current() != b'\n' {
            self.advance();
        }
        let value = self.input[start..self.pos].trim_end_matches('\r');
        Token::new(TokenKind::Text, value, location)
    }

    fn take_until(&mut self, end: usize) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while self.pos < end {
            self.advance();
        }
        &input[start..end]
    }

    fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }

    fn current(&self) -> u8 {
        self.byte_at(self.pos).unwrap_or(0)
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.input.as_bytes().get(pos).copied()
    }

    fn advance(&mut self) {
        let Some(b) = self.byte_at(self.pos) else {
            return;
        };
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else if !is_continuation_byte(b) {
            self.column += 1;
        }
        self.pos += 1;
    }
}

/// Lexes `input` to completion, including the trailing end-of-input token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, MarkupError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next()?;
        let done = token.is(TokenKind::EndOfInput);
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_continuation_byte(b: u8) -> bool {
    b & 0xC0 == 0x80
}

fn is_number(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && frac.is_none_or(all_digits)
}
