//! Tokenizing and scanning for unescaped delimiters and markers.
//!
//! [`Tokens`] walks a text once and yields every delimiter and marker along
//! with its position and whether it is escaped. Parity is tracked across the
//! whole buffer: a newline ends an escape run, so an odd run at the end of a
//! line escapes the newline and the next line starts unescaped.
//!
//! [`Findings`] drives a small state machine over those tokens to separate
//! the structural opening and closing delimiters of a literal from the
//! defects in its body.
use crate::Escape;
use compact_str::CompactString;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Delimiter,
    Marker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub escaped: bool,
    /// byte offset of the token's first char
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column, counted in chars
    pub column: usize,
    /// byte offset of the start of the token's line
    pub line_start: usize,
}

#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    esc: &'a Escape,
    text: &'a str,
    chars: std::str::CharIndices<'a>,
    escaped: bool,
    line: usize,
    column: usize,
    line_start: usize,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(esc: &'a Escape, text: &'a str) -> Self {
        Self {
            esc,
            text,
            chars: text.char_indices(),
            escaped: false,
            line: 1,
            column: 0,
            line_start: 0,
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        for (i, c) in self.chars.by_ref() {
            let escaped = self.escaped;
            self.escaped = c == self.esc.get_escape_char() && !escaped;
            self.column += 1;
            let kind = if c == self.esc.get_delimiter() {
                Some(TokenKind::Delimiter)
            } else if self.text[i..].starts_with(self.esc.get_marker()) {
                Some(TokenKind::Marker)
            } else {
                None
            };
            let token = kind.map(|kind| Token {
                kind,
                escaped,
                offset: i,
                line: self.line,
                column: self.column,
                line_start: self.line_start,
            });
            if c == '\n' {
                self.line += 1;
                self.column = 0;
                self.line_start = i + 1;
            }
            if token.is_some() {
                return token;
            }
        }
        None
    }
}

/// What was found unescaped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Delimiter(char),
    Marker(CompactString),
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Delimiter('`') => write!(f, "backtick"),
            Kind::Delimiter('"') => write!(f, "double quote"),
            Kind::Delimiter('\'') => write!(f, "single quote"),
            Kind::Delimiter(c) => write!(f, "{c:?}"),
            Kind::Marker(m) => write!(f, "{m}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding<'a> {
    pub kind: Kind,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    /// the trimmed source line
    pub context: &'a str,
}

impl fmt::Display for Finding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found unescaped {} at Line {}, Col {}: {}",
            self.kind, self.line, self.column, self.context
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    BeforeOpen,
    InBody,
    AfterClose,
}

/// Lazy iterator over the unescaped delimiters and markers inside a literal
/// that are not its opening or closing delimiter. Scanning does not modify
/// the text, so calling [`Findings::new`] (or `Embedding::scan`) again
/// yields the same findings.
#[derive(Debug, Clone)]
pub struct Findings<'a> {
    esc: &'a Escape,
    text: &'a str,
    tokens: Tokens<'a>,
    close: Option<usize>,
    state: State,
}

impl<'a> Findings<'a> {
    /// `close` is the byte offset of the structural closing delimiter, if
    /// there is one.
    pub fn new(esc: &'a Escape, text: &'a str, close: Option<usize>) -> Self {
        Self {
            esc,
            text,
            tokens: esc.tokens(text),
            close,
            state: State::BeforeOpen,
        }
    }

    fn finding(&self, tok: Token) -> Finding<'a> {
        let line = &self.text[tok.line_start..];
        let line = line.split('\n').next().unwrap_or_default();
        let kind = match tok.kind {
            TokenKind::Delimiter => Kind::Delimiter(self.esc.get_delimiter()),
            TokenKind::Marker => Kind::Marker(CompactString::new(self.esc.get_marker())),
        };
        Finding {
            kind,
            offset: tok.offset,
            line: tok.line,
            column: tok.column,
            context: line.trim(),
        }
    }
}

impl<'a> Iterator for Findings<'a> {
    type Item = Finding<'a>;

    fn next(&mut self) -> Option<Finding<'a>> {
        while let Some(tok) = self.tokens.next() {
            if tok.escaped {
                continue;
            }
            match (self.state, tok.kind) {
                (State::BeforeOpen, TokenKind::Delimiter) => self.state = State::InBody,
                (State::BeforeOpen, TokenKind::Marker) => (),
                (State::InBody, TokenKind::Delimiter) if Some(tok.offset) == self.close => {
                    self.state = State::AfterClose
                }
                (State::InBody, _) => return Some(self.finding(tok)),
                (State::AfterClose, _) => return None,
            }
        }
        None
    }
}
