//! The source file shape a payload is embedded in: a declaration, the opening
//! delimiter, the escaped payload, the closing delimiter and a terminator.
use crate::{Escape, scan::Findings, scan::TokenKind};
use anyhow::{Result, bail};
use compact_str::CompactString;
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embedding {
    escape: Escape,
    declaration: String,
    terminator: CompactString,
}

impl Embedding {
    /// `declaration` is written before the opening delimiter and
    /// `terminator` after the closing one. Return an error if
    /// - the declaration contains the delimiter, it would be taken for the
    ///   opening
    /// - the declaration ends in an odd run of escape chars, it would escape
    ///   the opening
    /// - the terminator contains the delimiter
    /// - the terminator starts or ends with whitespace, the closing delimiter
    ///   is located by trimming it
    pub fn new(escape: Escape, declaration: &str, terminator: &str) -> Result<Self> {
        if declaration.contains(escape.get_delimiter()) {
            bail!("the declaration may not contain the delimiter")
        }
        if escape.escape_run(declaration, declaration.len()) % 2 == 1 {
            bail!("the declaration may not end in an unpaired escape char")
        }
        if terminator.contains(escape.get_delimiter()) {
            bail!("the terminator may not contain the delimiter")
        }
        if terminator.trim() != terminator {
            bail!("the terminator may not start or end with whitespace, got {terminator:?}")
        }
        Ok(Self {
            escape,
            declaration: declaration.to_string(),
            terminator: CompactString::new(terminator),
        })
    }

    /// A TypeScript module exporting the literal as `name`, terminated by `;`
    pub fn typescript_const(name: &str) -> Result<Self> {
        Self::new(Escape::template_literal(), &format!("export const {name} = "), ";")
    }

    pub fn escape(&self) -> &Escape {
        &self.escape
    }

    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    pub fn terminator(&self) -> &str {
        &self.terminator
    }

    /// Render the complete source text for `payload`, ending in a newline.
    pub fn render(&self, payload: &str) -> String {
        let d = self.escape.get_delimiter();
        let mut out = String::with_capacity(
            self.declaration.len() + payload.len() + self.terminator.len() + 16,
        );
        out.push_str(&self.declaration);
        out.push(d);
        self.escape.escape_to(payload, &mut out);
        out.push(d);
        out.push_str(&self.terminator);
        out.push('\n');
        out
    }

    /// byte offset of the first unescaped delimiter
    pub fn opening_offset(&self, text: &str) -> Option<usize> {
        self.escape
            .tokens(text)
            .find(|t| t.kind == TokenKind::Delimiter && !t.escaped)
            .map(|t| t.offset)
    }

    /// byte offset of the structural closing delimiter: an unescaped
    /// delimiter followed only by whitespace, the terminator, and trailing
    /// whitespace
    pub fn closing_offset(&self, text: &str) -> Option<usize> {
        let head = text
            .trim_end()
            .strip_suffix(self.terminator.as_str())?
            .trim_end();
        let at = head.strip_suffix(self.escape.get_delimiter())?.len();
        if self.escape.is_escaped(text, at) {
            None
        } else {
            Some(at)
        }
    }

    /// Scan `text` for unescaped delimiters and markers inside the literal.
    pub fn scan<'a>(&'a self, text: &'a str) -> Findings<'a> {
        let close = self.closing_offset(text);
        debug!("scanning {} bytes, closing delimiter at {close:?}", text.len());
        Findings::new(&self.escape, text, close)
    }

    /// Decode the payload of a literal previously produced by `render`.
    pub fn extract(&self, text: &str) -> Result<String> {
        let Some(open) = self.opening_offset(text) else {
            bail!("no opening delimiter found")
        };
        let close = match self.closing_offset(text) {
            Some(close) if close > open => close,
            _ => bail!("no closing delimiter followed by {:?} found", self.terminator),
        };
        let body = &text[open + self.escape.get_delimiter().len_utf8()..close];
        Ok(self.escape.unescape(body).into_owned())
    }
}
