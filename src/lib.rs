//! Litescape escapes text for embedding in a delimited string literal that
//! supports escape sequences and interpolation markers (a template literal),
//! and finds the occurrences in an embedded payload that are still
//! structurally significant. Build an `Escape` with `new` or
//! `template_literal`, then wrap it in an [`Embedding`] to produce or inspect
//! a generated source file.
use anyhow::{Result, bail};
use compact_str::CompactString;
use std::borrow::Cow;

pub mod embed;
pub mod file;
pub mod patch;
pub mod repair;
pub mod scan;

pub use embed::Embedding;
pub use patch::{Outcome, Patch};
pub use scan::{Finding, Kind, Tokens};


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escape {
    escape_char: char,
    delimiter: char,
    marker: CompactString,
}

impl Escape {
    /// return the escape char
    pub fn get_escape_char(&self) -> char {
        self.escape_char
    }

    /// return the delimiter that opens and closes the literal
    pub fn get_delimiter(&self) -> char {
        self.delimiter
    }

    /// return the interpolation marker
    pub fn get_marker(&self) -> &str {
        &self.marker
    }

    /// Create a new Escape, return an error if the following invariants are
    /// violated
    /// - the escape char must be ascii
    /// - the delimiter may not be the escape char
    /// - the marker must be exactly two chars
    /// - the marker may not contain the escape char or the delimiter
    ///
    /// `delimiter` is the character that opens and closes the literal, e.g. a
    /// backtick. `marker` is the sequence that introduces an interpolation
    /// when it is not escaped, e.g. `${`.
    pub fn new(escape_char: char, delimiter: char, marker: &str) -> Result<Self> {
        if !escape_char.is_ascii() {
            bail!("the escape char must be ascii")
        }
        if delimiter == escape_char {
            bail!("the delimiter may not be the escape char")
        }
        if marker.chars().count() != 2 {
            bail!("the interpolation marker must be exactly two chars, got {marker:?}")
        }
        if marker.contains(escape_char) {
            bail!("the interpolation marker may not contain the escape char")
        }
        if marker.contains(delimiter) {
            bail!("the interpolation marker may not contain the delimiter")
        }
        Ok(Self {
            escape_char,
            delimiter,
            marker: CompactString::new(marker),
        })
    }

    /// The escaping used by JavaScript and TypeScript template literals:
    /// backslash, backtick and `${`.
    pub fn template_literal() -> Self {
        Self {
            escape_char: '\\',
            delimiter: '`',
            marker: CompactString::const_new("${"),
        }
    }

    fn needs_escape(&self, rest: &str, c: char) -> bool {
        c == self.escape_char || c == self.delimiter || rest.starts_with(self.marker.as_str())
    }

    /// Escape the string and place the results into the buffer.
    ///
    /// The escape char is doubled, and the delimiter and the first char of
    /// every marker are prefixed with the escape char, all in one left to
    /// right pass. The result is the same as escaping the escape char first
    /// and the delimiter and marker afterwards, never the other way around.
    pub fn escape_to<T>(&self, s: &T, buf: &mut String)
    where
        T: AsRef<str> + ?Sized,
    {
        let s = s.as_ref();
        for (i, c) in s.char_indices() {
            if self.needs_escape(&s[i..], c) {
                buf.push(self.escape_char);
            }
            buf.push(c);
        }
    }

    /// Escape the string, or return it unmodified if it did not need
    /// to be escaped
    pub fn escape<'a, T>(&self, s: &'a T) -> Cow<'a, str>
    where
        T: AsRef<str> + ?Sized,
    {
        let s = s.as_ref();
        let to_escape = s
            .char_indices()
            .filter(|(i, c)| self.needs_escape(&s[*i..], *c))
            .count();
        if to_escape == 0 {
            Cow::Borrowed(s)
        } else {
            let mut out = String::with_capacity(s.len() + to_escape);
            self.escape_to(s, &mut out);
            Cow::Owned(out)
        }
    }

    /// Unescape the string and place the result in the buffer. An escape
    /// char followed by any char yields that char, a trailing unpaired
    /// escape char is dropped.
    pub fn unescape_to<T>(&self, s: &T, buf: &mut String)
    where
        T: AsRef<str> + ?Sized,
    {
        let mut escaped = false;
        buf.extend(s.as_ref().chars().filter(|c| {
            if *c == self.escape_char && !escaped {
                escaped = true;
                false
            } else {
                escaped = false;
                true
            }
        }))
    }

    /// Unescape the string, or return it unmodified if it did not need to be
    /// unescaped
    pub fn unescape<'a, T>(&self, s: &'a T) -> Cow<'a, str>
    where
        T: AsRef<str> + ?Sized,
    {
        let s = s.as_ref();
        if !s.contains(self.escape_char) {
            Cow::Borrowed(s)
        } else {
            let mut res = String::with_capacity(s.len());
            self.unescape_to(s, &mut res);
            Cow::Owned(res)
        }
    }

    /// return the number of consecutive escape chars immediately before
    /// byte offset `i`
    pub fn escape_run<T>(&self, s: &T, i: usize) -> usize
    where
        T: AsRef<str> + ?Sized,
    {
        let b = s.as_ref().as_bytes();
        let end = i.min(b.len());
        b[..end]
            .iter()
            .rev()
            .take_while(|b| **b == self.escape_char as u8)
            .count()
    }

    /// return true if the char at `i` is escaped, that is preceded by an odd
    /// number of escape chars. Return true if `i` is not a valid char
    /// boundary
    pub fn is_escaped<T>(&self, s: &T, i: usize) -> bool
    where
        T: AsRef<str> + ?Sized,
    {
        let s = s.as_ref();
        !s.is_char_boundary(i) || self.escape_run(s, i) % 2 == 1
    }

    /// return an iterator over the delimiters and markers in `s`, each
    /// classified as escaped or not
    pub fn tokens<'a>(&'a self, s: &'a str) -> Tokens<'a> {
        Tokens::new(self, s)
    }
}

impl Default for Escape {
    fn default() -> Self {
        Self::template_literal()
    }
}
