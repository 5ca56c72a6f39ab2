//! Targeted line patches: replace the first occurrence of a literal string on
//! a known line.
use anyhow::{Context, Result, bail};
use compact_str::CompactString;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// `find` was not on the line
    AlreadyFixed,
}

/// A replacement of `find` with `replace` on the line at `index` (0-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub index: usize,
    pub find: CompactString,
    pub replace: CompactString,
}

impl Patch {
    pub fn new(index: usize, find: &str, replace: &str) -> Self {
        Self {
            index,
            find: CompactString::new(find),
            replace: CompactString::new(replace),
        }
    }
}

/// Parses `LINE:FIND=>REPLACE` with a 1-based line number.
impl FromStr for Patch {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((line, rest)) = s.split_once(':') else {
            bail!("expected LINE:FIND=>REPLACE, got {s:?}")
        };
        let line: usize = line
            .trim()
            .parse()
            .with_context(|| format!("bad line number {line:?}"))?;
        if line == 0 {
            bail!("line numbers start at 1")
        }
        let Some((find, replace)) = rest.split_once("=>") else {
            bail!("expected FIND=>REPLACE, got {rest:?}")
        };
        if find.is_empty() {
            bail!("the find string may not be empty")
        }
        Ok(Self::new(line - 1, find, replace))
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}=>{}", self.index + 1, self.find, self.replace)
    }
}

/// Split `text` into lines, each keeping its line ending, so that
/// concatenating them gives back `text`.
pub fn lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(String::from).collect()
}

/// Replace the first occurrence of `find` on `lines[index]` with `replace`.
/// A line without `find` is left unchanged.
pub fn patch_line(
    lines: &mut [String],
    index: usize,
    find: &str,
    replace: &str,
) -> Result<Outcome> {
    let Some(line) = lines.get_mut(index) else {
        bail!("line {} is past the end of the file ({} lines)", index + 1, lines.len())
    };
    if line.contains(find) {
        *line = line.replacen(find, replace, 1);
        Ok(Outcome::Applied)
    } else {
        Ok(Outcome::AlreadyFixed)
    }
}

/// Apply `patches` in order. Every line index is checked before any line is
/// changed, so an error leaves `lines` untouched.
pub fn apply(lines: &mut [String], patches: &[Patch]) -> Result<Vec<Outcome>> {
    if let Some(p) = patches.iter().find(|p| p.index >= lines.len()) {
        bail!("patch {p} is past the end of the file ({} lines)", lines.len())
    }
    patches
        .iter()
        .map(|p| patch_line(lines, p.index, &p.find, &p.replace))
        .collect()
}
