//! Automatic repair of a generated literal: restore a closing delimiter that
//! was escaped by mistake, then escape every occurrence the scanner reports.
use crate::Embedding;
use anyhow::{Result, bail};
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repair {
    pub text: String,
    /// the closing delimiter or terminator was rewritten
    pub closed: bool,
    /// number of occurrences that were escaped
    pub escaped: usize,
}

/// If the last delimiter in `text` is escaped, or is not followed by the
/// terminator, return `text` with that tail rewritten to an unescaped
/// delimiter and the terminator. Return `None` if the tail is already
/// structural or there is no delimiter to close with.
pub fn repair_close(emb: &Embedding, text: &str) -> Option<String> {
    let esc = emb.escape();
    let term = emb.terminator();
    let trimmed = text.trim_end();
    let (head, terminated) = match trimmed.strip_suffix(term) {
        Some(head) if !term.is_empty() => (head.trim_end(), true),
        _ => (trimmed, term.is_empty()),
    };
    let at = head.strip_suffix(esc.get_delimiter())?.len();
    let escaped = esc.is_escaped(text, at);
    if !escaped && terminated {
        return None;
    }
    let cut = if escaped {
        at - esc.get_escape_char().len_utf8()
    } else {
        at
    };
    emb.opening_offset(&text[..cut])?;
    Some(format!("{}{}{}\n", &text[..cut], esc.get_delimiter(), term))
}

/// Insert the escape char before every occurrence the scanner reports.
/// Returns the new text and the number of insertions.
pub fn escape_findings(emb: &Embedding, text: &str) -> (String, usize) {
    let offsets: Vec<usize> = emb.scan(text).map(|f| f.offset).collect();
    let mut out = String::with_capacity(text.len() + offsets.len());
    let mut last = 0;
    for at in &offsets {
        out.push_str(&text[last..*at]);
        out.push(emb.escape().get_escape_char());
        last = *at;
    }
    out.push_str(&text[last..]);
    (out, offsets.len())
}

/// Repair the closing delimiter if needed, then escape every finding.
/// Fails without producing anything if the literal has no opening
/// delimiter, or no closing delimiter even after repair.
pub fn repair(emb: &Embedding, text: &str) -> Result<Repair> {
    if emb.opening_offset(text).is_none() {
        bail!("no opening delimiter found")
    }
    let (text, closed) = match repair_close(emb, text) {
        Some(text) => (text, true),
        None => (text.to_string(), false),
    };
    if emb.closing_offset(&text).is_none() {
        bail!("no closing delimiter followed by {:?} found", emb.terminator())
    }
    let (text, escaped) = escape_findings(emb, &text);
    debug!("repair rewrote closing: {closed}, escaped {escaped} occurrences");
    Ok(Repair { text, closed, escaped })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emb() -> Embedding {
        Embedding::typescript_const("tvHTML").unwrap()
    }

    #[test]
    fn unescapes_escaped_close() {
        let text = "export const tvHTML = `<p></p>\n\\`;\n\n";
        let fixed = repair_close(&emb(), text).unwrap();
        assert_eq!(fixed, "export const tvHTML = `<p></p>\n`;\n");
    }

    #[test]
    fn adds_missing_terminator() {
        let text = "export const tvHTML = `<p></p>\n\\`\n";
        let fixed = repair_close(&emb(), text).unwrap();
        assert_eq!(fixed, "export const tvHTML = `<p></p>\n`;\n");
    }

    #[test]
    fn structural_close_is_left_alone() {
        assert_eq!(repair_close(&emb(), "export const tvHTML = `a\\\\`;\n"), None);
        assert_eq!(repair_close(&emb(), "export const tvHTML = `"), None);
    }

    #[test]
    fn escapes_theme_interpolations() {
        let text = concat!(
            "export const tvHTML = `<script>\n",
            "el.className = \\`card ${theme.border} ${theme.shadow}\\`;\n",
            "glow.className = \\`\\${theme.glow}\\`;\n",
            "</script>`;\n",
        );
        let r = repair(&emb(), text).unwrap();
        assert!(!r.closed);
        assert_eq!(r.escaped, 2);
        assert!(r.text.contains("\\`card \\${theme.border} \\${theme.shadow}\\`"));
        assert_eq!(emb().scan(&r.text).count(), 0);
    }

    #[test]
    fn repairs_close_and_body_together() {
        let text = "export const tvHTML = `a ` b\n\\`;\n";
        let r = repair(&emb(), text).unwrap();
        assert!(r.closed);
        assert_eq!(r.escaped, 1);
        assert_eq!(r.text, "export const tvHTML = `a \\` b\n`;\n");
    }

    #[test]
    fn refuses_text_without_literal() {
        assert!(repair(&emb(), "export const tvHTML = 1;\n").is_err());
    }
}
