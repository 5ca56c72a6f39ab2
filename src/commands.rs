use crate::cli::SyntaxArgs;
use anyhow::Result;
use litescape::{Outcome, Patch, file, patch, repair};
use log::{info, warn};
use std::io::{self, Write};
use std::path::Path;

pub fn generate(input: &Path, output: &Path, name: &str, syntax: &SyntaxArgs) -> Result<()> {
    let emb = syntax.embedding(&format!("export const {name} = "))?;
    let payload = file::read(input)?;
    file::write(output, &emb.render(&payload))?;
    info!("generated {} from {}", output.display(), input.display());
    Ok(())
}

pub fn check(path: &Path, syntax: &SyntaxArgs) -> Result<()> {
    let emb = syntax.embedding("")?;
    let text = file::read(path)?;
    if emb.closing_offset(&text).is_none() {
        warn!("no closing delimiter followed by {:?} in {}", emb.terminator(), path.display());
    }
    let mut out = io::stdout().lock();
    let mut n = 0;
    for finding in emb.scan(&text) {
        writeln!(out, "{finding}")?;
        n += 1;
    }
    info!("{n} unescaped occurrences in {}", path.display());
    Ok(())
}

pub fn patch(path: &Path, patches: &[Patch]) -> Result<()> {
    let text = file::read(path)?;
    let mut lines = patch::lines(&text);
    let outcomes = patch::apply(&mut lines, patches)?;
    for (p, outcome) in patches.iter().zip(&outcomes) {
        match outcome {
            Outcome::Applied => info!("line {}: applied {p}", p.index + 1),
            Outcome::AlreadyFixed => info!("line {}: already fixed, skipped {p}", p.index + 1),
        }
    }
    if outcomes.contains(&Outcome::Applied) {
        file::write(path, &lines.concat())?;
    }
    Ok(())
}

pub fn fix(path: &Path, syntax: &SyntaxArgs) -> Result<()> {
    let emb = syntax.embedding("")?;
    let text = file::read(path)?;
    let r = repair::repair(&emb, &text)?;
    if r.text != text {
        file::write(path, &r.text)?;
    }
    if r.closed {
        info!("restored the closing delimiter");
    }
    info!("escaped {} occurrences in {}", r.escaped, path.display());
    Ok(())
}

pub fn extract(path: &Path, output: Option<&Path>, syntax: &SyntaxArgs) -> Result<()> {
    let emb = syntax.embedding("")?;
    let payload = emb.extract(&file::read(path)?)?;
    match output {
        Some(output) => {
            file::write(output, &payload)?;
            info!("extracted {} bytes to {}", payload.len(), output.display());
        }
        None => io::stdout().lock().write_all(payload.as_bytes())?,
    }
    Ok(())
}
