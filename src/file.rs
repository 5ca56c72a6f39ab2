//! Reading and writing artifacts. Writes go through a temporary file in the
//! destination directory that is persisted over the target only once the
//! whole content has been written, so a failed write leaves the previous
//! file in place.
use anyhow::{Context, Result};
use log::debug;
use std::{fs, io::Write, path::Path};
use tempfile::NamedTempFile;

pub fn read(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    debug!("read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

pub fn write(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("creating temp file in {}", parent.display()))?;
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("writing temp file for {}", path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("syncing temp file for {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("replacing {}", path.display()))?;
    debug!("wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
