//! Turning a finished session into a links file.

use super::links::LinkStore;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Base name used when the page has no usable heading.
pub const FALLBACK_BASENAME: &str = "TikTokLinks";

/// Serialize harvested URLs, one per line in insertion order, with a
/// trailing newline. Captions are placeholders and never exported.
pub fn serialize_links(store: &LinkStore) -> String {
    let mut out = String::new();
    for url in store.urls() {
        out.push_str(url);
        out.push('\n');
    }
    out
}

/// Derive the export file name from the page's primary heading.
///
/// A missing or blank heading is a normal case, not an error; it just means
/// the fallback name.
pub fn export_file_name(heading: Option<&str>) -> String {
    let base = heading
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(FALLBACK_BASENAME);
    format!("{}.txt", sanitize_component(base))
}

/// Replace characters that cannot appear in a single path component.
fn sanitize_component(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// Write the export under `dir`, creating it if needed.
///
/// The file handle lives exactly as long as the write: opened, written,
/// flushed, dropped.
pub fn write_export(dir: &Path, name: &str, text: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let path = dir.join(name);

    let mut file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    file.flush()?;

    info!(path = %path.display(), bytes = text.len(), "export written");
    Ok(path)
}
