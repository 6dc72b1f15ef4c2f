//! Text surgery on `svelte.config.js`.
//!
//! The file is executable JS, so it is never parsed. Two regex-located
//! regions are edited and everything else is kept byte-for-byte:
//!
//! 1. the first `entries: [...]` declaration (plus the horizontal whitespace
//!    in front of it and an optional trailing comma) is removed;
//! 2. ` entries: [...],` is inserted right after the first `prerender: {`.
//!
//! Supported format: the array may span lines, its string literals may
//! contain any character including `]`, and it may hold `//` and `/* */`
//! comments. When the array body cannot be tokenized, the declaration ends at
//! the first `]` after the key.

use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    borrow::Cow,
    ops::Range,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::{entries::EntryList, error::PatchError};

static ENTRIES_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)[ \t]*\bentries\s*:\s*\[(?://[^\n]*|/\*.*?\*/|"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|`(?:[^`\\]|\\.)*`|[^\]"'`])*\],?"#,
    )
    .unwrap()
});

static ENTRIES_DECL_LAZY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)[ \t]*\bentries\s*:\s*\[.*?\],?").unwrap());

static PRERENDER_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bprerender\s*:\s*\{").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub text: String,
    /// An existing declaration was removed.
    pub replaced: bool,
    /// A new declaration was inserted.
    pub inserted: bool,
}

/// Span of the first `entries: [...]` declaration.
pub fn find_entries_decl(text: &str) -> Option<Range<usize>> {
    let lazy = ENTRIES_DECL_LAZY.find(text)?.range();
    match ENTRIES_DECL.find(text) {
        Some(m) if m.start() == lazy.start => Some(m.range()),
        _ => Some(lazy),
    }
}

/// Byte offset just past the first `prerender: {`.
pub fn find_prerender_open(text: &str) -> Option<usize> {
    PRERENDER_OPEN.find(text).map(|m| m.end())
}

pub fn strip_entries(text: &str) -> Cow<'_, str> {
    match find_entries_decl(text) {
        Some(span) => {
            let mut out = String::with_capacity(text.len() - span.len());
            out.push_str(&text[..span.start]);
            out.push_str(&text[span.end..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(text),
    }
}

pub fn render_decl(entries: &EntryList) -> String {
    format!(" entries: {},", entries.to_array_literal())
}

/// `None` when the text has no prerender block.
pub fn insert_entries(text: &str, entries: &EntryList) -> Option<String> {
    let at = find_prerender_open(text)?;
    let decl = render_decl(entries);

    let mut out = String::with_capacity(text.len() + decl.len());
    out.push_str(&text[..at]);
    out.push_str(&decl);
    out.push_str(&text[at..]);
    Some(out)
}

pub fn patch_text(text: &str, entries: &EntryList) -> Patched {
    let stripped = strip_entries(text);
    let replaced = matches!(stripped, Cow::Owned(_));

    match insert_entries(&stripped, entries) {
        Some(text) => Patched {
            text,
            replaced,
            inserted: true,
        },
        None => Patched {
            text: stripped.into_owned(),
            replaced,
            inserted: false,
        },
    }
}

pub async fn read_config(path: &Path) -> Result<String, PatchError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PatchError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Read, patch and atomically replace the file at `path`.
pub async fn patch_file(path: &Path, entries: &EntryList) -> Result<Patched, PatchError> {
    let original = read_config(path).await?;
    let patched = patch_text(&original, entries);

    if !patched.inserted {
        warn!(path = %path.display(), "no `prerender: {{` block found; entries were not inserted");
    }

    if patched.text == original {
        debug!(path = %path.display(), "config already up to date");
        return Ok(patched);
    }

    write_atomic(path, &patched.text)
        .await
        .map_err(|source| PatchError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(patched)
}

/// Sibling temp file + rename, so the target is either fully replaced or untouched.
async fn write_atomic(path: &Path, text: &str) -> std::io::Result<()> {
    let tmp = temp_path(path);

    let result = async {
        tokio::fs::write(&tmp, text).await?;
        if let Ok(meta) = tokio::fs::metadata(path).await {
            tokio::fs::set_permissions(&tmp, meta.permissions()).await?;
        }
        tokio::fs::rename(&tmp, path).await
    }
    .await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    result
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "config".to_string());
    path.with_file_name(format!(".{name}.entrygen-tmp"))
}
