//! Entry resolution: turns declared path specs into the prerender entry list.
//!
//! Specs are resolved concurrently but joined in declaration order, so the
//! list never depends on which transform finishes first. A failing spec is
//! logged and contributes nothing; it never fails the run.

use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{
    error::ResolutionError,
    pathspec::{PathSource, PathSpec},
};

/// Catch-all prerender directive. Always the first entry and never repeated.
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryList(Vec<String>);

impl Default for EntryList {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryList {
    pub fn new() -> Self {
        Self(vec![WILDCARD.to_string()])
    }

    /// Appends contributions, dropping empty ones and extra wildcards.
    pub fn extend<I: IntoIterator<Item = String>>(&mut self, entries: I) {
        self.0
            .extend(entries.into_iter().filter(|e| !e.is_empty() && e != WILDCARD));
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true: the wildcard is always present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Each entry as a double-quoted string literal.
    pub fn quoted(&self) -> Vec<String> {
        self.0.iter().map(|e| quote(e)).collect()
    }

    /// `["*","/blog/a"]`
    pub fn to_array_literal(&self) -> String {
        format!("[{}]", self.quoted().join(","))
    }
}

impl<S: Into<String>> FromIterator<S> for EntryList {
    /// Builds a list behind the wildcard.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter.into_iter().map(Into::into));
        list
    }
}

fn quote(entry: &str) -> String {
    serde_json::to_string(entry).unwrap_or_else(|_| format!("\"{entry}\""))
}

/// Outcome for one path spec.
#[derive(Debug)]
pub struct SpecReport {
    pub label: String,
    pub contributed: usize,
    pub failure: Option<ResolutionError>,
}

#[derive(Debug)]
pub struct Resolution {
    pub entries: EntryList,
    pub specs: Vec<SpecReport>,
}

impl Resolution {
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ResolutionError)> {
        self.specs
            .iter()
            .filter_map(|s| s.failure.as_ref().map(|f| (s.label.as_str(), f)))
    }
}

pub async fn resolve_entries(specs: &[PathSpec], root: &Path) -> Resolution {
    let results = join_all(specs.iter().map(|spec| contribution(spec, root))).await;

    let mut entries = EntryList::new();
    let mut reports = Vec::with_capacity(specs.len());

    for (spec, result) in specs.iter().zip(results) {
        let label = spec.source.to_string();
        match result {
            Ok(found) => {
                let before = entries.len();
                entries.extend(found);
                reports.push(SpecReport {
                    label,
                    contributed: entries.len() - before,
                    failure: None,
                });
            }
            Err(e) => {
                warn!(path = %label, error = %e, "skipping path spec");
                reports.push(SpecReport {
                    label,
                    contributed: 0,
                    failure: Some(e),
                });
            }
        }
    }

    Resolution {
        entries,
        specs: reports,
    }
}

async fn contribution(spec: &PathSpec, root: &Path) -> Result<Vec<String>, ResolutionError> {
    info!(path = %spec.source, "running transform");

    let inputs = match &spec.source {
        PathSource::Path(p) => vec![p.clone()],
        PathSource::Glob(pattern) => expand_glob(pattern, root).await?,
    };
    debug!(path = %spec.source, inputs = inputs.len(), "transform inputs");

    let prefix = spec.prefix.as_deref();
    let results = join_all(
        inputs
            .iter()
            .map(|input| spec.transform.apply(input, root, prefix)),
    )
    .await;

    let mut out = Vec::new();
    for (input, result) in inputs.iter().zip(results) {
        let produced = result.map_err(|cause| ResolutionError::Transform {
            path: input.clone(),
            cause,
        })?;
        out.extend(produced);
    }
    Ok(out)
}

async fn expand_glob(pattern: &str, root: &Path) -> Result<Vec<String>, ResolutionError> {
    let owned_pattern = pattern.to_string();
    let owned_root = root.to_path_buf();

    tokio::task::spawn_blocking(move || glob_files(&owned_pattern, &owned_root))
        .await
        .map_err(|e| ResolutionError::Interrupted {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?
}

/// Matched regular files, relative to `root` when they live under it.
fn glob_files(pattern: &str, root: &Path) -> Result<Vec<String>, ResolutionError> {
    let full = if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
        PathBuf::from(escaped_root)
            .join(pattern)
            .to_string_lossy()
            .to_string()
    };

    let paths = glob::glob(&full).map_err(|source| ResolutionError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut out = Vec::new();
    for entry in paths {
        let path = entry.map_err(|source| ResolutionError::Expand {
            pattern: pattern.to_string(),
            source,
        })?;

        if !path.is_file() {
            continue;
        }

        let shown = path.strip_prefix(root).unwrap_or(&path);
        out.push(shown.to_string_lossy().to_string());
    }

    Ok(out)
}
