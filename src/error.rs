//! Error types for entry resolution, config patching and the plugin hook.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure while producing the contribution of a single path spec.
///
/// These never abort a run: the resolver logs them and the path spec contributes
/// no entries.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to expand glob '{pattern}': {source}")]
    Expand {
        pattern: String,
        #[source]
        source: glob::GlobError,
    },

    #[error("glob expansion for '{pattern}' did not complete: {reason}")]
    Interrupted { pattern: String, reason: String },

    #[error("transform failed for '{path}': {cause:#}")]
    Transform { path: String, cause: anyhow::Error },
}

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PatchError {
    pub fn path(&self) -> &PathBuf {
        match self {
            PatchError::Read { path, .. } | PatchError::Write { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum HookError {
    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error("could not determine the working directory")]
    WorkingDir(#[source] io::Error),
}
