// src/init.rs

use anyhow::{Context as _, Result};
use std::{fs, path::Path};
use tracing::info;

pub const DEFAULT_CONFIG: &str = include_str!("../assets/default_config.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    Overwritten,
    AlreadyExists,
}

/// Write the starter config only if missing (or when forced).
pub fn run(path: &Path, force: bool) -> Result<InitOutcome> {
    let existed = path.exists();
    if existed && !force {
        info!(path = %path.display(), "config already exists");
        return Ok(InitOutcome::AlreadyExists);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote starter config");

    Ok(if existed {
        InitOutcome::Overwritten
    } else {
        InitOutcome::Created
    })
}
