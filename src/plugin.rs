//! The configuration-phase hook a host build tool calls before building.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::{
    entries::{resolve_entries, Resolution},
    error::HookError,
    patch::{self, Patched},
    pathspec::PathSpec,
};

pub const PLUGIN_NAME: &str = "entrygen";
pub const SVELTE_CONFIG_FILE: &str = "svelte.config.js";

#[derive(Debug, Clone, Default)]
pub struct PluginOptions {
    pub paths: Vec<PathSpec>,
    /// Wins over the host's root.
    pub root: Option<PathBuf>,
    /// Relative paths are taken from the root. Defaults to `<root>/svelte.config.js`.
    pub svelte_config_path: Option<PathBuf>,
    /// Compute the patched text without writing it.
    pub dry_run: bool,
}

/// Hosts may call the hook several times per process (one per environment);
/// only the first call does the work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Pending,
    Completed,
}

#[derive(Debug)]
pub enum HookOutcome {
    Skipped,
    NoPaths,
    Patched {
        config_path: PathBuf,
        resolution: Resolution,
        patched: Patched,
    },
}

#[derive(Debug)]
pub struct EntriesPlugin {
    options: PluginOptions,
    state: RunState,
}

impl EntriesPlugin {
    pub fn new(options: PluginOptions) -> Self {
        Self {
            options,
            state: RunState::Pending,
        }
    }

    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    /// Root precedence: options, then the host's root, then the working directory.
    pub fn root_dir(&self, host_root: Option<&Path>) -> Result<PathBuf, HookError> {
        if let Some(r) = &self.options.root {
            return Ok(r.clone());
        }
        match host_root {
            Some(r) => Ok(r.to_path_buf()),
            None => std::env::current_dir().map_err(HookError::WorkingDir),
        }
    }

    pub fn config_path(&self, root: &Path) -> PathBuf {
        match &self.options.svelte_config_path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => root.join(p),
            None => root.join(SVELTE_CONFIG_FILE),
        }
    }

    pub async fn configure(&mut self, host_root: Option<&Path>) -> Result<HookOutcome, HookError> {
        if self.state == RunState::Completed {
            return Ok(HookOutcome::Skipped);
        }

        if self.options.paths.is_empty() {
            self.state = RunState::Completed;
            return Ok(HookOutcome::NoPaths);
        }

        let root = self.root_dir(host_root)?;
        let config_path = self.config_path(&root);

        let resolution = resolve_entries(&self.options.paths, &root).await;
        info!(
            entries = resolution.entries.len(),
            failed = resolution.failures().count(),
            "resolved prerender entries"
        );

        let patched = if self.options.dry_run {
            let original = patch::read_config(&config_path).await?;
            patch::patch_text(&original, &resolution.entries)
        } else {
            patch::patch_file(&config_path, &resolution.entries).await?
        };

        info!(path = %config_path.display(), dry_run = self.options.dry_run, "patched prerender entries");
        self.state = RunState::Completed;

        Ok(HookOutcome::Patched {
            config_path,
            resolution,
            patched,
        })
    }
}
