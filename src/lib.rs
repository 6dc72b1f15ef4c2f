pub mod cli;
pub mod config;
pub mod context;
pub mod entries;
pub mod error;
pub mod init;
pub mod patch;
pub mod pathspec;
pub mod plugin;
pub mod report;
pub mod resolve;
pub mod templates;
pub mod transform;

// Convenience re-exports
pub use config::Config;
pub use context::ContextEnv;
pub use entries::{resolve_entries, EntryList, Resolution, WILDCARD};
pub use error::{HookError, PatchError, ResolutionError};
pub use patch::{patch_file, patch_text, Patched};
pub use pathspec::{PathSource, PathSpec};
pub use plugin::{EntriesPlugin, HookOutcome, PluginOptions, RunState};
pub use templates::{DataFormat, TemplateTransform};
pub use transform::{EntryTransform, Transform, TransformOutput};
