use anyhow::{bail, Context as _, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{
    context::ContextEnv,
    pathspec::{PathSource, PathSpec},
    plugin::PluginOptions,
    resolve::Resolver,
    templates::{DataFormat, TemplateTransform},
    transform::Transform,
};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub entrygen: EntrygenMeta,

    #[serde(default)]
    pub paths: Vec<PathEntry>,
}

impl Config {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid run config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(text)?;
        if cfg.entrygen.schema_version != SCHEMA_VERSION {
            bail!(
                "unsupported schema_version {} (expected {SCHEMA_VERSION})",
                cfg.entrygen.schema_version
            );
        }
        Ok(cfg)
    }

    /// Root precedence: `entrygen.root` (relative to the config file), then
    /// `host_root`. `None` lets the plugin fall back to the working directory.
    pub fn root(&self, ctx: &ContextEnv, host_root: Option<&Path>) -> Result<Option<PathBuf>> {
        let Some(raw) = self.entrygen.root.as_deref() else {
            return Ok(host_root.map(Path::to_path_buf));
        };

        let resolved = Resolver::new(ctx)
            .resolve(raw)
            .with_context(|| format!("failed to resolve entrygen.root: {raw}"))?;

        let p = PathBuf::from(resolved);
        if p.is_absolute() {
            return Ok(Some(p));
        }
        let base = ctx.config_dir().unwrap_or(ctx.cwd());
        Ok(Some(base.join(p)))
    }

    pub fn into_options(self, ctx: &ContextEnv, host_root: Option<&Path>) -> Result<PluginOptions> {
        let root = self.root(ctx, host_root)?;
        let root_for_tokens = root.clone().unwrap_or_else(|| ctx.cwd().to_path_buf());
        let r = Resolver::new(ctx).with_root(&root_for_tokens);
        let config_base = ctx.config_dir().unwrap_or(ctx.cwd());

        let svelte_config_path = match self.entrygen.svelte_config.as_deref() {
            Some(raw) => Some(PathBuf::from(r.resolve(raw).with_context(|| {
                format!("failed to resolve entrygen.svelte_config: {raw}")
            })?)),
            None => None,
        };

        let mut paths = Vec::with_capacity(self.paths.len());
        for (idx, entry) in self.paths.into_iter().enumerate() {
            if !entry.enabled {
                continue;
            }
            let spec = entry
                .into_spec(&r, config_base)
                .with_context(|| format!("paths[{idx}]: invalid path entry"))?;
            paths.push(spec);
        }

        Ok(PluginOptions {
            paths,
            root,
            svelte_config_path,
            dry_run: false,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct EntrygenMeta {
    pub schema_version: u32,

    #[serde(default)]
    pub root: Option<String>,

    #[serde(default)]
    pub svelte_config: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathEntry {
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub glob: Option<String>,

    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub transform: TransformConfig,
}

fn default_true() -> bool {
    true
}

impl PathEntry {
    /// A relative `template_file` is read from `config_base`.
    fn into_spec(self, r: &Resolver<'_>, config_base: &Path) -> Result<PathSpec> {
        let source = match (self.path, self.glob) {
            (Some(p), None) => PathSource::Path(r.resolve(&p)?),
            (None, Some(g)) => PathSource::Glob(r.resolve(&g)?),
            (Some(_), Some(_)) => bail!("set either `path` or `glob`, not both"),
            (None, None) => bail!("one of `path` or `glob` is required"),
        };

        let transform = match self.transform {
            TransformConfig::Default => Transform::Default,
            TransformConfig::Template {
                template,
                template_file,
                data,
            } => {
                let source = match (template, template_file) {
                    (Some(t), None) => t,
                    (None, Some(f)) => {
                        let f = config_base.join(r.resolve(&f)?);
                        std::fs::read_to_string(&f).with_context(|| {
                            format!("failed to read template file: {}", f.display())
                        })?
                    }
                    (Some(_), Some(_)) => bail!("set either `template` or `template_file`, not both"),
                    (None, None) => bail!("template transform needs `template` or `template_file`"),
                };
                Transform::custom(TemplateTransform::new(source, data, self.prefix.clone())?)
            }
        };

        Ok(PathSpec {
            source,
            prefix: self.prefix,
            transform,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformConfig {
    #[default]
    Default,
    Template {
        #[serde(default)]
        template: Option<String>,
        #[serde(default)]
        template_file: Option<String>,
        #[serde(default)]
        data: DataFormat,
    },
}
