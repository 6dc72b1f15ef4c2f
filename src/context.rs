use anyhow::{bail, Context as _, Result};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub const RUN_CONFIG_FILE: &str = "entrygen.toml";
pub const RUN_CONFIG_ENV: &str = "ENTRYGEN_CONFIG";

/// Process-level facts the run config is resolved against.
#[derive(Debug, Clone)]
pub struct ContextEnv {
    vars: BTreeMap<String, String>,
    home: PathBuf,
    cwd: PathBuf,

    config_path: Option<PathBuf>,
    config_dir: Option<PathBuf>,
}

impl ContextEnv {
    pub fn new() -> Result<Self> {
        let vars: BTreeMap<String, String> = std::env::vars().collect();

        let home = dirs::home_dir()
            .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
            .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
            .context("could not determine home directory")?;

        let cwd = std::env::current_dir().context("could not determine working directory")?;

        Ok(Self::from_parts(vars, home, cwd))
    }

    pub fn from_parts(vars: BTreeMap<String, String>, home: PathBuf, cwd: PathBuf) -> Self {
        Self {
            vars,
            home,
            cwd,
            config_path: None,
            config_dir: None,
        }
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.set_config_path(path);
        self
    }

    // ---------- public getters ----------

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    pub fn default_config_path(&self) -> PathBuf {
        self.cwd.join(RUN_CONFIG_FILE)
    }

    /// Relative paths are taken from the working directory.
    pub fn absolutize(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.cwd.join(p)
        }
    }

    // ---------- locating the run config ----------

    /// Run config precedence:
    /// 1) CLI --config
    /// 2) ENTRYGEN_CONFIG
    /// 3) ./entrygen.toml
    ///
    /// The file must exist in every case.
    pub fn locate_config(&mut self, cli_config: Option<&Path>) -> Result<PathBuf> {
        if let Some(p) = cli_config {
            let p = self.absolutize(p);
            if !p.exists() {
                bail!("--config was provided but file does not exist: {}", p.display());
            }
            self.set_config_path(p.clone());
            return Ok(p);
        }

        if let Some(p) = self.get_env_path(RUN_CONFIG_ENV) {
            let p = self.absolutize(&p);
            if !p.exists() {
                bail!(
                    "{RUN_CONFIG_ENV} is set but file does not exist: {}",
                    p.display()
                );
            }
            self.set_config_path(p.clone());
            return Ok(p);
        }

        let p = self.default_config_path();
        if !p.exists() {
            bail!(
                "no {RUN_CONFIG_FILE} found at {} (run `entrygen init` to create one)",
                p.display()
            );
        }
        self.set_config_path(p.clone());
        Ok(p)
    }

    fn set_config_path(&mut self, path: PathBuf) {
        self.config_dir = path.parent().map(Path::to_path_buf);
        self.config_path = Some(path);
    }

    fn get_env_path(&self, key: &str) -> Option<PathBuf> {
        self.vars
            .get(key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }
}
