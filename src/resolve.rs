use anyhow::{bail, Result};
use std::path::Path;

use crate::context::ContextEnv;

/// Expands `{token}`s in path-like run-config values.
///
/// Known tokens: `home`, `cwd`, `config_dir`, `root` (once known) and
/// `env.NAME`.
pub struct Resolver<'a> {
    pub ctx: &'a ContextEnv,
    pub root: Option<&'a Path>,
}

impl<'a> Resolver<'a> {
    pub fn new(ctx: &'a ContextEnv) -> Self {
        Self { ctx, root: None }
    }

    pub fn with_root(mut self, root: &'a Path) -> Self {
        self.root = Some(root);
        self
    }

    pub fn resolve(&self, input: &str) -> Result<String> {
        // Fast path
        if !input.contains('{') {
            return Ok(input.to_string());
        }

        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                bail!("unclosed token in string: {input}");
            };

            let token = &after[..close];
            let repl = self
                .token_value(token)
                .ok_or_else(|| anyhow::anyhow!("unknown token: {{{token}}} in: {input}"))?;

            out.push_str(&repl);
            rest = &after[close + 1..];
        }
        out.push_str(rest);

        Ok(out)
    }

    fn token_value(&self, token: &str) -> Option<String> {
        if let Some(name) = token.strip_prefix("env.") {
            return self.ctx.var(name).map(str::to_string);
        }

        match token {
            "home" => Some(self.ctx.home().to_string_lossy().to_string()),
            "cwd" => Some(self.ctx.cwd().to_string_lossy().to_string()),
            "config_dir" => self
                .ctx
                .config_dir()
                .map(|p| p.to_string_lossy().to_string()),
            "root" => self.root.map(|p| p.to_string_lossy().to_string()),
            _ => None,
        }
    }
}
