use anyhow::{Context as _, Result};
use async_trait::async_trait;
use minijinja::Environment;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;

use crate::transform::{EntryTransform, TransformOutput};

/// How the content file behind a path is exposed to the template as `data`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    #[default]
    None,
    Json,
    Toml,
    Text,
}

/// Renders identifiers with MiniJinja. Each non-empty output line is one entry.
#[derive(Debug, Clone)]
pub struct TemplateTransform {
    source: String,
    data: DataFormat,
    prefix: String,
}

impl TemplateTransform {
    /// Fails early when the template does not compile.
    pub fn new(source: impl Into<String>, data: DataFormat, prefix: Option<String>) -> Result<Self> {
        let source = source.into();
        {
            let mut env = Environment::new();
            env.add_template("tpl", &source)
                .context("invalid entry template")?;
        }

        Ok(Self {
            source,
            data,
            prefix: prefix.unwrap_or_default(),
        })
    }

    async fn load_data(&self, full: &Path) -> Result<serde_json::Value> {
        if self.data == DataFormat::None {
            return Ok(serde_json::Value::Null);
        }

        let text = tokio::fs::read_to_string(full)
            .await
            .with_context(|| format!("failed to read content file {}", full.display()))?;

        let value = match self.data {
            DataFormat::None => serde_json::Value::Null,
            DataFormat::Json => serde_json::from_str(&text)
                .with_context(|| format!("invalid JSON in {}", full.display()))?,
            DataFormat::Toml => toml::from_str(&text)
                .with_context(|| format!("invalid TOML in {}", full.display()))?,
            DataFormat::Text => serde_json::Value::String(text),
        };
        Ok(value)
    }
}

#[async_trait]
impl EntryTransform for TemplateTransform {
    async fn transform(&self, path: &str, root: &Path) -> Result<TransformOutput> {
        let p = Path::new(path);
        let full = root.join(p);
        let data = self.load_data(&full).await?;

        let lossy = |s: Option<&std::ffi::OsStr>| {
            s.map(|x| x.to_string_lossy().to_string()).unwrap_or_default()
        };

        let ctx_json = json!({
            "path": path,
            "root": root.to_string_lossy(),
            "prefix": self.prefix,
            "stem": lossy(p.file_stem()),
            "name": lossy(p.file_name()),
            "ext": lossy(p.extension()),
            "dir": p.parent().map(|d| d.to_string_lossy().to_string()).unwrap_or_default(),
            "data": data,
        });

        let rendered = render_minijinja(&self.source, &ctx_json)
            .with_context(|| format!("render failed for {path}"))?;

        Ok(TransformOutput::Many(
            rendered
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }
}

fn render_minijinja(source: &str, ctx_json: &serde_json::Value) -> Result<String> {
    let mut env = Environment::new();

    // Jinja-style `tojson` filter (string-only for now).
    env.add_filter("tojson", |s: String| -> Result<String, minijinja::Error> {
        serde_json::to_string(&s).map_err(|e| {
            minijinja::Error::new(minijinja::ErrorKind::InvalidOperation, e.to_string())
        })
    });
    env.add_filter("slug", |s: String| -> String { slugify(&s) });

    env.add_template("tpl", source)?;
    let tpl = env.get_template("tpl")?;
    let v = minijinja::value::Value::from_serialize(ctx_json);
    Ok(tpl.render(v)?)
}

/// Lowercase, ASCII alphanumerics kept, everything else collapsed into `-`.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  --Rust   2024-- "), "rust-2024");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn rejects_broken_template() {
        assert!(TemplateTransform::new("{% for x in %}", DataFormat::None, None).is_err());
    }

    #[tokio::test]
    async fn renders_path_parts() {
        let t = TemplateTransform::new(
            "{{ prefix }}{{ stem | slug }}.{{ ext }}",
            DataFormat::None,
            Some("/docs/".to_string()),
        )
        .unwrap();

        let out = t
            .transform("guides/Getting Started.md", Path::new("/site"))
            .await
            .unwrap();
        assert_eq!(out, TransformOutput::Many(vec!["/docs/getting-started.md".to_string()]));
    }

    #[tokio::test]
    async fn json_data_produces_one_entry_per_line() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("authors.json"),
            r#"[{"slug": "ada"}, {"slug": "grace"}]"#,
        )
        .unwrap();

        let t = TemplateTransform::new(
            "{% for a in data %}/authors/{{ a.slug }}\n{% endfor %}",
            DataFormat::Json,
            None,
        )
        .unwrap();

        let out = t.transform("authors.json", dir.path()).await.unwrap();
        assert_eq!(
            out.into_entries(),
            vec!["/authors/ada".to_string(), "/authors/grace".to_string()]
        );
    }

    #[tokio::test]
    async fn toml_data_is_exposed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("site.toml"), "tags = [\"Rust\", \"Web Dev\"]\n").unwrap();

        let t = TemplateTransform::new(
            "{% for t in data.tags %}/tags/{{ t | slug }}\n{% endfor %}",
            DataFormat::Toml,
            None,
        )
        .unwrap();

        let out = t.transform("site.toml", dir.path()).await.unwrap();
        assert_eq!(
            out.into_entries(),
            vec!["/tags/rust".to_string(), "/tags/web-dev".to_string()]
        );
    }

    #[tokio::test]
    async fn missing_content_file_is_an_error() {
        let dir = tempdir().unwrap();
        let t = TemplateTransform::new("{{ data }}", DataFormat::Text, None).unwrap();
        assert!(t.transform("nope.md", dir.path()).await.is_err());
    }
}
