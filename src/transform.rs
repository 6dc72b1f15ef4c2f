use anyhow::Result;
use async_trait::async_trait;
use std::{fmt, path::Path, sync::Arc};

/// What a transform hands back for one input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutput {
    One(String),
    Many(Vec<String>),
}

impl TransformOutput {
    /// Flatten into identifiers, dropping empty ones.
    pub fn into_entries(self) -> Vec<String> {
        match self {
            TransformOutput::One(s) => {
                if s.is_empty() {
                    vec![]
                } else {
                    vec![s]
                }
            }
            TransformOutput::Many(v) => v.into_iter().filter(|s| !s.is_empty()).collect(),
        }
    }
}

impl From<String> for TransformOutput {
    fn from(s: String) -> Self {
        TransformOutput::One(s)
    }
}

impl From<&str> for TransformOutput {
    fn from(s: &str) -> Self {
        TransformOutput::One(s.to_string())
    }
}

impl From<Vec<String>> for TransformOutput {
    fn from(v: Vec<String>) -> Self {
        TransformOutput::Many(v)
    }
}

/// Caller-supplied mapping from `(path, root)` to identifiers.
///
/// Implementations may suspend, e.g. to read the content file behind `path`.
#[async_trait]
pub trait EntryTransform: Send + Sync {
    async fn transform(&self, path: &str, root: &Path) -> Result<TransformOutput>;
}

struct FnTransform<F>(F);

#[async_trait]
impl<F> EntryTransform for FnTransform<F>
where
    F: Fn(&str, &Path) -> Result<TransformOutput> + Send + Sync,
{
    async fn transform(&self, path: &str, root: &Path) -> Result<TransformOutput> {
        (self.0)(path, root)
    }
}

#[derive(Clone, Default)]
pub enum Transform {
    /// Base name without extension, behind the path spec's prefix.
    #[default]
    Default,
    Custom(Arc<dyn EntryTransform>),
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Default => f.write_str("Default"),
            Transform::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Transform {
    pub fn custom<T: EntryTransform + 'static>(t: T) -> Self {
        Transform::Custom(Arc::new(t))
    }

    /// Wrap a synchronous closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str, &Path) -> Result<TransformOutput> + Send + Sync + 'static,
    {
        Transform::Custom(Arc::new(FnTransform(f)))
    }

    pub async fn apply(&self, path: &str, root: &Path, prefix: Option<&str>) -> Result<Vec<String>> {
        match self {
            Transform::Default => Ok(default_entry(path, prefix.unwrap_or_default())
                .into_iter()
                .collect()),
            Transform::Custom(t) => Ok(t.transform(path, root).await?.into_entries()),
        }
    }
}

/// `posts/hello.md` + `/blog/` -> `/blog/hello`. `None` when there is no base name.
pub fn default_entry(path: &str, prefix: &str) -> Option<String> {
    let stem = Path::new(path).file_stem()?.to_string_lossy();
    if stem.is_empty() {
        return None;
    }
    Some(format!("{prefix}{stem}"))
}
