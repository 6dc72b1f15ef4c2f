use std::fmt;

use crate::transform::Transform;

/// Where a spec's input paths come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSource {
    /// Handed to the transform as-is.
    Path(String),
    /// Expanded against the root directory; every matched file is transformed.
    Glob(String),
}

impl fmt::Display for PathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSource::Path(p) | PathSource::Glob(p) => f.write_str(p),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PathSpec {
    pub source: PathSource,
    pub prefix: Option<String>,
    pub transform: Transform,
}

impl PathSpec {
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            source: PathSource::Path(path.into()),
            prefix: None,
            transform: Transform::Default,
        }
    }

    pub fn glob(pattern: impl Into<String>) -> Self {
        Self {
            source: PathSource::Glob(pattern.into()),
            prefix: None,
            transform: Transform::Default,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}
