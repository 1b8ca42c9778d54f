//! `file:` source backed by file contents.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::{split_spec, VariableResolver};

/// Resolves `file:PATH` to the file's contents, trailing whitespace trimmed.
///
/// Relative paths are resolved against the base directory, normally the
/// project root.
#[derive(Debug, Clone)]
pub struct FileSource {
    base: PathBuf,
}

impl FileSource {
    /// Create a source resolving relative paths against `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn path_for(&self, address: &str) -> PathBuf {
        let path = Path::new(address);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }
}

#[async_trait]
impl VariableResolver for FileSource {
    async fn resolve(&self, source_spec: &str) -> Result<Value> {
        let address = split_spec(source_spec)
            .map(|(_, address)| address)
            .unwrap_or(source_spec);
        let path = self.path_for(address);

        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Ok(Value::String(content.trim_end().to_string()))
    }
}
