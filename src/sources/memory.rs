//! Fixed table of source specs.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::VariableResolver;

/// Resolves exact source specs from a fixed table.
///
/// Used for `--set SPEC=VALUE` pins and in tests.
///
/// # Example
///
/// ```
/// use easyenv::sources::StaticSource;
/// use serde_json::json;
///
/// let source = StaticSource::new().with_value("ssm:apiKey", json!("k-123"));
/// assert_eq!(source.get("ssm:apiKey"), Some(&json!("k-123")));
/// assert_eq!(source.get("ssm:other"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    values: HashMap<String, Value>,
}

impl StaticSource {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value for an exact source spec.
    pub fn with_value(mut self, source_spec: impl Into<String>, value: Value) -> Self {
        self.values.insert(source_spec.into(), value);
        self
    }

    /// Parse `SPEC=VALUE` assignments. The value is read as JSON when it
    /// parses as JSON, otherwise kept as a plain string.
    ///
    /// The split happens at the first `=`, so values may contain `=`.
    pub fn from_assignments<'a>(assignments: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut source = Self::new();
        for assignment in assignments {
            let (spec, raw) = assignment
                .split_once('=')
                .ok_or_else(|| anyhow!("expected SPEC=VALUE, got '{}'", assignment))?;
            let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
            source.values.insert(spec.to_string(), value);
        }
        Ok(source)
    }

    /// Look up an exact source spec.
    pub fn get(&self, source_spec: &str) -> Option<&Value> {
        self.values.get(source_spec)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait]
impl VariableResolver for StaticSource {
    async fn resolve(&self, source_spec: &str) -> Result<Value> {
        self.get(source_spec)
            .cloned()
            .ok_or_else(|| anyhow!("no value pinned for '{}'", source_spec))
    }
}
