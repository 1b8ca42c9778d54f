//! `env:` source backed by dotenv files and the process environment.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::{split_spec, VariableResolver};
use crate::config::EnvFileParser;

/// Resolves `env:NAME`.
///
/// Values loaded from dotenv files are consulted first, in load order with
/// later files winning; the process environment fills in the rest.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    file_vars: HashMap<String, String>,
    use_process_env: bool,
}

impl EnvSource {
    /// Create a source reading only the process environment.
    pub fn new() -> Self {
        Self {
            file_vars: HashMap::new(),
            use_process_env: true,
        }
    }

    /// Create a source from fixed variables, ignoring the process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            file_vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            use_process_env: false,
        }
    }

    /// Layer variables from a dotenv file, if it exists.
    pub fn with_env_file(mut self, path: &Path) -> Result<Self> {
        let vars = EnvFileParser::load_optional(path)?;
        if !vars.is_empty() {
            tracing::debug!(path = %path.display(), count = vars.len(), "loaded env file");
        }
        self.file_vars.extend(vars);
        Ok(self)
    }

    /// Look up a variable.
    pub fn get(&self, name: &str) -> Option<String> {
        self.file_vars.get(name).cloned().or_else(|| {
            if self.use_process_env {
                std::env::var(name).ok()
            } else {
                None
            }
        })
    }
}

#[async_trait]
impl VariableResolver for EnvSource {
    async fn resolve(&self, source_spec: &str) -> Result<Value> {
        let name = split_spec(source_spec)
            .map(|(_, name)| name)
            .unwrap_or(source_spec);

        self.get(name)
            .map(Value::String)
            .ok_or_else(|| anyhow!("environment variable '{}' is not set", name))
    }
}
