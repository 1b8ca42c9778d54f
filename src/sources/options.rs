//! `opt:` source backed by command-line options.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::{split_spec, VariableResolver};

/// Resolves `opt:NAME` from options supplied on the command line.
///
/// The environment bootstrap reads `opt:stage`, so `--stage prod` lands here.
#[derive(Debug, Clone, Default)]
pub struct OptionSource {
    options: HashMap<String, String>,
}

impl OptionSource {
    /// Create a source with no options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Add every `(name, value)` pair.
    pub fn with_options<I, K, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.options
            .extend(options.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Look up an option by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }
}

#[async_trait]
impl VariableResolver for OptionSource {
    async fn resolve(&self, source_spec: &str) -> Result<Value> {
        let name = split_spec(source_spec)
            .map(|(_, name)| name)
            .unwrap_or(source_spec);

        self.get(name)
            .map(|value| Value::String(value.to_string()))
            .ok_or_else(|| anyhow!("option '{}' was not provided", name))
    }
}
