//! Variable sources backing deferred markers.
//!
//! A deferred marker such as `env:API_KEY` or `ssm:apiKeyOnSsm` is handed to
//! a [`VariableResolver`]. The engine treats the resolver as opaque; this
//! module supplies the implementations the CLI uses:
//!
//! - [`EnvSource`] - `env:NAME` from dotenv files and the process environment
//! - [`OptionSource`] - `opt:NAME` from command-line options
//! - [`FileSource`] - `file:PATH` from file contents
//! - [`StaticSource`] - exact source specs from a fixed table
//! - [`SourceRouter`] - dispatches a spec to a source by its prefix
//!
//! # Example
//!
//! ```
//! use easyenv::sources::{OptionSource, SourceRouter, VariableResolver};
//! use std::sync::Arc;
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let router = SourceRouter::new()
//!     .with_source("opt", Arc::new(OptionSource::new().with_option("stage", "prod")));
//!
//! let stage = runtime.block_on(router.resolve("opt:stage")).unwrap();
//! assert_eq!(stage, "prod");
//! ```

pub mod env;
pub mod file;
pub mod memory;
pub mod options;

pub use env::EnvSource;
pub use file::FileSource;
pub use memory::StaticSource;
pub use options::OptionSource;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Looks up the value behind a source spec.
///
/// Implementations must be safe to call concurrently for distinct specs.
#[async_trait]
pub trait VariableResolver: Send + Sync {
    /// Resolve `source_spec` to a value.
    async fn resolve(&self, source_spec: &str) -> Result<Value>;
}

/// Split a source spec into its prefix and address at the first `:`.
///
/// # Example
///
/// ```
/// use easyenv::sources::split_spec;
///
/// assert_eq!(split_spec("env:API_KEY"), Some(("env", "API_KEY")));
/// assert_eq!(split_spec("file:/run/secrets/a:b"), Some(("file", "/run/secrets/a:b")));
/// assert_eq!(split_spec("plain"), None);
/// ```
pub fn split_spec(source_spec: &str) -> Option<(&str, &str)> {
    source_spec.split_once(':')
}

/// Dispatches source specs to registered sources by prefix.
///
/// An optional override table is consulted first, so exact specs can be
/// pinned (for example from `--set ssm:apiKey=...`) regardless of prefix.
#[derive(Default, Clone)]
pub struct SourceRouter {
    sources: HashMap<String, Arc<dyn VariableResolver>>,
    overrides: Option<Arc<StaticSource>>,
}

impl std::fmt::Debug for SourceRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRouter")
            .field("prefixes", &self.prefixes())
            .field("overrides", &self.overrides)
            .finish()
    }
}

impl SourceRouter {
    /// Create a router with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source` for specs starting with `prefix:`.
    pub fn with_source(mut self, prefix: &str, source: Arc<dyn VariableResolver>) -> Self {
        self.sources.insert(prefix.to_string(), source);
        self
    }

    /// Consult `overrides` before any prefix source.
    pub fn with_overrides(mut self, overrides: StaticSource) -> Self {
        self.overrides = Some(Arc::new(overrides));
        self
    }

    /// Registered prefixes, sorted.
    pub fn prefixes(&self) -> Vec<&str> {
        let mut prefixes: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        prefixes.sort_unstable();
        prefixes
    }
}

#[async_trait]
impl VariableResolver for SourceRouter {
    async fn resolve(&self, source_spec: &str) -> Result<Value> {
        if let Some(value) = self.overrides.as_ref().and_then(|o| o.get(source_spec)) {
            tracing::debug!(source_spec, "resolved from override table");
            return Ok(value.clone());
        }

        let (prefix, _) = split_spec(source_spec)
            .ok_or_else(|| anyhow!("'{}' is not a source spec (expected prefix:address)", source_spec))?;

        let source = self.sources.get(prefix).ok_or_else(|| {
            anyhow!(
                "no variable source registered for prefix '{}' (available: {})",
                prefix,
                self.prefixes().join(", ")
            )
        })?;

        tracing::debug!(source_spec, prefix, "dispatching lookup");
        source.resolve(source_spec).await
    }
}
