//! Configuration schema definitions for easyenv.
//!
//! This module contains the struct definitions that map to the
//! `.easyenv/config.yml` file format.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::environment::{EnvMatcher, EnvironmentSetup};
use crate::error::Result;
use crate::snapshot::SnapshotFormat;

/// Root configuration structure for `.easyenv/config.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EasyEnvConfig {
    /// Explicit environment name; disables inference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    /// Ordered rules mapping the raw stage value to an environment name
    #[serde(alias = "envMatchers", skip_serializing_if = "Vec::is_empty")]
    pub env_matchers: Vec<EnvMatcherConfig>,

    /// Snapshot output settings
    pub snapshot: SnapshotSettings,

    /// Configuration keys, each mapping environment names to raw values
    #[serde(alias = "envResolutions")]
    pub env_resolutions: Map<String, Value>,
}

/// One `(pattern, env)` matcher rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvMatcherConfig {
    /// Regular expression matched against the whole raw stage value
    pub pattern: String,

    /// Environment name used when the pattern matches
    pub env: String,
}

/// Where and how the snapshot is written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSettings {
    /// Output format
    pub format: SnapshotFormat,

    /// Output path (relative to project root)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl SnapshotSettings {
    /// The configured path, or the format's default, under `project_root`.
    pub fn resolved_path(&self, project_root: &Path) -> PathBuf {
        let path = self
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.format.default_path()));
        project_root.join(path)
    }
}

impl EasyEnvConfig {
    /// Replace the explicit environment name.
    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    /// Compile the configured matcher rules, in order.
    pub fn matcher(&self) -> Result<EnvMatcher> {
        EnvMatcher::from_pairs(
            self.env_matchers
                .iter()
                .map(|rule| (rule.pattern.as_str(), rule.env.clone())),
        )
    }

    /// How the engine should establish the environment name.
    ///
    /// An explicit `env` wins; matchers are only compiled when inference is
    /// needed.
    pub fn environment_setup(&self) -> Result<EnvironmentSetup> {
        match &self.env {
            Some(env) => Ok(EnvironmentSetup::Explicit(env.clone())),
            None => Ok(EnvironmentSetup::Inferred(self.matcher()?)),
        }
    }
}
