//! Loaded project state shared by the resolving commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;

use crate::cli::args::ResolutionArgs;
use crate::config::{load_config, validate, EasyEnvConfig};
use crate::diagnostics::Reporter;
use crate::error::Result;
use crate::resolution::ResolutionEngine;
use crate::sources::{EnvSource, FileSource, OptionSource, SourceRouter, StaticSource};

/// A project root with its loaded, validated configuration.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    project_root: PathBuf,
    config: EasyEnvConfig,
}

impl ProjectContext {
    /// Load and validate the project's configuration.
    pub fn load(project_root: &Path, config_override: Option<&Path>) -> Result<Self> {
        let config = load_config(project_root, config_override)?;
        validate(&config)?;
        Ok(Self::new(project_root, config))
    }

    /// Wrap an already loaded configuration.
    pub fn new(project_root: &Path, config: EasyEnvConfig) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config,
        }
    }

    /// The project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// The loaded configuration.
    pub fn config(&self) -> &EasyEnvConfig {
        &self.config
    }

    /// Build the variable sources described by `args`.
    ///
    /// `env:` reads the process environment under the given dotenv files,
    /// `opt:` reads `--stage` and `--opt`, `file:` reads files under the
    /// project root, and `--set` pins override everything.
    pub fn router(&self, args: &ResolutionArgs) -> Result<SourceRouter> {
        let mut options = OptionSource::new().with_options(parse_options(&args.options)?);
        if let Some(stage) = &args.stage {
            options = options.with_option("stage", stage.clone());
        }

        let mut env = EnvSource::new();
        for file in &args.env_files {
            env = env.with_env_file(&self.project_root.join(file))?;
        }

        let overrides = StaticSource::from_assignments(args.pins.iter().map(String::as_str))?;

        Ok(SourceRouter::new()
            .with_source("env", Arc::new(env))
            .with_source("opt", Arc::new(options))
            .with_source("file", Arc::new(FileSource::new(&self.project_root)))
            .with_overrides(overrides))
    }

    /// Build an engine over the configuration, honoring `--env`.
    pub fn engine(
        &self,
        args: &ResolutionArgs,
        reporter: Arc<dyn Reporter>,
    ) -> Result<ResolutionEngine> {
        let config = match &args.env {
            Some(env) => self.config.clone().with_env(env.clone()),
            None => self.config.clone(),
        };
        ResolutionEngine::from_config(&config, Arc::new(self.router(args)?), reporter)
    }
}

fn parse_options(options: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    options
        .iter()
        .map(|option| {
            option
                .split_once('=')
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .ok_or_else(|| anyhow!("expected NAME=VALUE for --opt, got '{}'", option))
        })
        .collect()
}
