//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use super::context::ProjectContext;
use crate::cli::args::{Cli, Commands};
use crate::diagnostics::{ConsoleReporter, Reporter};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
#[async_trait]
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    reporter: Arc<dyn Reporter>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            config_override: None,
            reporter: Arc::new(ConsoleReporter::new()),
        }
    }

    /// Load this config file instead of discovering one.
    pub fn with_config(mut self, config: Option<PathBuf>) -> Self {
        self.config_override = config;
        self
    }

    /// Send resolution diagnostics to `reporter`.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn context(&self) -> Result<ProjectContext> {
        ProjectContext::load(&self.project_root, self.config_override.as_deref())
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub async fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Resolve(args) => {
                let cmd = super::resolve::ResolveCommand::new(
                    self.context()?,
                    args.clone(),
                    Arc::clone(&self.reporter),
                );
                cmd.execute(ui).await
            }
            Commands::Snapshot(args) => {
                let cmd = super::snapshot::SnapshotCommand::new(
                    self.context()?,
                    args.clone(),
                    Arc::clone(&self.reporter),
                );
                cmd.execute(ui).await
            }
            Commands::Env(args) => {
                let cmd = super::env::EnvCommand::new(
                    self.context()?,
                    args.clone(),
                    Arc::clone(&self.reporter),
                );
                cmd.execute(ui).await
            }
            Commands::List(args) => {
                let cmd = super::list::ListCommand::new(self.context()?, args.clone());
                cmd.execute(ui).await
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui).await
            }
        }
    }
}
