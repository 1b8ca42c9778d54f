//! Shell completions generation.
//!
//! The `easyenv completions` command generates shell completion scripts.

use async_trait::async_trait;
use clap::CommandFactory;

use super::dispatcher::{Command, CommandResult};
use crate::cli::args::{Cli, CompletionsArgs};
use crate::ui::UserInterface;

/// The completions command implementation.
pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    /// Create a new completions command.
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }
}

#[async_trait]
impl Command for CompletionsCommand {
    async fn execute(&self, _ui: &mut dyn UserInterface) -> crate::error::Result<CommandResult> {
        let mut cmd = Cli::command();
        clap_complete::generate(self.args.shell, &mut cmd, "easyenv", &mut std::io::stdout());
        Ok(CommandResult::success())
    }
}
