//! Env command implementation.
//!
//! The `easyenv env` command prints the established environment name.

use std::sync::Arc;

use async_trait::async_trait;

use super::context::ProjectContext;
use super::dispatcher::{Command, CommandResult};
use crate::cli::args::EnvArgs;
use crate::diagnostics::Reporter;
use crate::error::Result;
use crate::ui::UserInterface;

/// The env command implementation.
pub struct EnvCommand {
    context: ProjectContext,
    args: EnvArgs,
    reporter: Arc<dyn Reporter>,
}

impl EnvCommand {
    /// Create a new env command.
    pub fn new(context: ProjectContext, args: EnvArgs, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            context,
            args,
            reporter,
        }
    }
}

#[async_trait]
impl Command for EnvCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let engine = self
            .context
            .engine(&self.args.resolution, Arc::clone(&self.reporter))?;

        // The bootstrap reports its own diagnostic on failure.
        match engine.environment().await {
            Ok(env) => {
                ui.output(&env.name);
                ui.message(&format!("({})", env.source));
                Ok(CommandResult::success())
            }
            Err(_) => Ok(CommandResult::failure(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::ResolutionArgs;
    use crate::config::EasyEnvConfig;
    use crate::diagnostics::{DiagnosticKind, MemoryReporter};
    use crate::environment::STAGE_SOURCE;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn context(root: &std::path::Path) -> ProjectContext {
        let config: EasyEnvConfig = serde_yaml::from_str(
            r#"
env_matchers:
  - pattern: "prod-.*"
    env: prod
"#,
        )
        .unwrap();
        ProjectContext::new(root, config)
    }

    fn command(root: &std::path::Path, resolution: ResolutionArgs) -> (EnvCommand, Arc<MemoryReporter>) {
        let reporter = Arc::new(MemoryReporter::new());
        let cmd = EnvCommand::new(context(root), EnvArgs { resolution }, reporter.clone());
        (cmd, reporter)
    }

    #[tokio::test]
    async fn prints_inferred_environment() {
        let temp = TempDir::new().unwrap();
        let (cmd, _) = command(
            temp.path(),
            ResolutionArgs {
                stage: Some("prod-eu".into()),
                ..Default::default()
            },
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).await.unwrap();

        assert!(result.success);
        assert_eq!(ui.outputs(), ["prod"]);
        assert_eq!(ui.messages(), ["(inferred from ${opt:stage} = 'prod-eu')"]);
    }

    #[tokio::test]
    async fn unmatched_stage_is_used_verbatim() {
        let temp = TempDir::new().unwrap();
        let (cmd, _) = command(
            temp.path(),
            ResolutionArgs {
                stage: Some("qa".into()),
                ..Default::default()
            },
        );
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).await.unwrap();
        assert_eq!(ui.outputs(), ["qa"]);
    }

    #[tokio::test]
    async fn missing_stage_fails() {
        let temp = TempDir::new().unwrap();
        let (cmd, reporter) = command(temp.path(), ResolutionArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).await.unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.outputs().is_empty());
        assert!(reporter.contains(DiagnosticKind::BootstrapFailed, STAGE_SOURCE));
    }
}
