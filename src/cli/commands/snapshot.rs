//! Snapshot command implementation.
//!
//! The `easyenv snapshot` command resolves every declared key and writes the
//! resolved ones to the snapshot file.

use std::sync::Arc;

use async_trait::async_trait;

use super::context::ProjectContext;
use super::dispatcher::{Command, CommandResult};
use crate::cli::args::SnapshotArgs;
use crate::config::SnapshotSettings;
use crate::diagnostics::Reporter;
use crate::error::Result;
use crate::snapshot::write_snapshot;
use crate::ui::UserInterface;

/// The snapshot command implementation.
pub struct SnapshotCommand {
    context: ProjectContext,
    args: SnapshotArgs,
    reporter: Arc<dyn Reporter>,
}

impl SnapshotCommand {
    /// Create a new snapshot command.
    pub fn new(context: ProjectContext, args: SnapshotArgs, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            context,
            args,
            reporter,
        }
    }

    /// Snapshot settings after applying command-line overrides.
    pub fn settings(&self) -> SnapshotSettings {
        let configured = &self.context.config().snapshot;
        SnapshotSettings {
            format: self.args.format.unwrap_or(configured.format),
            path: self.args.output.clone().or_else(|| configured.path.clone()),
        }
    }
}

#[async_trait]
impl Command for SnapshotCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let engine = self
            .context
            .engine(&self.args.resolution, Arc::clone(&self.reporter))?;

        let Ok(env) = engine.environment().await else {
            ui.error("Snapshot not written: environment could not be established");
            return Ok(CommandResult::failure(1));
        };
        ui.show_header(&env.name);

        let failed: Vec<String> = engine
            .resolve_all()
            .await
            .into_iter()
            .filter(|(_, result)| result.is_err())
            .map(|(key, _)| key)
            .collect();

        if self.args.strict && !failed.is_empty() {
            ui.error(&format!(
                "Snapshot not written: failed to resolve {}",
                failed.join(", ")
            ));
            return Ok(CommandResult::failure(1));
        }

        let settings = self.settings();
        let path = settings.resolved_path(self.context.project_root());
        let entries = engine.resolved();
        write_snapshot(&path, &entries, settings.format).await?;

        ui.success(&format!(
            "Wrote {} key{} to {}",
            entries.len(),
            if entries.len() == 1 { "" } else { "s" },
            path.display()
        ));

        if failed.is_empty() {
            Ok(CommandResult::success())
        } else {
            ui.warning(&format!("Skipped failed keys: {}", failed.join(", ")));
            Ok(CommandResult::failure(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::ResolutionArgs;
    use crate::config::EasyEnvConfig;
    use crate::diagnostics::MemoryReporter;
    use crate::snapshot::SnapshotFormat;
    use crate::ui::MockUI;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
env: prod
env_resolutions:
  FOO:
    default: bar
  COUNT:
    prod: 3
  SECRET:
    default: "ssm:secret"
"#;

    fn command(root: &std::path::Path, args: SnapshotArgs) -> SnapshotCommand {
        let config: EasyEnvConfig = serde_yaml::from_str(CONFIG).unwrap();
        SnapshotCommand::new(
            ProjectContext::new(root, config),
            args,
            Arc::new(MemoryReporter::new()),
        )
    }

    fn pinned() -> ResolutionArgs {
        ResolutionArgs {
            pins: vec!["ssm:secret=s3cr3t".into()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn writes_dotenv_snapshot_by_default() {
        let temp = TempDir::new().unwrap();
        let cmd = command(
            temp.path(),
            SnapshotArgs {
                resolution: pinned(),
                ..Default::default()
            },
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).await.unwrap();

        assert!(result.success);
        let written = std::fs::read_to_string(temp.path().join(".env.easyenv")).unwrap();
        assert_eq!(written, "FOO=bar\nCOUNT=3\nSECRET=s3cr3t\n");
        assert_eq!(ui.headers(), ["prod"]);
    }

    #[tokio::test]
    async fn format_and_output_flags_override_config() {
        let temp = TempDir::new().unwrap();
        let cmd = command(
            temp.path(),
            SnapshotArgs {
                format: Some(SnapshotFormat::Json),
                output: Some(PathBuf::from("out/snap.json")),
                resolution: pinned(),
                ..Default::default()
            },
        );
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).await.unwrap();

        let written = std::fs::read_to_string(temp.path().join("out/snap.json")).unwrap();
        assert_eq!(
            written,
            "{\n  \"FOO\": \"bar\",\n  \"COUNT\": 3,\n  \"SECRET\": \"s3cr3t\"\n}\n"
        );
    }

    #[tokio::test]
    async fn skips_failed_keys_and_exits_with_one() {
        let temp = TempDir::new().unwrap();
        let cmd = command(temp.path(), SnapshotArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).await.unwrap();

        assert_eq!(result.exit_code, 1);
        let written = std::fs::read_to_string(temp.path().join(".env.easyenv")).unwrap();
        assert_eq!(written, "FOO=bar\nCOUNT=3\n");
        assert!(ui.warnings()[0].contains("SECRET"));
    }

    #[tokio::test]
    async fn strict_mode_writes_nothing_on_failure() {
        let temp = TempDir::new().unwrap();
        let cmd = command(
            temp.path(),
            SnapshotArgs {
                strict: true,
                ..Default::default()
            },
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).await.unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(!temp.path().join(".env.easyenv").exists());
        assert!(ui.has_error("SECRET"));
    }

    #[tokio::test]
    async fn bootstrap_failure_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let config: EasyEnvConfig =
            serde_yaml::from_str("env_resolutions:\n  FOO:\n    default: bar\n").unwrap();
        let cmd = SnapshotCommand::new(
            ProjectContext::new(temp.path(), config),
            SnapshotArgs::default(),
            Arc::new(MemoryReporter::new()),
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).await.unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(!temp.path().join(".env.easyenv").exists());
    }
}
