//! Resolve command implementation.
//!
//! The `easyenv resolve` command resolves the named keys concurrently and
//! prints `KEY=value` lines, or one JSON object with `--json`.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use super::context::ProjectContext;
use super::dispatcher::{Command, CommandResult};
use crate::cli::args::ResolveArgs;
use crate::diagnostics::Reporter;
use crate::error::Result;
use crate::snapshot::{render_snapshot, SnapshotFormat};
use crate::ui::UserInterface;

/// The resolve command implementation.
pub struct ResolveCommand {
    context: ProjectContext,
    args: ResolveArgs,
    reporter: Arc<dyn Reporter>,
}

impl ResolveCommand {
    /// Create a new resolve command.
    pub fn new(context: ProjectContext, args: ResolveArgs, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            context,
            args,
            reporter,
        }
    }
}

#[async_trait]
impl Command for ResolveCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let engine = self
            .context
            .engine(&self.args.resolution, Arc::clone(&self.reporter))?;

        let results = join_all(self.args.keys.iter().map(|key| engine.request_key(key))).await;

        let mut resolved = Vec::new();
        let mut failed = Vec::new();
        for (key, result) in self.args.keys.iter().zip(results) {
            match result {
                Ok(value) => resolved.push((key.clone(), value)),
                Err(_) => failed.push(key.as_str()),
            }
        }

        let format = if self.args.json {
            SnapshotFormat::Json
        } else {
            SnapshotFormat::Dotenv
        };
        let rendered = render_snapshot(&resolved, format);
        if !resolved.is_empty() || self.args.json {
            ui.output(rendered.trim_end_matches('\n'));
        }

        if failed.is_empty() {
            Ok(CommandResult::success())
        } else {
            ui.error(&format!("Failed to resolve: {}", failed.join(", ")));
            Ok(CommandResult::failure(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::ResolutionArgs;
    use crate::config::EasyEnvConfig;
    use crate::diagnostics::{DiagnosticKind, MemoryReporter};
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn context(root: &std::path::Path) -> ProjectContext {
        let config: EasyEnvConfig = serde_yaml::from_str(
            r#"
env: prod
env_resolutions:
  apiKeys:
    prod: ["ssm:apiKey", "static"]
    default: []
  logLevel:
    default: info
  onlyDev:
    dev: true
"#,
        )
        .unwrap();
        ProjectContext::new(root, config)
    }

    fn args(keys: &[&str], json: bool) -> ResolveArgs {
        ResolveArgs {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            json,
            resolution: ResolutionArgs {
                pins: vec!["ssm:apiKey=abc".into()],
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn prints_dotenv_lines_in_request_order() {
        let temp = TempDir::new().unwrap();
        let reporter = Arc::new(MemoryReporter::new());
        let cmd = ResolveCommand::new(
            context(temp.path()),
            args(&["logLevel", "apiKeys"], false),
            reporter,
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).await.unwrap();

        assert!(result.success);
        assert_eq!(ui.outputs(), ["logLevel=info\napiKeys=[\"abc\",\"static\"]"]);
    }

    #[tokio::test]
    async fn prints_json_object() {
        let temp = TempDir::new().unwrap();
        let cmd = ResolveCommand::new(
            context(temp.path()),
            args(&["logLevel"], true),
            Arc::new(MemoryReporter::new()),
        );
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).await.unwrap();

        assert_eq!(ui.outputs(), ["{\n  \"logLevel\": \"info\"\n}"]);
    }

    #[tokio::test]
    async fn failed_key_exits_with_one() {
        let temp = TempDir::new().unwrap();
        let reporter = Arc::new(MemoryReporter::new());
        let cmd = ResolveCommand::new(
            context(temp.path()),
            args(&["logLevel", "onlyDev", "missing"], false),
            reporter.clone(),
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).await.unwrap();

        assert_eq!(result.exit_code, 1);
        assert_eq!(ui.outputs(), ["logLevel=info"]);
        assert!(ui.has_error("onlyDev, missing"));
        assert!(reporter.contains(DiagnosticKind::KeyFailed, "onlyDev"));
        assert!(reporter.contains(DiagnosticKind::UnknownKey, "missing"));
    }
}
