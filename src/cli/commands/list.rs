//! List command implementation.
//!
//! The `easyenv list` command shows the declared keys, the environments each
//! one covers and the markers it would look up. Nothing is resolved.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use super::context::ProjectContext;
use super::dispatcher::{Command, CommandResult};
use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::resolution::{Declarations, RawValue};
use crate::ui::theme::EasyEnvTheme;
use crate::ui::UserInterface;

/// The list command implementation.
pub struct ListCommand {
    context: ProjectContext,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(context: ProjectContext, args: ListArgs) -> Self {
        Self { context, args }
    }
}

fn markers<'a>(values: impl Iterator<Item = &'a RawValue>) -> Vec<&'a str> {
    let mut markers: Vec<&str> = values.flat_map(RawValue::markers).collect();
    markers.sort_unstable();
    markers.dedup();
    markers
}

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let declarations = Declarations::from_map(&self.context.config().env_resolutions)?;

        if self.args.json {
            let mut listing = Map::new();
            for (key, values) in declarations.iter() {
                let envs: Vec<&str> = values.environments().collect();
                let markers = markers(envs.iter().filter_map(|env| values.get(env)));
                listing.insert(
                    key.to_string(),
                    json!({ "environments": envs, "markers": markers }),
                );
            }
            let rendered = serde_json::to_string_pretty(&Value::Object(listing))
                .map_err(anyhow::Error::from)?;
            ui.output(&rendered);
            return Ok(CommandResult::success());
        }

        let theme = EasyEnvTheme::detect();
        ui.show_header(&format!(
            "{} key{}",
            declarations.len(),
            if declarations.len() == 1 { "" } else { "s" }
        ));
        for (key, values) in declarations.iter() {
            let envs: Vec<&str> = values.environments().collect();
            let markers = markers(envs.iter().filter_map(|env| values.get(env)));
            let mut line = format!(
                "{} {}",
                theme.key.apply_to(key),
                theme.env.apply_to(format!("[{}]", envs.join(", ")))
            );
            if !markers.is_empty() {
                line.push_str(&format!(
                    " {}",
                    theme.dim.apply_to(format!("<- {}", markers.join(", ")))
                ));
            }
            ui.output(&line);
        }

        Ok(CommandResult::success())
    }
}
