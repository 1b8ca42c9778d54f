//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::snapshot::SnapshotFormat;

/// easyenv - Resolve per-environment configuration from deferred sources.
#[derive(Debug, Parser)]
#[command(name = "easyenv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .easyenv/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides discovery from current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Only print command output and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve one or more configuration keys
    Resolve(ResolveArgs),

    /// Resolve every key and write the snapshot file
    Snapshot(SnapshotArgs),

    /// Show the environment name and how it was established
    Env(EnvArgs),

    /// List declared keys without resolving them
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Inputs that feed variable sources and environment selection.
#[derive(Debug, Clone, Default, Args)]
pub struct ResolutionArgs {
    /// Raw stage value, exposed as `opt:stage`
    #[arg(long, env = "EASYENV_STAGE")]
    pub stage: Option<String>,

    /// Explicit environment name (skips stage inference)
    #[arg(long, env = "EASYENV_ENV")]
    pub env: Option<String>,

    /// Dotenv files backing `env:` lookups (later files win)
    #[arg(long = "env-file", value_name = "PATH", default_value = ".env")]
    pub env_files: Vec<PathBuf>,

    /// Extra option exposed as `opt:NAME`
    #[arg(long = "opt", value_name = "NAME=VALUE")]
    pub options: Vec<String>,

    /// Pin the value of a source spec (value parsed as JSON when possible)
    #[arg(long = "set", value_name = "SPEC=VALUE")]
    pub pins: Vec<String>,
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ResolveArgs {
    /// Keys to resolve
    #[arg(required = true)]
    pub keys: Vec<String>,

    /// Print one JSON object instead of KEY=value lines
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub resolution: ResolutionArgs,
}

/// Arguments for the `snapshot` command.
#[derive(Debug, Clone, Default, Args)]
pub struct SnapshotArgs {
    /// Output format (overrides config)
    #[arg(long, value_enum)]
    pub format: Option<SnapshotFormat>,

    /// Output path (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not write anything if any key fails
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub resolution: ResolutionArgs,
}

/// Arguments for the `env` command.
#[derive(Debug, Clone, Default, Args)]
pub struct EnvArgs {
    #[command(flatten)]
    pub resolution: ResolutionArgs,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_resolve_with_resolution_flags() {
        let cli = Cli::parse_from([
            "easyenv",
            "resolve",
            "apiKeys",
            "logLevel",
            "--stage",
            "prod-east",
            "--set",
            "ssm:apiKey=abc",
            "--opt",
            "region=eu",
        ]);

        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.keys, vec!["apiKeys", "logLevel"]);
        assert_eq!(args.resolution.stage.as_deref(), Some("prod-east"));
        assert_eq!(args.resolution.pins, vec!["ssm:apiKey=abc"]);
        assert_eq!(args.resolution.options, vec!["region=eu"]);
        assert_eq!(args.resolution.env_files, vec![PathBuf::from(".env")]);
    }

    #[test]
    fn resolve_requires_a_key() {
        assert!(Cli::try_parse_from(["easyenv", "resolve"]).is_err());
    }

    #[test]
    fn parses_snapshot_flags() {
        let cli = Cli::parse_from([
            "easyenv",
            "snapshot",
            "--format",
            "json",
            "--output",
            "out.json",
            "--strict",
            "--env",
            "prod",
        ]);

        let Commands::Snapshot(args) = cli.command else {
            panic!("expected snapshot");
        };
        assert_eq!(args.format, Some(SnapshotFormat::Json));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert!(args.strict);
        assert_eq!(args.resolution.env.as_deref(), Some("prod"));
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::parse_from(["easyenv", "list", "--quiet", "--no-color", "--debug"]);
        assert!(cli.quiet);
        assert!(cli.no_color);
        assert!(cli.debug);
    }

    #[test]
    fn repeated_env_files_replace_default() {
        let cli = Cli::parse_from([
            "easyenv",
            "env",
            "--env-file",
            "a.env",
            "--env-file",
            "b.env",
        ]);
        let Commands::Env(args) = cli.command else {
            panic!("expected env");
        };
        assert_eq!(
            args.resolution.env_files,
            vec![PathBuf::from("a.env"), PathBuf::from("b.env")]
        );
    }
}
