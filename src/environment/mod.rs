//! Environment name inference and establishment.
//!
//! The environment name (`prod`, `stg`, `local`, ...) drives which declared
//! value each configuration key uses. It is established once per engine:
//!
//! 1. Explicit `env` setting (config or `--env`)
//! 2. Otherwise the raw `opt:stage` value mapped through the env matchers
//! 3. Otherwise (no matcher applies) the raw value unchanged

pub mod bootstrap;
pub mod matcher;

pub use bootstrap::{
    EnvironmentCell, EnvironmentSetup, EnvironmentSource, ResolvedEnvironment, STAGE_SOURCE,
};
pub use matcher::{infer_env, EnvMatcher, EnvMatcherRule};
