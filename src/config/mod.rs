//! Configuration loading, parsing, and validation for easyenv.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//! - Dotenv file parsing in [`env_file`]
//!
//! # Example
//!
//! ```
//! use easyenv::config::{load_merged_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let config_dir = temp.path().join(".easyenv");
//! fs::create_dir_all(&config_dir).unwrap();
//! fs::write(
//!     config_dir.join("config.yml"),
//!     "env: prod\nenv_resolutions:\n  apiKeys:\n    default: [\"env:API_KEY\"]\n",
//! )
//! .unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.env.as_deref(), Some("prod"));
//! ```
//!
//! # Configuration File Locations
//!
//! easyenv discovers and merges configuration in this order:
//! 1. Project config (`.easyenv/config.yml`)
//! 2. Local overrides (`.easyenv/config.local.yml`)

pub mod env_file;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use schema::{EasyEnvConfig, EnvMatcherConfig, SnapshotSettings};

pub use loader::{
    find_project_root, load_config, load_config_file, load_config_value, load_merged_config,
    parse_config, ConfigPaths, CONFIG_DIR,
};

pub use merger::{deep_merge, merge_configs};

pub use validator::{validate, validate_config, ValidationError};

pub use env_file::EnvFileParser;
