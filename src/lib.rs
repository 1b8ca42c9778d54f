//! easyenv - Per-environment configuration resolution.
//!
//! easyenv resolves configuration keys whose values differ per deployment
//! environment and may point at external sources (`env:API_KEY`,
//! `ssm:apiKey`, `file:secrets/token`). Each key is computed at most once;
//! concurrent requests share the computation and failures are cached.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, merging, and validation
//! - [`diagnostics`] - Human-readable failure reports
//! - [`environment`] - Environment name inference and establishment
//! - [`error`] - Error types and result aliases
//! - [`resolution`] - Selection, expansion, and the resolution engine
//! - [`snapshot`] - Snapshot rendering and persistence
//! - [`sources`] - Variable sources backing deferred markers
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use easyenv::config::EasyEnvConfig;
//! use easyenv::diagnostics::SilentReporter;
//! use easyenv::resolution::ResolutionEngine;
//! use easyenv::sources::StaticSource;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let config: EasyEnvConfig = serde_yaml::from_str(r#"
//! env_matchers:
//!   - pattern: "prod-.*"
//!     env: prod
//! env_resolutions:
//!   apiKeys:
//!     prod: ["ssm:apiKey"]
//!     default: ["local-key"]
//! "#).unwrap();
//!
//! let source = StaticSource::new()
//!     .with_value("opt:stage", json!("prod-east"))
//!     .with_value("ssm:apiKey", json!("k-123"));
//! let engine =
//!     ResolutionEngine::from_config(&config, Arc::new(source), Arc::new(SilentReporter)).unwrap();
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! assert_eq!(runtime.block_on(engine.request_key("apiKeys")).unwrap(), json!(["k-123"]));
//! ```

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod resolution;
pub mod snapshot;
pub mod sources;
pub mod ui;

pub use error::{EasyEnvError, ResolutionError, Result};
