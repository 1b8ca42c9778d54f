//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which loads the
//! project configuration once and routes CLI subcommands to their
//! implementations. Resolving commands build their engine through
//! [`ProjectContext`].

pub mod completions;
pub mod context;
pub mod dispatcher;
pub mod env;
pub mod list;
pub mod resolve;
pub mod snapshot;

pub use context::ProjectContext;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
