//! Terminal output for the CLI.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for real terminal usage
//! - [`MockUI`] for capturing output in tests
//!
//! Resolved data goes to stdout; status lines and errors go to stderr, so
//! `easyenv resolve` output can be piped.
//!
//! # Example
//!
//! ```
//! use easyenv::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.output("API_KEY=abc");
//! ui.success("Resolved 1 key");
//! assert_eq!(ui.outputs(), ["API_KEY=abc"]);
//! ```

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, EasyEnvTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface: Send {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Write a line of command output. Never suppressed.
    fn output(&mut self, line: &str);

    /// Display a status message.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Never suppressed.
    fn error(&mut self, msg: &str);

    /// Show a header line.
    fn show_header(&mut self, title: &str);
}
