//! Visual theme and styling.

use console::Style;

/// easyenv's visual theme.
#[derive(Debug, Clone)]
pub struct EasyEnvTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for headers (green bold).
    pub header: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for configuration keys (bold).
    pub key: Style,
    /// Style for environment names (blue).
    pub env: Style,
}

impl Default for EasyEnvTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl EasyEnvTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            header: Style::new().green().bold(),
            dim: Style::new().dim(),
            key: Style::new().bold(),
            env: Style::new().blue(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            header: Style::new(),
            dim: Style::new(),
            key: Style::new(),
            env: Style::new(),
        }
    }

    /// Theme matching the current terminal.
    pub fn detect() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a header.
    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(format!("easyenv => {}", title)))
    }
}

/// Whether colored output should be used.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stderr().is_term() && console::colors_enabled_stderr()
}
