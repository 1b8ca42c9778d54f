//! Dotenv file parsing.
//!
//! Values read here back the `env:` variable source, layered beneath the
//! process environment.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Parses `KEY=value` files into a map of variables.
///
/// # Supported Formats
///
/// - Simple: `KEY=value`
/// - Exported: `export KEY=value`
/// - Quoted: `KEY="value with spaces"` or `KEY='single quoted'`
/// - Empty: `KEY=`
/// - Comments: `# This is a comment`
///
/// Lines without `=` are ignored. Later assignments of the same key win.
///
/// # Example
///
/// ```
/// use easyenv::config::EnvFileParser;
///
/// let content = r#"
/// # Database config
/// export DATABASE_URL=postgres://localhost/db
/// API_KEY="abc123"
/// "#;
///
/// let vars = EnvFileParser::parse(content);
/// assert_eq!(vars.get("DATABASE_URL").map(String::as_str), Some("postgres://localhost/db"));
/// assert_eq!(vars.get("API_KEY").map(String::as_str), Some("abc123"));
/// ```
pub struct EnvFileParser;

impl EnvFileParser {
    /// Parse dotenv content into a map of variables.
    pub fn parse(content: &str) -> HashMap<String, String> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(Self::parse_line)
            .collect()
    }

    fn parse_line(line: &str) -> Option<(String, String)> {
        let line = line.strip_prefix("export ").unwrap_or(line);
        let (key, value) = line.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key.to_string(), Self::unquote(value.trim()).to_string()))
    }

    fn unquote(value: &str) -> &str {
        let quoted = value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')));
        if quoted {
            &value[1..value.len() - 1]
        } else {
            value
        }
    }

    /// Load and parse a dotenv file.
    pub fn load(path: &Path) -> Result<HashMap<String, String>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read env file {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    /// Load a dotenv file, returning an empty map if it doesn't exist.
    pub fn load_optional(path: &Path) -> Result<HashMap<String, String>> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(HashMap::new())
        }
    }
}
