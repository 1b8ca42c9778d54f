//! Configuration file discovery and loading.
//!
//! This module finds the project configuration and its local overrides and
//! merges them in priority order.

use crate::config::merger::merge_configs;
use crate::config::schema::EasyEnvConfig;
use crate::error::{EasyEnvError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding configuration, relative to the project root.
pub const CONFIG_DIR: &str = ".easyenv";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. Project config (`.easyenv/config.yml`)
/// 2. Local overrides (`.easyenv/config.local.yml`)
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: .easyenv/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .easyenv/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            project: existing(Self::project_path(project_root)),
            project_local: existing(project_root.join(CONFIG_DIR).join("config.local.yml")),
        }
    }

    /// Where the project config is expected.
    pub fn project_path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_DIR).join("config.yml")
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }

    /// Check if the project config exists.
    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Find the project root by walking up from `start`.
///
/// Looks for:
/// 1. `.easyenv` directory (primary indicator)
/// 2. `.git` directory (fallback)
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_DIR).is_dir() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EasyEnvError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            EasyEnvError::Io(e)
        }
    })
}

/// Load a single config file and parse it into EasyEnvConfig.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<EasyEnvConfig> {
    parse_config(&read_config(path)?, path)
}

/// Parse YAML content into EasyEnvConfig.
///
/// An empty document yields the default config.
pub fn parse_config(content: &str, source_path: &Path) -> Result<EasyEnvConfig> {
    if content.trim().is_empty() {
        return Ok(EasyEnvConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| EasyEnvError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a config file as raw YAML Value (for merging).
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    serde_yaml::from_str(&read_config(path)?).map_err(|e| EasyEnvError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and merge the project config and its local overrides.
///
/// # Errors
///
/// Returns `ConfigNotFound` if no project config exists.
/// Returns `ConfigParseError` if any config file is invalid.
pub fn load_merged_config(project_root: &Path) -> Result<EasyEnvConfig> {
    let paths = ConfigPaths::discover(project_root);

    if !paths.has_project_config() {
        return Err(EasyEnvError::ConfigNotFound {
            path: ConfigPaths::project_path(project_root),
        });
    }

    let configs = paths
        .all_existing()
        .into_iter()
        .map(|path| load_config_value(path))
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_configs(&configs);
    tracing::debug!(files = configs.len(), "merged configuration");

    serde_yaml::from_value(merged).map_err(|e| EasyEnvError::ConfigParseError {
        path: ConfigPaths::project_path(project_root),
        message: format!("Failed to parse merged config: {}", e),
    })
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file without merging.
/// Otherwise, discovers and merges the project config files.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<EasyEnvConfig> {
    if let Some(override_path) = config_override {
        load_config_file(override_path)
    } else {
        load_merged_config(project_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(root: &Path, name: &str, content: &str) {
        let dir = root.join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn discover_finds_project_and_local_configs() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "config.yml", "");
        write_config(temp.path(), "config.local.yml", "");

        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.has_project_config());
        assert_eq!(
            paths.all_existing(),
            vec![
                &temp.path().join(".easyenv/config.yml"),
                &temp.path().join(".easyenv/config.local.yml"),
            ]
        );
    }

    #[test]
    fn discover_returns_none_for_missing_configs() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.project.is_none());
        assert!(paths.project_local.is_none());
        assert!(!paths.has_project_config());
    }

    #[test]
    fn find_project_root_finds_config_dir() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("foo").join("bar");
        fs::create_dir_all(&subdir).unwrap();
        fs::create_dir_all(temp.path().join(CONFIG_DIR)).unwrap();

        assert_eq!(find_project_root(&subdir), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn find_project_root_prefers_config_dir_over_git() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("nested").join("project");
        fs::create_dir_all(&subdir).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::create_dir_all(subdir.join(CONFIG_DIR)).unwrap();

        assert_eq!(find_project_root(&subdir), Some(subdir));
    }

    #[test]
    fn load_config_file_returns_not_found_error() {
        let result = load_config_file(Path::new("/nonexistent/config.yml"));
        assert!(matches!(result, Err(EasyEnvError::ConfigNotFound { .. })));
    }

    #[test]
    fn parse_config_returns_parse_error_for_invalid_yaml() {
        let result = parse_config("invalid: yaml: content: [", Path::new("test.yml"));
        assert!(matches!(result, Err(EasyEnvError::ConfigParseError { .. })));
    }

    #[test]
    fn load_config_file_handles_empty_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yml");
        fs::write(&config_path, "").unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert!(config.env.is_none());
        assert!(config.env_resolutions.is_empty());
    }

    #[test]
    fn load_merged_config_requires_project_config() {
        let temp = TempDir::new().unwrap();
        let result = load_merged_config(temp.path());
        assert!(matches!(result, Err(EasyEnvError::ConfigNotFound { .. })));
    }

    #[test]
    fn load_merged_config_layers_local_overrides() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            "config.yml",
            r#"
env_resolutions:
  apiKeys:
    prod: ["ssm:apiKey"]
    default: ["env:API_KEY"]
  logLevel:
    default: info
"#,
        );
        write_config(
            temp.path(),
            "config.local.yml",
            r#"
env: local
env_resolutions:
  logLevel:
    local: debug
"#,
        );

        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.env.as_deref(), Some("local"));
        assert_eq!(
            config.env_resolutions.keys().collect::<Vec<_>>(),
            vec!["apiKeys", "logLevel"]
        );
        let log_level = &config.env_resolutions["logLevel"];
        assert_eq!(log_level["default"], "info");
        assert_eq!(log_level["local"], "debug");
    }

    #[test]
    fn load_merged_config_tolerates_empty_local_file() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "config.yml", "env: prod\n");
        write_config(temp.path(), "config.local.yml", "");

        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.env.as_deref(), Some("prod"));
    }

    #[test]
    fn load_config_override_skips_merging() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "config.yml", "env: prod\n");
        let other = temp.path().join("other.yml");
        fs::write(&other, "env: stg\n").unwrap();

        let config = load_config(temp.path(), Some(&other)).unwrap();
        assert_eq!(config.env.as_deref(), Some("stg"));
    }
}
