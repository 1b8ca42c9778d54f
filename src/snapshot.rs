//! Persistence of resolved keys.
//!
//! A snapshot holds every key that resolved successfully, in declaration
//! order. Failed and unsettled keys are never written.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EasyEnvError, Result};

/// File format of a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// One `KEY=value` line per key.
    #[default]
    Dotenv,
    /// A single pretty-printed JSON object.
    Json,
}

impl SnapshotFormat {
    /// Path used when none is configured.
    pub fn default_path(&self) -> &'static str {
        match self {
            Self::Dotenv => ".env.easyenv",
            Self::Json => ".env.easyenv.json",
        }
    }
}

impl fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dotenv => write!(f, "dotenv"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Render resolved entries in `format`.
///
/// Dotenv values are not quoted or escaped. Strings are written raw; any
/// other value is written as compact JSON.
///
/// # Example
///
/// ```
/// use easyenv::snapshot::{render_snapshot, SnapshotFormat};
/// use serde_json::json;
///
/// let entries = vec![("FOO".to_string(), json!("bar")), ("COUNT".to_string(), json!(3))];
/// assert_eq!(render_snapshot(&entries, SnapshotFormat::Dotenv), "FOO=bar\nCOUNT=3\n");
/// ```
pub fn render_snapshot(entries: &[(String, Value)], format: SnapshotFormat) -> String {
    match format {
        SnapshotFormat::Dotenv => entries
            .iter()
            .map(|(key, value)| format!("{}={}\n", key, dotenv_value(value)))
            .collect(),
        SnapshotFormat::Json => {
            let object: Map<String, Value> = entries.iter().cloned().collect();
            let mut rendered = serde_json::to_string_pretty(&Value::Object(object))
                .unwrap_or_else(|_| String::from("{}"));
            rendered.push('\n');
            rendered
        }
    }
}

fn dotenv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render and write a snapshot, creating parent directories as needed.
pub async fn write_snapshot(
    path: &Path,
    entries: &[(String, Value)],
    format: SnapshotFormat,
) -> Result<PathBuf> {
    let snapshot_error = |e: std::io::Error| EasyEnvError::Snapshot {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(snapshot_error)?;
    }
    tokio::fs::write(path, render_snapshot(entries, format))
        .await
        .map_err(snapshot_error)?;

    tracing::debug!(path = %path.display(), %format, keys = entries.len(), "snapshot written");
    Ok(path.to_path_buf())
}
