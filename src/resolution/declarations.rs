//! The declared resolution map.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::selector::PerEnvironmentValues;
use crate::error::{EasyEnvError, Result};

/// Configuration keys and their per-environment values, in declaration order.
///
/// The key set is fixed once built; requests for any other key fail with
/// `UnknownKey`.
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    entries: Vec<(String, PerEnvironmentValues)>,
    index: HashMap<String, usize>,
}

impl Declarations {
    /// Create an empty resolution map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `key`. Redeclaring a key replaces its values in place.
    pub fn with_key(mut self, key: impl Into<String>, values: PerEnvironmentValues) -> Self {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = values,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, values));
            }
        }
        self
    }

    /// Build from the `env_resolutions` mapping of a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidationError` if an entry is not a mapping of
    /// environment names to values.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let mut declarations = Self::new();
        for (key, entry) in map {
            let Value::Object(per_env) = entry else {
                return Err(EasyEnvError::ConfigValidationError {
                    message: format!(
                        "env_resolutions.{} must map environment names to values",
                        key
                    ),
                });
            };
            declarations = declarations.with_key(key, PerEnvironmentValues::from_map(per_env.clone()));
        }
        Ok(declarations)
    }

    /// Values declared for `key`.
    pub fn get(&self, key: &str) -> Option<&PerEnvironmentValues> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Whether `key` is declared.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Declared keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Declared entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PerEnvironmentValues)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of declared keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::RawValue;
    use serde_json::json;

    #[test]
    fn from_map_keeps_declaration_order() {
        let Value::Object(map) = json!({
            "apiKeys": {"prod": ["ssm:a"], "default": ["env:API_KEY"]},
            "datadogEnabled": {"prod": true, "dev": false},
            "alpha": {"default": 1}
        }) else {
            unreachable!()
        };

        let declarations = Declarations::from_map(&map).unwrap();
        assert_eq!(
            declarations.keys().collect::<Vec<_>>(),
            vec!["apiKeys", "datadogEnabled", "alpha"]
        );
        assert_eq!(declarations.len(), 3);
        assert!(declarations.contains("alpha"));
        assert!(!declarations.contains("beta"));
    }

    #[test]
    fn from_map_rejects_non_mapping_entry() {
        let Value::Object(map) = json!({"broken": ["ssm:a"]}) else {
            unreachable!()
        };
        let err = Declarations::from_map(&map).unwrap_err();
        assert!(err.to_string().contains("env_resolutions.broken"));
    }

    #[test]
    fn redeclaring_replaces_in_place() {
        let declarations = Declarations::new()
            .with_key(
                "a",
                PerEnvironmentValues::new().with_value("default", RawValue::from(json!(1))),
            )
            .with_key("b", PerEnvironmentValues::new())
            .with_key(
                "a",
                PerEnvironmentValues::new().with_value("default", RawValue::from(json!(2))),
            );

        assert_eq!(declarations.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(
            declarations.get("a").unwrap().get("default"),
            Some(&RawValue::from(json!(2)))
        );
    }
}
