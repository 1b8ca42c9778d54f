//! Per-environment value selection.

use serde_json::{Map, Value};

use super::value::RawValue;
use crate::error::ResolutionError;

/// Environment name whose value applies when the active environment has none.
pub const DEFAULT_ENVIRONMENT: &str = "default";

/// Values declared for one configuration key, by environment name, in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerEnvironmentValues {
    values: Vec<(String, RawValue)>,
}

impl PerEnvironmentValues {
    /// Create an empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw value for `env`, replacing any earlier value in place.
    pub fn with_value(mut self, env: impl Into<String>, value: RawValue) -> Self {
        let env = env.into();
        match self.values.iter_mut().find(|(name, _)| *name == env) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((env, value)),
        }
        self
    }

    /// Build from a JSON mapping of environment name to value.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            values: map
                .into_iter()
                .map(|(env, value)| (env, RawValue::from(value)))
                .collect(),
        }
    }

    /// Environment names with a declared value, in declaration order.
    pub fn environments(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(env, _)| env.as_str())
    }

    /// The value declared for `env` exactly, ignoring `default`.
    pub fn get(&self, env: &str) -> Option<&RawValue> {
        self.values
            .iter()
            .find(|(name, _)| name == env)
            .map(|(_, value)| value)
    }

    /// Whether any value is declared.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Pick the raw value of `key` for `env`.
///
/// An exact match on `env` wins over `default`. Exactly one value is chosen;
/// values are never merged across environments.
///
/// # Example
///
/// ```
/// use easyenv::resolution::{select, PerEnvironmentValues, RawValue};
/// use serde_json::json;
///
/// let values = PerEnvironmentValues::new()
///     .with_value("prod", RawValue::from(json!("A")))
///     .with_value("default", RawValue::from(json!("B")));
///
/// assert_eq!(select("k", &values, "prod").unwrap(), &RawValue::from(json!("A")));
/// assert_eq!(select("k", &values, "dev").unwrap(), &RawValue::from(json!("B")));
/// ```
pub fn select<'a>(
    key: &str,
    values: &'a PerEnvironmentValues,
    env: &str,
) -> Result<&'a RawValue, ResolutionError> {
    values
        .get(env)
        .or_else(|| values.get(DEFAULT_ENVIRONMENT))
        .ok_or_else(|| ResolutionError::MissingEnvironmentValue {
            key: key.to_string(),
            env: env.to_string(),
        })
}
