//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - Env matcher patterns must compile as regular expressions
//! - Env matcher targets must be non-empty
//! - Every resolution entry must map environment names to values
//! - No resolution entry may be empty

use crate::config::schema::EasyEnvConfig;
use crate::environment::EnvMatcherRule;
use crate::error::{EasyEnvError, Result};
use serde_json::Value;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Configuration key if the error is key-specific
    pub key: Option<String>,
}

impl ValidationError {
    fn new(rule: &str, message: String, key: Option<&str>) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            key: key.map(str::to_string),
        }
    }
}

/// Validate a configuration and return all errors.
///
/// This function collects all validation errors rather than stopping
/// at the first one, allowing users to fix multiple issues at once.
pub fn validate_config(config: &EasyEnvConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_matchers(config));
    errors.extend(validate_resolutions(config));

    errors
}

fn validate_matchers(config: &EasyEnvConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (i, rule) in config.env_matchers.iter().enumerate() {
        if rule.env.trim().is_empty() {
            errors.push(ValidationError::new(
                "empty-matcher-env",
                format!("env_matchers[{}] must name a target env", i),
                None,
            ));
        }
        if let Err(e) = EnvMatcherRule::new(&rule.pattern, rule.env.clone()) {
            errors.push(ValidationError::new(
                "invalid-matcher-pattern",
                format!("env_matchers[{}]: {}", i, e),
                None,
            ));
        }
    }

    errors
}

fn validate_resolutions(config: &EasyEnvConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (key, entry) in &config.env_resolutions {
        match entry {
            Value::Object(per_env) if per_env.is_empty() => {
                errors.push(ValidationError::new(
                    "empty-resolution",
                    format!("env_resolutions.{} declares no environments", key),
                    Some(key),
                ));
            }
            Value::Object(_) => {}
            _ => {
                errors.push(ValidationError::new(
                    "invalid-resolution",
                    format!(
                        "env_resolutions.{} must map environment names to values",
                        key
                    ),
                    Some(key),
                ));
            }
        }
    }

    errors
}

/// Validate configuration, returning an error if invalid.
pub fn validate(config: &EasyEnvConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(EasyEnvError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::EnvMatcherConfig;

    fn config(yaml: &str) -> EasyEnvConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn valid_config_has_no_errors() {
        let config = config(
            r#"
env_matchers:
  - pattern: "prod-.*"
    env: prod
env_resolutions:
  apiKeys:
    prod: ["ssm:apiKey"]
    default: []
"#,
        );
        assert!(validate_config(&config).is_empty());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn rejects_invalid_matcher_pattern() {
        let config = EasyEnvConfig {
            env_matchers: vec![EnvMatcherConfig {
                pattern: "prod-(".into(),
                env: "prod".into(),
            }],
            ..Default::default()
        };

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "invalid-matcher-pattern");
    }

    #[test]
    fn rejects_empty_matcher_target() {
        let config = EasyEnvConfig {
            env_matchers: vec![EnvMatcherConfig {
                pattern: "qa".into(),
                env: " ".into(),
            }],
            ..Default::default()
        };

        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| e.rule == "empty-matcher-env"));
    }

    #[test]
    fn rejects_non_mapping_and_empty_entries() {
        let config = config(
            r#"
env_resolutions:
  flat: "ssm:apiKey"
  empty: {}
"#,
        );

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].key.as_deref(), Some("flat"));
        assert_eq!(errors[0].rule, "invalid-resolution");
        assert_eq!(errors[1].key.as_deref(), Some("empty"));
        assert_eq!(errors[1].rule, "empty-resolution");
    }

    #[test]
    fn validate_joins_all_messages() {
        let config = config(
            r#"
env_matchers:
  - pattern: "("
    env: x
env_resolutions:
  flat: 1
"#,
        );

        let err = validate(&config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("env_matchers[0]"));
        assert!(msg.contains("env_resolutions.flat"));
    }
}
