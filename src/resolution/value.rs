//! Raw configuration values.

use serde_json::Value;

/// Character that turns a string scalar into a deferred marker.
pub const MARKER_DELIMITER: char = ':';

/// A declared, not yet expanded configuration value.
///
/// Strings containing [`MARKER_DELIMITER`] are deferred markers that must be
/// looked up; every other scalar is a literal passed through as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Ordered list of further raw values.
    Sequence(Vec<RawValue>),
    /// Ordered key-value pairs of further raw values.
    Mapping(Vec<(String, RawValue)>),
    /// A string to be resolved through the variable resolver.
    Marker(String),
    /// A scalar (string, boolean, number or null) taken verbatim.
    Literal(Value),
}

impl RawValue {
    /// Whether this value is a deferred marker.
    pub fn is_marker(&self) -> bool {
        matches!(self, Self::Marker(_))
    }

    /// All deferred markers in this value, depth first, in declaration order.
    ///
    /// # Example
    ///
    /// ```
    /// use easyenv::resolution::RawValue;
    /// use serde_json::json;
    ///
    /// let raw = RawValue::from(json!({"a": ["lit", "ssm:foo"], "b": "env:BAR"}));
    /// assert_eq!(raw.markers(), vec!["ssm:foo", "env:BAR"]);
    /// ```
    pub fn markers(&self) -> Vec<&str> {
        let mut markers = Vec::new();
        self.collect_markers(&mut markers);
        markers
    }

    fn collect_markers<'a>(&'a self, markers: &mut Vec<&'a str>) {
        match self {
            Self::Sequence(items) => items.iter().for_each(|v| v.collect_markers(markers)),
            Self::Mapping(entries) => entries.iter().for_each(|(_, v)| v.collect_markers(markers)),
            Self::Marker(marker) => markers.push(marker),
            Self::Literal(_) => {}
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
            Value::String(s) if s.contains(MARKER_DELIMITER) => Self::Marker(s),
            scalar => Self::Literal(scalar),
        }
    }
}
