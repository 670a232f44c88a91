//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Tunables of a [`Parser`](crate::parser::Parser).
///
/// Every field has a default, so partial JSON documents are accepted.
///
/// # Examples
///
/// ```rust
/// use statline::ParserConfig;
///
/// let config = ParserConfig::from_json(r#"{ "max_step_repetitions": 4 }"#).unwrap();
/// assert_eq!(config.max_step_repetitions, 4);
/// assert_eq!(config.hidden_marker, "(hidden)");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Trailing marker removed from lines and ignored in residual text.
    pub hidden_marker: String,

    /// How often one step may match within a single line.
    pub max_step_repetitions: usize,

    /// Log lines that fail to parse at debug level.
    pub log_failures: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            hidden_marker: String::from("(hidden)"),
            max_step_repetitions: 16,
            log_failures: true,
        }
    }
}

impl ParserConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.hidden_marker, "(hidden)");
        assert_eq!(config.max_step_repetitions, 16);
        assert!(config.log_failures);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        assert_eq!(ParserConfig::from_json("{}").unwrap(), ParserConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = ParserConfig {
            hidden_marker: "[hidden]".into(),
            max_step_repetitions: 3,
            log_failures: false,
        };
        let json = config.to_json().unwrap();
        assert_eq!(ParserConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        assert!(ParserConfig::from_json(r#"{ "max_step_repetitions": "many" }"#).is_err());
    }
}
