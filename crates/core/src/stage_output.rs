//! Stage Output
//!
//! What a single analysis stage hands to the stages that depend on it.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Key of the single-entry record that stands in for an unparseable reply.
pub const PARSE_ERROR_KEY: &str = "解析错误";

/// Output of one analysis stage.
///
/// A parse failure is data, not an error: it flows to downstream stages as
/// the single-key record produced by [`StageOutput::to_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutput {
    /// A reply that parsed as JSON
    Structured(Value),
    /// A reply that was expected to be JSON but was not
    ParseFailed {
        /// Parser error message
        reason: String,
        /// Reply text after fence stripping
        raw: String,
    },
    /// Free-form prose
    Text(String),
}

impl StageOutput {
    /// Whether this output is a failed structured parse.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, StageOutput::ParseFailed { .. })
    }

    /// JSON view of this output, as fed to downstream stages.
    pub fn to_value(&self) -> Value {
        match self {
            StageOutput::Structured(value) => value.clone(),
            StageOutput::ParseFailed { .. } => {
                let mut record = serde_json::Map::new();
                record.insert(
                    PARSE_ERROR_KEY.to_string(),
                    Value::String(self.parse_failure_message().unwrap_or_default()),
                );
                Value::Object(record)
            }
            StageOutput::Text(text) => Value::String(text.clone()),
        }
    }

    /// Human-readable description of a parse failure, embedding the raw reply.
    pub fn parse_failure_message(&self) -> Option<String> {
        match self {
            StageOutput::ParseFailed { reason, raw } => Some(format!(
                "无法将响应解析为JSON格式（{}）。原始响应: {}",
                reason, raw
            )),
            _ => None,
        }
    }

    /// Prose content, if this is a text output.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StageOutput::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Text shown to a reader: prose verbatim, JSON pretty-printed.
    pub fn display_text(&self) -> String {
        match self {
            StageOutput::Text(text) => text.clone(),
            other => serde_json::to_string_pretty(&other.to_value()).unwrap_or_default(),
        }
    }
}

impl Serialize for StageOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
