use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys checked, in order, when pulling a user-facing message out of an
/// error body. Top-level `error`/`detail` win over field-level validation
/// errors.
const MESSAGE_KEYS: &[&str] = &["error", "detail", "b", "a", "op", "non_field_errors", "expression"];

/// Error body returned by the compute service.
///
/// The service answers with either `{"error": "..."}`, `{"detail": "..."}`
/// or field-level validation errors such as `{"b": ["Division by zero"]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceErrorBody(pub Map<String, Value>);

impl ServiceErrorBody {
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        match serde_json::from_slice::<Value>(bytes).ok()? {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<String> {
        MESSAGE_KEYS
            .iter()
            .find_map(|key| self.0.get(*key).and_then(first_text))
    }
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}
