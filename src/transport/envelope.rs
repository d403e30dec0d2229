use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::TransportError;

/// Builds a request body wrapped in the resource's root name,
/// e.g. `{"message": {"to_number": "...", "body": "..."}}`.
#[derive(Debug, Clone)]
pub struct JsonBody {
    root: &'static str,
    fields: Map<String, Value>,
}

impl JsonBody {
    pub fn new(root: &'static str) -> Self {
        Self {
            root,
            fields: Map::new(),
        }
    }

    /// Add a field unconditionally.
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_owned(), value.into());
        self
    }

    /// Add a field only when it carries a value; empty strings count as unset.
    pub fn optional<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value.map(Into::into) {
            None | Some(Value::Null) => self,
            Some(Value::String(text)) if text.is_empty() => self,
            Some(value) => self.field(key, value),
        }
    }

    /// Add caller-supplied fields whose keys are not already set.
    pub fn extend_absent(mut self, fields: &Map<String, Value>) -> Self {
        for (key, value) in fields {
            self.fields
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        self
    }

    pub fn build(self) -> Value {
        let mut root = Map::with_capacity(1);
        root.insert(self.root.to_owned(), Value::Object(self.fields));
        Value::Object(root)
    }
}

/// Decode `{"<root>": {...}}` into the wire struct under `root`.
pub fn decode_root<T: DeserializeOwned>(
    json: &str,
    root: &'static str,
) -> Result<T, TransportError> {
    let mut envelope: Map<String, Value> = serde_json::from_str(json)?;
    let inner = envelope
        .remove(root)
        .ok_or(TransportError::MissingKey { key: root })?;
    Ok(serde_json::from_value(inner)?)
}

/// Decode `{"<key>": [...]}`; a missing or `null` key is an empty list.
pub fn decode_collection<T: DeserializeOwned>(
    json: &str,
    key: &'static str,
) -> Result<Vec<T>, TransportError> {
    let mut envelope: Map<String, Value> = serde_json::from_str(json)?;
    match envelope.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => Ok(serde_json::from_value(items)?),
    }
}

/// Text field the API sends as either a JSON string or a JSON number
/// (error codes, for example).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TransportText {
    String(String),
    Number(serde_json::Number),
}

impl TransportText {
    pub fn into_string(self) -> String {
        match self {
            Self::String(value) => value,
            Self::Number(value) => value.to_string(),
        }
    }
}

/// Integer field the API may send with a fractional part (prices, for
/// example). The fraction is truncated toward zero.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct TransportInteger(serde_json::Number);

impl TransportInteger {
    pub fn truncate(&self) -> Option<i64> {
        self.0
            .as_i64()
            .or_else(|| self.0.as_f64().map(|value| value.trunc() as i64))
    }
}

#[derive(Debug, Deserialize)]
struct CountJson {
    count: u64,
}

/// Decode `{"count": N}`.
pub fn decode_count(json: &str) -> Result<u64, TransportError> {
    let parsed: CountJson = serde_json::from_str(json)?;
    Ok(parsed.count)
}

/// Extract a human-readable message from an error body such as
/// `{"error": "..."}` or `{"message": "..."}`.
pub fn decode_error_message(body: &str) -> Option<String> {
    let parsed: Map<String, Value> = serde_json::from_str(body).ok()?;
    ["error", "message", "error_message"]
        .iter()
        .find_map(|key| match parsed.get(*key) {
            Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
            _ => None,
        })
}
