use rebac_cbor::{Hash, to_canonical_cbor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Runtime values supplied with a check for caveat evaluation.
///
/// Entry order is irrelevant: equality and the canonical encoding only look at the set of
/// entries, so `{"a":1,"b":2}` and `{"b":2,"a":1}` are the same context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaveatContext(Map<String, Value>);

#[derive(Debug, Error)]
pub enum CaveatContextError {
    #[error("caveat context must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("caveat context encoding error: {0}")]
    Encode(#[from] serde_cbor::Error),
}

impl CaveatContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Canonical CBOR encoding of the context. Byte-identical for structurally equal
    /// contexts; its length is what the size quota is measured against.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CaveatContextError> {
        Ok(to_canonical_cbor(&self.0)?)
    }

    pub fn canonical_len(&self) -> Result<usize, CaveatContextError> {
        Ok(self.canonical_bytes()?.len())
    }

    /// Digest of the canonical encoding, safe to log in place of the raw values.
    pub fn digest(&self) -> Result<Hash, CaveatContextError> {
        Ok(Hash::of_cbor(&self.0)?)
    }
}

impl From<Map<String, Value>> for CaveatContext {
    fn from(map: Map<String, Value>) -> Self {
        CaveatContext(map)
    }
}

impl TryFrom<Value> for CaveatContext {
    type Error = CaveatContextError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(CaveatContext(map)),
            other => Err(CaveatContextError::NotAnObject(json_kind(&other))),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for CaveatContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        CaveatContext(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
