//! Spawn rule documents and the scalar fields indexed alongside them.

use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A spawn rule exactly as produced by the generator.
///
/// The wrapped value is always a JSON object. Nothing in this type mutates it;
/// [`SpawnDocument::into_value`] hands back the same document that was wrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct SpawnDocument {
    raw: Map<String, Value>,
}

/// Scalar fields extracted from a [`SpawnDocument`] for filtering and sorting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedFields {
    pub id: String,
    /// Lower-cased species name truncated at the first whitespace.
    pub canonical_name: String,
    pub features: Vec<String>,
    pub generation: Option<i32>,
    pub bucket: Option<String>,
    pub level_min: Option<i32>,
}

impl SpawnDocument {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(raw) => Ok(Self { raw }),
            other => Err(ModelError::InvalidDocument(format!(
                "expected a JSON object, found {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.raw)
    }

    /// The document id, if present and a string.
    pub fn id(&self) -> Option<&str> {
        self.raw.get("id").and_then(Value::as_str)
    }

    /// Display name: `species.name` when present, otherwise `pokemon`.
    pub fn display_name(&self) -> Option<&str> {
        self.species()
            .and_then(|species| species.get("name"))
            .and_then(Value::as_str)
            .or_else(|| self.raw.get("pokemon").and_then(Value::as_str))
    }

    /// Extract the indexed columns.
    ///
    /// Absent optional fields come back as `None`; only a missing id or name,
    /// or a field holding the wrong JSON type, is an error.
    pub fn indexed_fields(&self) -> Result<IndexedFields> {
        let id = self.id().ok_or(ModelError::MissingField("id"))?.to_string();

        let name = self
            .display_name()
            .ok_or(ModelError::MissingField("species.name"))?;

        let features = match self.raw.get("features") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| ModelError::InvalidField {
                            field: "features",
                            reason: format!("expected string tag, found {}", json_type_name(item)),
                        })
                })
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(ModelError::InvalidField {
                    field: "features",
                    reason: format!("expected array, found {}", json_type_name(other)),
                })
            }
        };

        let generation = optional_i32(
            self.species().and_then(|species| species.get("generation")),
            "species.generation",
        )?;
        let level_min = optional_i32(self.raw.get("level_min"), "level_min")?;

        let bucket = match self.raw.get("bucket") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(ModelError::InvalidField {
                    field: "bucket",
                    reason: format!("expected string, found {}", json_type_name(other)),
                })
            }
        };

        Ok(IndexedFields {
            id,
            canonical_name: canonical_name(name),
            features,
            generation,
            bucket,
            level_min,
        })
    }

    fn species(&self) -> Option<&Map<String, Value>> {
        self.raw.get("species").and_then(Value::as_object)
    }
}

impl TryFrom<Value> for SpawnDocument {
    type Error = ModelError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl From<SpawnDocument> for Value {
    fn from(doc: SpawnDocument) -> Self {
        doc.into_value()
    }
}

/// Canonical search key for a display name.
///
/// `"Bulbasaur Alolan"` becomes `"bulbasaur"`.
pub fn canonical_name(name: &str) -> String {
    name.split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

fn optional_i32(value: Option<&Value>, field: &'static str) -> Result<Option<i32>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| ModelError::InvalidField {
                field,
                reason: format!("expected 32-bit integer, found {n}"),
            }),
        Some(other) => Err(ModelError::InvalidField {
            field,
            reason: format!("expected integer, found {}", json_type_name(other)),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
