//! Record keys and two ready-made record types: [`DynamicRecord`] for
//! records described entirely by data (JSON files, the CLI) and
//! [`ModelClass`] for naming a record type without an instance.

use crate::ports::{IndexTarget, Searchable};
use crate::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Scalar record key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordKey {
    Int(i64),
    Str(String),
}

impl RecordKey {
    /// Read a key out of a JSON value. Only integers and strings qualify.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(n) => Value::from(*n),
            Self::Str(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for RecordKey {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// A record type named by its class tag and index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelClass {
    pub class: String,
    pub index: String,
}

impl ModelClass {
    pub fn new(class: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            index: index.into(),
        }
    }
}

impl IndexTarget for ModelClass {
    fn searchable_as(&self) -> String {
        self.index.clone()
    }

    fn class_name(&self) -> String {
        self.class.clone()
    }
}

fn default_key_name() -> String {
    "id".to_string()
}

/// Serialized shape of a [`DynamicRecord`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub class: String,
    pub index: String,
    #[serde(default = "default_key_name")]
    pub key_name: String,
    pub fields: Map<String, Value>,
}

/// A record whose type tag, index and fields are all data.
///
/// The key is read from `fields[key_name]` and must be an integer or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord", into = "RawRecord")]
pub struct DynamicRecord {
    class: String,
    index: String,
    key_name: String,
    key: RecordKey,
    fields: Map<String, Value>,
}

impl DynamicRecord {
    /// Build a record keyed on `id`
    pub fn new(
        class: impl Into<String>,
        index: impl Into<String>,
        fields: Map<String, Value>,
    ) -> crate::Result<Self> {
        Self::try_from(RawRecord {
            class: class.into(),
            index: index.into(),
            key_name: default_key_name(),
            fields,
        })
    }

    /// Build a record keyed on a custom attribute
    pub fn with_key_name(
        class: impl Into<String>,
        index: impl Into<String>,
        key_name: impl Into<String>,
        fields: Map<String, Value>,
    ) -> crate::Result<Self> {
        Self::try_from(RawRecord {
            class: class.into(),
            index: index.into(),
            key_name: key_name.into(),
            fields,
        })
    }

    /// Parse a JSON array of records
    pub fn list_from_json(json: &str) -> crate::Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    #[must_use]
    pub fn model_class(&self) -> ModelClass {
        ModelClass::new(self.class.clone(), self.index.clone())
    }
}

impl TryFrom<RawRecord> for DynamicRecord {
    type Error = Error;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let key = raw
            .fields
            .get(&raw.key_name)
            .and_then(RecordKey::from_value)
            .ok_or_else(|| {
                Error::invalid_input(
                    "fields",
                    format!(
                        "record of class '{}' has no integer or string '{}' field",
                        raw.class, raw.key_name
                    ),
                )
            })?;

        Ok(Self {
            class: raw.class,
            index: raw.index,
            key_name: raw.key_name,
            key,
            fields: raw.fields,
        })
    }
}

impl From<DynamicRecord> for RawRecord {
    fn from(record: DynamicRecord) -> Self {
        Self {
            class: record.class,
            index: record.index,
            key_name: record.key_name,
            fields: record.fields,
        }
    }
}

impl IndexTarget for DynamicRecord {
    fn searchable_as(&self) -> String {
        self.index.clone()
    }

    fn class_name(&self) -> String {
        self.class.clone()
    }
}

impl Searchable for DynamicRecord {
    fn key_name(&self) -> &str {
        &self.key_name
    }

    fn key(&self) -> RecordKey {
        self.key.clone()
    }

    fn to_searchable_array(&self) -> Map<String, Value> {
        self.fields.clone()
    }
}
