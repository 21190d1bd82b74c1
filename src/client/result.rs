use crate::models::RecordKey;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Solr document: field name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// The `id` field, when it holds an integer or string
    #[must_use]
    pub fn id(&self) -> Option<RecordKey> {
        self.get("id").and_then(RecordKey::from_value)
    }

    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Result of a select request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectResult {
    /// Total matches on the server, independent of paging
    pub num_found: u64,
    /// Offset of the first returned document
    pub start: u64,
    /// Returned documents in server order
    pub documents: Vec<Document>,
    /// Server-side query time in milliseconds
    pub query_time_ms: u64,
}

impl SelectResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Parse a `wt=json` select response body
    pub fn from_json(body: &str) -> Result<Self> {
        let raw: RawSelectResponse = serde_json::from_str(body)?;
        let response = raw.response.ok_or_else(|| Error::Parse {
            context: "select response".to_string(),
            message: "missing 'response' section".to_string(),
        })?;

        Ok(Self {
            num_found: response.num_found,
            start: response.start,
            documents: response.docs,
            query_time_ms: raw.header.qtime,
        })
    }
}

/// Result of an update request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateResult {
    /// Solr status code, 0 on success
    pub status: i64,
    /// Server-side processing time in milliseconds
    pub query_time_ms: u64,
}

impl UpdateResult {
    /// Parse a `wt=json` update response body
    pub fn from_json(body: &str) -> Result<Self> {
        let raw: RawUpdateResponse = serde_json::from_str(body)?;
        Ok(Self {
            status: raw.header.status,
            query_time_ms: raw.header.qtime,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct ResponseHeader {
    #[serde(default)]
    status: i64,
    #[serde(rename = "QTime", default)]
    qtime: u64,
}

#[derive(Debug, Deserialize)]
struct RawSelectResponse {
    #[serde(rename = "responseHeader", default)]
    header: ResponseHeader,
    response: Option<RawResponse>,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(rename = "numFound")]
    num_found: u64,
    #[serde(default)]
    start: u64,
    #[serde(default)]
    docs: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct RawUpdateResponse {
    #[serde(rename = "responseHeader", default)]
    header: ResponseHeader,
}

#[derive(Debug, Deserialize)]
struct RawErrorResponse {
    error: Option<RawError>,
}

#[derive(Debug, Deserialize)]
struct RawError {
    msg: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PingResponse {
    #[serde(default)]
    pub status: String,
}

/// Build an error from a non-success Solr response
pub(crate) fn solr_error(code: u16, body: &str) -> Error {
    let message = serde_json::from_str::<RawErrorResponse>(body)
        .ok()
        .and_then(|raw| raw.error)
        .and_then(|error| error.msg)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no response body".to_string()
            } else {
                trimmed.to_string()
            }
        });

    Error::Solr { code, message }
}
