//! # Search Engine Port
//!
//! Defines the driver contract between a host application's record layer and
//! a full-text search backend. The host hands records to the driver for
//! indexing, describes searches with a [`SearchBuilder`], and gets hits back
//! either as raw keys or as hydrated records in relevance order.

use crate::models::RecordKey;
use crate::ports::ModelRepository;
use crate::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// The index a record type lives in and the tag that identifies the type
/// inside a shared index.
pub trait IndexTarget: Send + Sync {
    /// Name of the index (Solr core or collection) records are sent to
    fn searchable_as(&self) -> String;

    /// Type tag stored on every document, used to scope bulk deletes
    fn class_name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// An application record that can be indexed
pub trait Searchable: IndexTarget {
    /// Name of the key attribute
    fn key_name(&self) -> &str {
        "id"
    }

    /// Unique key of this record
    fn key(&self) -> RecordKey;

    /// Field values to index.
    ///
    /// Null values are dropped before submission and `id` falls back to
    /// [`Searchable::key`] when missing.
    fn to_searchable_array(&self) -> Map<String, Value>;
}

/// Parameters for one search request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchBuilder {
    /// Index to search
    pub index: String,
    /// Free-text query; `None` matches everything
    pub query: Option<String>,
    /// Exact-match field constraints, in insertion order
    pub wheres: Vec<(String, Value)>,
    /// Maximum number of hits to return
    pub limit: Option<u32>,
}

impl SearchBuilder {
    /// Create a search against `index`. Blank query text means "no query".
    pub fn new(index: impl Into<String>, query: impl Into<String>) -> Self {
        let query = query.into();
        Self {
            index: index.into(),
            query: if query.trim().is_empty() {
                None
            } else {
                Some(query)
            },
            wheres: Vec::new(),
            limit: None,
        }
    }

    /// Create a search against the index a record type lives in
    pub fn for_model<T: IndexTarget + ?Sized>(target: &T, query: impl Into<String>) -> Self {
        Self::new(target.searchable_as(), query)
    }

    /// Constrain `field` to equal `value`. Setting a field twice keeps the
    /// latest value at the original position.
    #[must_use]
    pub fn with_where(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.wheres.iter_mut().find(|(existing, _)| *existing == field) {
            Some(slot) => slot.1 = value,
            None => self.wheres.push((field, value)),
        }
        self
    }

    /// Limit the number of hits returned by `search`
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

/// Driver contract for a full-text search backend
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Backend-specific result page
    type Results: Send + Sync;

    /// Index or re-index records. Empty input does nothing.
    async fn update<M: Searchable>(&self, models: &[M]) -> Result<()>;

    /// Remove records from the index. Empty input does nothing.
    async fn delete<M: Searchable>(&self, models: &[M]) -> Result<()>;

    /// Run a search
    async fn search(&self, builder: &SearchBuilder) -> Result<Self::Results>;

    /// Run a search and return one page of hits. `page` is 1-based.
    async fn paginate(
        &self,
        builder: &SearchBuilder,
        per_page: u32,
        page: u32,
    ) -> Result<Self::Results>;

    /// Keys of the hits, in the order the backend returned them
    fn map_ids(&self, results: &Self::Results) -> Vec<RecordKey>;

    /// Load the records behind the hits, preserving hit order.
    ///
    /// Hits without a matching record are skipped.
    async fn map<M, R>(
        &self,
        builder: &SearchBuilder,
        results: &Self::Results,
        repository: &R,
    ) -> Result<Vec<M>>
    where
        M: Searchable,
        R: ModelRepository<M>;

    /// Total number of matches reported by the backend
    fn get_total_count(&self, results: &Self::Results) -> u64;

    /// Remove every indexed record of the given type
    async fn flush<T: IndexTarget + ?Sized>(&self, target: &T) -> Result<()>;
}
