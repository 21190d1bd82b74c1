//! # Solr Engine Adapter
//!
//! Implementation of [`SearchEngine`] that stores records as Solr documents.
//!
//! Every document carries the record's key in `id` and the record's type tag
//! in `_class`, so several record types can share one core and still be
//! flushed independently.

use crate::client::{
    Document, FilterQuery, SearchClient, SelectQuery, SelectResult, SolrClient, UpdateQuery,
};
use crate::config::SolrConfig;
use crate::models::RecordKey;
use crate::ports::{IndexTarget, ModelRepository, SearchBuilder, SearchEngine, Searchable};
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Field holding the record key
pub const ID_FIELD: &str = "id";

/// Field holding the record type tag
pub const CLASS_FIELD: &str = "_class";

/// Solr-backed search engine driver
pub struct SolrEngine<C = SolrClient> {
    client: Arc<C>,
}

impl<C> std::fmt::Debug for SolrEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolrEngine")
            .field("client", &std::any::type_name::<C>())
            .finish()
    }
}

impl<C> Clone for SolrEngine<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: SearchClient> SolrEngine<C> {
    /// Wrap an existing client
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    #[must_use]
    pub const fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Select request for a builder: the query text (or match-all) plus one
    /// filter query per where-clause
    fn build_select(builder: &SearchBuilder) -> SelectQuery {
        let mut select = builder
            .query()
            .map_or_else(SelectQuery::match_all, SelectQuery::new);

        for (field, value) in &builder.wheres {
            select.add_filter_query(FilterQuery::new(field.clone(), filter_query(field, value)));
        }

        select
    }
}

impl SolrEngine<SolrClient> {
    /// Create an engine with a fresh HTTP client
    pub fn from_config(config: &SolrConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(SolrClient::new(config)?)))
    }
}

/// Solr document for a record.
///
/// Null fields are dropped, `id` falls back to the record key and `_class`
/// is set to the record's type tag.
pub fn build_document<M: Searchable + ?Sized>(model: &M) -> Document {
    let mut fields = model.to_searchable_array();
    fields.retain(|_, value| !value.is_null());

    let mut document = Document::from(fields);
    if !document.contains(ID_FIELD) {
        document.set(ID_FIELD, model.key().to_value());
    }
    document.set(CLASS_FIELD, model.class_name());
    document
}

/// Exact-match filter for one where-clause: `field:"value"`.
///
/// String values are inserted as-is; embedded quotes are not escaped.
#[must_use]
pub fn filter_query(field: &str, value: &Value) -> String {
    match value {
        Value::String(text) => format!("{field}:\"{text}\""),
        other => format!("{field}:\"{other}\""),
    }
}

/// `(start, rows)` for a 1-based page. Page 0 is treated as page 1.
#[must_use]
pub fn page_window(per_page: u32, page: u32) -> (u64, u64) {
    let start = u64::from(page.saturating_sub(1)) * u64::from(per_page);
    (start, u64::from(per_page))
}

fn class_filter<T: IndexTarget + ?Sized>(target: &T) -> String {
    format!("{CLASS_FIELD}:\"{}\"", target.class_name())
}

#[async_trait]
impl<C: SearchClient> SearchEngine for SolrEngine<C> {
    type Results = SelectResult;

    #[instrument(skip_all, fields(count = models.len()))]
    async fn update<M: Searchable>(&self, models: &[M]) -> Result<()> {
        let Some(first) = models.first() else {
            return Ok(());
        };
        let index = first.searchable_as();

        let mut query = UpdateQuery::new();
        query
            .add_documents(models.iter().map(build_document))
            .add_commit();

        self.client.update(&index, &query).await?;
        info!("Indexed {} records into {}", models.len(), index);
        Ok(())
    }

    #[instrument(skip_all, fields(count = models.len()))]
    async fn delete<M: Searchable>(&self, models: &[M]) -> Result<()> {
        let Some(first) = models.first() else {
            return Ok(());
        };
        let index = first.searchable_as();

        let ids: Vec<RecordKey> = models.iter().map(Searchable::key).collect();
        let mut query = UpdateQuery::new();
        query.add_delete_by_ids(ids).add_commit();

        self.client.update(&index, &query).await?;
        info!("Deleted {} records from {}", models.len(), index);
        Ok(())
    }

    #[instrument(skip_all, fields(index = %builder.index))]
    async fn search(&self, builder: &SearchBuilder) -> Result<SelectResult> {
        let mut select = Self::build_select(builder);
        if let Some(limit) = builder.limit {
            select.set_rows(u64::from(limit));
        }

        self.client.select(&builder.index, &select).await
    }

    #[instrument(skip_all, fields(index = %builder.index, per_page = per_page, page = page))]
    async fn paginate(
        &self,
        builder: &SearchBuilder,
        per_page: u32,
        page: u32,
    ) -> Result<SelectResult> {
        let (start, rows) = page_window(per_page, page);
        let mut select = Self::build_select(builder);
        select.set_start(start).set_rows(rows);

        self.client.select(&builder.index, &select).await
    }

    fn map_ids(&self, results: &SelectResult) -> Vec<RecordKey> {
        results.documents.iter().filter_map(Document::id).collect()
    }

    #[instrument(skip_all, fields(index = %builder.index, hits = results.documents.len()))]
    async fn map<M, R>(
        &self,
        builder: &SearchBuilder,
        results: &SelectResult,
        repository: &R,
    ) -> Result<Vec<M>>
    where
        M: Searchable,
        R: ModelRepository<M>,
    {
        if results.is_empty() {
            return Ok(Vec::new());
        }

        let ids = self.map_ids(results);
        let mut by_key: HashMap<String, M> = repository
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|model| (model.key().to_string(), model))
            .collect();

        let mapped: Vec<M> = ids
            .iter()
            .filter_map(|id| by_key.remove(&id.to_string()))
            .collect();

        if mapped.len() < ids.len() {
            debug!(
                "Dropped {} hits without a matching record",
                ids.len() - mapped.len()
            );
        }
        Ok(mapped)
    }

    fn get_total_count(&self, results: &SelectResult) -> u64 {
        results.num_found
    }

    #[instrument(skip_all, fields(class = %target.class_name()))]
    async fn flush<T: IndexTarget + ?Sized>(&self, target: &T) -> Result<()> {
        let index = target.searchable_as();
        let mut query = UpdateQuery::new();
        query.add_delete_query(class_filter(target)).add_commit();

        self.client.update(&index, &query).await?;
        info!("Flushed {} from {}", target.class_name(), index);
        Ok(())
    }
}
