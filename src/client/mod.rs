//! # Solr Client
//!
//! A small Solr client: query builders for update and select requests, the
//! result types Solr answers with, and an HTTP transport.
//!
//! Callers build an [`UpdateQuery`] or [`SelectQuery`] and execute it against
//! a named endpoint (a Solr core or collection) through the [`SearchClient`]
//! trait. [`SolrClient`] is the reqwest-backed implementation.

pub mod query;
pub mod result;
pub mod solr;

pub use query::{FilterQuery, SelectQuery, UpdateCommand, UpdateQuery, MATCH_ALL};
pub use result::{Document, SelectResult, UpdateResult};
pub use solr::SolrClient;

use crate::Result;
use async_trait::async_trait;

/// Executes Solr requests against a named endpoint
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Send an update request (adds, deletes, commit)
    async fn update(&self, endpoint: &str, query: &UpdateQuery) -> Result<UpdateResult>;

    /// Run a select request
    async fn select(&self, endpoint: &str, query: &SelectQuery) -> Result<SelectResult>;

    /// Check whether the endpoint answers its ping handler
    async fn ping(&self, endpoint: &str) -> Result<bool>;
}
