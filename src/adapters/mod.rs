//! # Adapters Module
//!
//! Concrete implementations of the port interfaces. [`SolrEngine`] implements
//! [`SearchEngine`](crate::ports::SearchEngine) on top of any
//! [`SearchClient`](crate::client::SearchClient), translating record batches
//! and search builders into Solr update and select requests.

pub mod solr_engine;

pub use solr_engine::{
    build_document, filter_query, page_window, SolrEngine, CLASS_FIELD, ID_FIELD,
};
