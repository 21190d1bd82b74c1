//! # Ports Module
//!
//! The inbound contract a host application programs against. A search engine
//! driver implements [`SearchEngine`]; the host supplies records that
//! implement [`Searchable`] and a [`ModelRepository`] that can load them back
//! by key.
//!
//! ## Example Usage
//!
//! ```no_run
//! use solr_engine::adapters::SolrEngine;
//! use solr_engine::config::SolrConfig;
//! use solr_engine::ports::{SearchBuilder, SearchEngine};
//!
//! # async fn example() -> solr_engine::Result<()> {
//! let engine = SolrEngine::from_config(&SolrConfig::default())?;
//!
//! let builder = SearchBuilder::new("posts", "rust").with_where("status", "active");
//! let results = engine.paginate(&builder, 10, 1).await?;
//! println!("{} matches", engine.get_total_count(&results));
//! # Ok(())
//! # }
//! ```

pub mod model_repository;
pub mod search_engine;

pub use model_repository::ModelRepository;
pub use search_engine::{IndexTarget, SearchBuilder, SearchEngine, Searchable};
