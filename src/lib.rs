pub mod adapters;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod ports;
pub mod repositories;

pub use adapters::SolrEngine;
pub use client::{Document, SearchClient, SelectQuery, SelectResult, SolrClient, UpdateQuery};
pub use config::{Config, ConfigOverrides, LogFormat, LoggingConfig, SolrConfig};
pub use error::{Error, ErrorCategory, Result};
pub use models::{DynamicRecord, ModelClass, RecordKey};
pub use ports::{IndexTarget, ModelRepository, SearchBuilder, SearchEngine, Searchable};
pub use repositories::InMemoryModelRepository;
