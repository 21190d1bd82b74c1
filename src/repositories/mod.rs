//! # Repositories
//!
//! Implementations of [`ModelRepository`](crate::ports::ModelRepository).
//! The host application normally supplies its own; the in-memory one backs
//! the CLI's record files and the test suite.
//!
//! ## Usage Example
//!
//! ```no_run
//! use solr_engine::models::{DynamicRecord, RecordKey};
//! use solr_engine::ports::ModelRepository;
//! use solr_engine::repositories::InMemoryModelRepository;
//!
//! # async fn example() -> solr_engine::Result<()> {
//! let records = DynamicRecord::list_from_json(
//!     r#"[{"class": "Post", "index": "posts", "fields": {"id": 1, "title": "Hello"}}]"#,
//! )?;
//! let repository = InMemoryModelRepository::from_records(records);
//!
//! let found = repository.find_many(&[RecordKey::Int(1)]).await?;
//! assert_eq!(found.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod memory;

pub use memory::InMemoryModelRepository;
