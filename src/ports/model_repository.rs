//! # Model Repository Port
//!
//! Bulk lookup of application records by key. The engine uses this to turn
//! search hits back into records; how records are stored is up to the host.

use crate::models::RecordKey;
use crate::Result;
use async_trait::async_trait;

/// Loads application records by their keys
#[async_trait]
pub trait ModelRepository<M>: Send + Sync {
    /// Fetch every record whose key is in `keys`.
    ///
    /// Order is not significant and keys without a record are simply
    /// missing from the returned set.
    async fn find_many(&self, keys: &[RecordKey]) -> Result<Vec<M>>;
}
