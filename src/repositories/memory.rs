use crate::models::RecordKey;
use crate::ports::{ModelRepository, Searchable};
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory record store keyed by the text form of each record's key
#[derive(Debug)]
pub struct InMemoryModelRepository<M> {
    records: Arc<RwLock<HashMap<String, M>>>,
}

impl<M> Default for InMemoryModelRepository<M> {
    fn default() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<M: Searchable + Clone> InMemoryModelRepository<M> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository holding `records`. Later duplicates win.
    pub fn from_records(records: impl IntoIterator<Item = M>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.key().to_string(), record))
            .collect();
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Insert or replace a record
    pub async fn insert(&self, record: M) {
        self.records
            .write()
            .await
            .insert(record.key().to_string(), record);
    }

    /// Remove a record, returning it if it was present
    pub async fn remove(&self, key: &RecordKey) -> Option<M> {
        self.records.write().await.remove(&key.to_string())
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl<M: Searchable + Clone> ModelRepository<M> for InMemoryModelRepository<M> {
    async fn find_many(&self, keys: &[RecordKey]) -> Result<Vec<M>> {
        let records = self.records.read().await;
        let found: Vec<M> = keys
            .iter()
            .filter_map(|key| records.get(&key.to_string()).cloned())
            .collect();

        debug!("Loaded {}/{} records by key", found.len(), keys.len());
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DynamicRecord;
    use serde_json::{json, Map, Value};

    fn record(id: Value, title: &str) -> DynamicRecord {
        let mut fields = Map::new();
        fields.insert("id".to_string(), id);
        fields.insert("title".to_string(), json!(title));
        DynamicRecord::new("Post", "posts", fields).unwrap()
    }

    #[test]
    fn test_find_many_matches_across_key_types() {
        let repository = InMemoryModelRepository::from_records(vec![
            record(json!(1), "one"),
            record(json!("2"), "two"),
        ]);

        let found = tokio_test::block_on(repository.find_many(&[
            RecordKey::from("1"),
            RecordKey::Int(2),
            RecordKey::Int(3),
        ]))
        .unwrap();

        let titles: Vec<&Value> = found.iter().map(|r| &r.fields()["title"]).collect();
        assert_eq!(titles, vec![&json!("one"), &json!("two")]);
    }

    #[tokio::test]
    async fn test_insert_and_remove() {
        let repository = InMemoryModelRepository::new();
        assert!(repository.is_empty().await);

        repository.insert(record(json!(7), "first")).await;
        repository.insert(record(json!(7), "second")).await;
        assert_eq!(repository.len().await, 1);

        let removed = repository.remove(&RecordKey::Int(7)).await.unwrap();
        assert_eq!(removed.fields()["title"], json!("second"));
        assert!(repository.is_empty().await);
    }
}
