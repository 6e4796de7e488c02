use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::StorageError;
use crate::traits::PersistentMap;

/// Volatile backend: a concurrent hash map whose contents are lost on restart.
#[derive(Debug)]
pub struct InMemoryMap<V> {
    data: DashMap<String, V>,
}

impl<V> InMemoryMap<V> {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }
}

impl<V> Default for InMemoryMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> PersistentMap<V> for InMemoryMap<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<V>, StorageError> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, key: String, value: V) -> Result<Option<V>, StorageError> {
        Ok(self.data.insert(key, value))
    }

    async fn remove(&self, key: &str) -> Result<Option<V>, StorageError> {
        Ok(self.data.remove(key).map(|(_, v)| v))
    }

    async fn values(&self) -> Result<Vec<V>, StorageError> {
        Ok(self.data.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn len(&self) -> Result<usize, StorageError> {
        Ok(self.data.len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
