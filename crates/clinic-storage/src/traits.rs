//! The persistent map trait every storage backend implements.

use async_trait::async_trait;

use crate::error::StorageError;

/// A string-keyed map of values that backends may persist across restarts.
///
/// Each call is atomic for its own key only: there are no multi-key
/// transactions and no ordering guarantee for [`values`](Self::values).
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use clinic_storage::{PersistentMap, StorageError};
///
/// async fn rename(map: &dyn PersistentMap<Doctor>, id: &str) -> Result<(), StorageError> {
///     if let Some(mut doctor) = map.get(id).await? {
///         doctor.name = "Dr. Cameron".into();
///         map.insert(id.to_string(), doctor).await?;
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait PersistentMap<V>: Send + Sync
where
    V: Send + Sync + 'static,
{
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<V>, StorageError>;

    /// Stores `value` under `key`, returning the value it replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not persist the change; the
    /// in-memory view is left as it was before the call.
    async fn insert(&self, key: String, value: V) -> Result<Option<V>, StorageError>;

    /// Removes `key`, returning the value it held.
    async fn remove(&self, key: &str) -> Result<Option<V>, StorageError>;

    /// Returns a snapshot of every stored value, in no particular order.
    async fn values(&self) -> Result<Vec<V>, StorageError>;

    /// Returns the number of stored entries.
    async fn len(&self) -> Result<usize, StorageError>;

    /// Returns `true` if the map holds no entries.
    async fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len().await? == 0)
    }

    /// Returns `true` if `key` is present.
    async fn contains_key(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Returns the name of this backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
