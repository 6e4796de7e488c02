//! File-backed persistent map.
//!
//! The whole collection lives in memory and is mirrored to a single JSON
//! file, `<data_dir>/<collection>.json`, holding an object keyed by id.
//! Every mutation rewrites the file: the snapshot goes to a temporary file in
//! the same directory which is then renamed over the old one, so a crash
//! leaves either the previous or the new snapshot on disk, never a torn one.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, MutexGuard};

use crate::error::StorageError;
use crate::traits::PersistentMap;

#[derive(Debug)]
pub struct FileMap<V> {
    collection: String,
    path: PathBuf,
    data: DashMap<String, V>,
    /// Held across each mutation, its snapshot write and any rollback.
    write_lock: Mutex<()>,
}

impl<V> FileMap<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Opens `collection` under `dir`, creating the directory if needed.
    ///
    /// A missing file yields an empty map.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` if the file exists but is not a valid
    /// snapshot, and `StorageError::Io` for filesystem failures.
    pub fn open(dir: impl AsRef<Path>, collection: &str) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{collection}.json"));

        let data = DashMap::new();
        match std::fs::read(&path) {
            Ok(bytes) => {
                let snapshot: BTreeMap<String, V> = serde_json::from_slice(&bytes)
                    .map_err(|e| StorageError::corrupt(collection, e.to_string()))?;
                for (key, value) in snapshot {
                    data.insert(key, value);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(
            collection,
            path = %path.display(),
            entries = data.len(),
            "opened file-backed collection"
        );

        Ok(Self {
            collection: collection.to_string(),
            path,
            data,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current map to disk. The caller holds `write_lock` from
    /// before its mutation until after any rollback.
    async fn persist(&self, _guard: &MutexGuard<'_, ()>) -> Result<(), StorageError> {
        let snapshot: BTreeMap<String, V> = self
            .data
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(|e| StorageError::internal(format!("snapshot writer panicked: {e}")))?
            .inspect_err(|e| {
                tracing::error!(
                    collection = %self.collection,
                    error = %e,
                    "failed to write collection snapshot"
                );
            })
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StorageError::Io(e.error))?;
    Ok(())
}

#[async_trait]
impl<V> PersistentMap<V> for FileMap<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<V>, StorageError> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, key: String, value: V) -> Result<Option<V>, StorageError> {
        let guard = self.write_lock.lock().await;
        let previous = self.data.insert(key.clone(), value);
        if let Err(e) = self.persist(&guard).await {
            match &previous {
                Some(old) => {
                    self.data.insert(key, old.clone());
                }
                None => {
                    self.data.remove(&key);
                }
            }
            return Err(e);
        }
        Ok(previous)
    }

    async fn remove(&self, key: &str) -> Result<Option<V>, StorageError> {
        let guard = self.write_lock.lock().await;
        let Some((key, removed)) = self.data.remove(key) else {
            return Ok(None);
        };
        if let Err(e) = self.persist(&guard).await {
            self.data.insert(key, removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    async fn values(&self) -> Result<Vec<V>, StorageError> {
        Ok(self.data.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn len(&self) -> Result<usize, StorageError> {
        Ok(self.data.len())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
