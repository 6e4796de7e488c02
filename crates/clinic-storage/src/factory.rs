use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::file::FileMap;
use crate::memory::InMemoryMap;
use crate::traits::PersistentMap;

/// Type alias for a shareable map instance.
pub type DynMap<V> = Arc<dyn PersistentMap<V>>;

/// Supported storage backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON snapshot per collection under `data_dir`.
    #[default]
    File,
    /// Volatile maps; everything is lost on restart.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Factory configuration to construct map instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory holding collection files (file backend only).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Configuration for a volatile store, used by tests and ephemeral runs.
    pub fn memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            ..Self::default()
        }
    }

    /// Configuration for a file store rooted at `data_dir`.
    pub fn file(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: data_dir.into(),
        }
    }

    pub fn validate(&self) -> Result<(), StorageError> {
        if self.backend == StorageBackend::File && self.data_dir.as_os_str().is_empty() {
            return Err(StorageError::configuration(
                "storage.data_dir must not be empty for the file backend",
            ));
        }
        Ok(())
    }
}

/// Opens the map for `collection` with the configured backend.
pub fn open_map<V>(config: &StorageConfig, collection: &str) -> Result<DynMap<V>, StorageError>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    config.validate()?;
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryMap::new())),
        StorageBackend::File => Ok(Arc::new(FileMap::open(&config.data_dir, collection)?)),
    }
}
