//! # clinic-storage
//!
//! Persistent key-value maps for the clinic records server.
//!
//! Each entity collection is stored in its own [`PersistentMap`]. Two
//! backends are provided:
//! - [`InMemoryMap`]: a concurrent hash map, lost on restart;
//! - [`FileMap`]: the same map mirrored to a JSON snapshot file that is
//!   reloaded on startup.
//!
//! ## Example
//!
//! ```ignore
//! use clinic_storage::{StorageConfig, open_map};
//!
//! let doctors = open_map::<Doctor>(&StorageConfig::file("data"), "doctors")?;
//! doctors.insert(doctor.id.clone(), doctor).await?;
//! let all = doctors.values().await?;
//! ```

mod error;
pub mod factory;
pub mod file;
pub mod memory;
mod traits;

pub use error::{ErrorCategory, StorageError};
pub use factory::{DynMap, StorageBackend, StorageConfig, open_map};
pub use file::FileMap;
pub use memory::InMemoryMap;
pub use traits::PersistentMap;

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;
