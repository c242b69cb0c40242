//! Persistence for the ledger snapshot.
//!
//! The ledger only ever sees a flat key-value store holding strings. The
//! canonical snapshot lives under [`CANONICAL_KEY`]; older dashboard
//! versions left data under other keys, which are only ever read.
//!
//! # File Layout
//!
//! [`FileStore`] maps every key to one JSON file:
//!
//! ```text
//! ~/.local/share/sportlog/
//! ├── SPORT_STATE_V1.json     # canonical snapshot
//! └── ayubi_water.json        # legacy value, read once during migration
//! ```

mod file_store;
mod memory_store;
mod snapshot_store;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use snapshot_store::{SnapshotStore, CANONICAL_KEY};

/// A host-provided string store.
///
/// `set` replaces the whole value stored under `key`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid storage key `{0}`")]
    InvalidKey(String),

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}
