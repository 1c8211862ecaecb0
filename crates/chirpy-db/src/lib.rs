pub mod document;
pub mod error;
pub mod queries;

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info};
use uuid::Uuid;

use crate::document::Document;
pub use crate::error::{Result, StoreError};

/// Value produced by a write closure, plus whether the document changed.
pub struct Mutation<T> {
    pub value: T,
    pub changed: bool,
}

impl<T> Mutation<T> {
    pub fn changed(value: T) -> Self {
        Self { value, changed: true }
    }

    pub fn unchanged(value: T) -> Self {
        Self {
            value,
            changed: false,
        }
    }
}

/// File-backed record store holding posts, accounts and revoked tokens in one
/// JSON document.
///
/// Nothing is cached between calls: reads load the whole document under the
/// shared lock, writes load, mutate and rewrite it under the exclusive lock.
/// Rewrites go to a sibling temp file which is then renamed over the document.
pub struct Store {
    path: PathBuf,
    lock: RwLock<()>,
}

impl Store {
    /// Open the store at `path`, creating an empty document if the file is
    /// absent or zero-length. An existing document must parse.
    pub fn open(path: &Path) -> Result<Self> {
        let store = Self {
            path: path.to_path_buf(),
            lock: RwLock::new(()),
        };

        let needs_init = match fs::metadata(path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        if needs_init {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            store.persist(&Document::default())?;
            info!("Created empty store at {}", path.display());
        } else {
            store.load()?;
            info!("Store opened at {}", path.display());
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against a fresh snapshot under the shared lock.
    pub fn with_snapshot<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Document) -> T,
    {
        let _guard = self.lock.read().map_err(|_| StoreError::LockPoisoned)?;
        let doc = self.load()?;
        Ok(f(&doc))
    }

    /// Load and mutate the document under the exclusive lock, rewriting it
    /// only when `f` reports a change.
    pub fn with_snapshot_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> Mutation<T>,
    {
        let _guard = self.lock.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut doc = self.load()?;
        let Mutation { value, changed } = f(&mut doc);
        if changed {
            self.persist(&doc)?;
        }
        Ok(value)
    }

    fn load(&self) -> Result<Document> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn persist(&self, doc: &Document) -> Result<()> {
        let payload = serde_json::to_vec(doc)?;

        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        if let Err(e) = write_synced(&temp_path, &payload) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!("Saved store ({} bytes)", payload.len());
        Ok(())
    }
}

/// Write `payload` and flush it to disk before returning, so a later rename
/// never exposes a file whose data has not landed.
fn write_synced(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(payload)?;
    file.sync_all()
}
