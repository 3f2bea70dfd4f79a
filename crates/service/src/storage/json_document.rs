use std::{marker::PhantomData, path::PathBuf, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::fs::DocumentFs;
use crate::errors::{StoreError, StoreResult};

/// Outcome of reading a document from disk.
///
/// Absence is a normal state (nothing written yet); unparsable content is
/// reported as [`StoreError::CorruptDocument`] and never folded into `Absent`.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<D> {
    Absent,
    Present(D),
}

impl<D: Default> Loaded<D> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Loaded::Absent)
    }

    /// The document, or its empty default when the file does not exist.
    pub fn into_document(self) -> D {
        match self {
            Loaded::Absent => D::default(),
            Loaded::Present(doc) => doc,
        }
    }
}

/// Generic JSON file-backed document.
///
/// Holds no cached copy: every call reloads from disk while holding this
/// store's lock, so a single process always reads its own writes. Readers
/// share the lock; [`write_all`](Self::write_all) and [`update`](Self::update)
/// hold it exclusively for the whole load → mutate → persist span.
pub struct JsonDocumentStore<D> {
    resource: &'static str,
    path: PathBuf,
    fs: Arc<dyn DocumentFs>,
    lock: RwLock<()>,
    _doc: PhantomData<fn() -> D>,
}

/// Pretty JSON with 4-space indentation, UTF-8 kept as-is.
fn encode<D: Serialize>(doc: &D) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser)?;
    Ok(buf)
}

impl<D> JsonDocumentStore<D>
where
    D: Serialize + DeserializeOwned + Default,
{
    /// `resource` names the document in logs and errors (e.g. `"users"`).
    pub fn new<P: Into<PathBuf>>(resource: &'static str, path: P, fs: Arc<dyn DocumentFs>) -> Self {
        Self { resource, path: path.into(), fs, lock: RwLock::new(()), _doc: PhantomData }
    }

    fn unavailable(&self, source: std::io::Error) -> StoreError {
        StoreError::StorageUnavailable { resource: self.resource, source }
    }

    async fn load_unlocked(&self) -> StoreResult<Loaded<D>> {
        let Some(bytes) = self.fs.read(&self.path).await.map_err(|e| self.unavailable(e))? else {
            debug!(resource = self.resource, path = %self.path.display(), "document absent");
            return Ok(Loaded::Absent);
        };
        match serde_json::from_slice(&bytes) {
            Ok(doc) => Ok(Loaded::Present(doc)),
            Err(source) => {
                warn!(resource = self.resource, path = %self.path.display(), error = %source, "corrupt document");
                Err(StoreError::CorruptDocument { resource: self.resource, path: self.path.clone(), source })
            }
        }
    }

    async fn save_unlocked(&self, doc: &D) -> StoreResult<()> {
        let data = encode(doc).map_err(|e| self.unavailable(e.into()))?;
        self.fs.write(&self.path, &data).await.map_err(|e| self.unavailable(e))?;
        debug!(resource = self.resource, bytes = data.len(), "document persisted");
        Ok(())
    }

    /// Load the document, keeping absence distinct from an empty document.
    pub async fn load(&self) -> StoreResult<Loaded<D>> {
        let _guard = self.lock.read().await;
        self.load_unlocked().await
    }

    /// Load the document; a missing file yields `D::default()`.
    pub async fn read(&self) -> StoreResult<D> {
        Ok(self.load().await?.into_document())
    }

    /// Run `f` against the current document while the read lock is held.
    pub async fn read_with<R, F>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&D) -> R,
    {
        let _guard = self.lock.read().await;
        let doc = self.load_unlocked().await?.into_document();
        Ok(f(&doc))
    }

    /// Replace the whole document.
    pub async fn write_all(&self, doc: &D) -> StoreResult<()> {
        let _guard = self.lock.write().await;
        self.save_unlocked(doc).await
    }

    /// Load, apply `f`, and persist as one critical section.
    ///
    /// When `f` returns an error nothing is written and the error is returned.
    pub async fn update<R, F>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut D) -> StoreResult<R>,
    {
        let _guard = self.lock.write().await;
        let mut doc = self.load_unlocked().await?.into_document();
        let out = f(&mut doc)?;
        self.save_unlocked(&doc).await?;
        Ok(out)
    }
}
