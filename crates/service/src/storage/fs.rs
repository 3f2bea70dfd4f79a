use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

/// File-system capability consumed by [`JsonDocumentStore`](super::json_document::JsonDocumentStore).
///
/// `write` must replace the whole file so that a reader never observes a
/// partially written document.
#[async_trait]
pub trait DocumentFs: Send + Sync {
    /// Read the full file; `Ok(None)` when it does not exist.
    async fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>>;
    /// Replace the file contents, creating the file (and its parent directory) if absent.
    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// Real disk, via `tokio::fs`. Writes go to a sibling temp file that is
/// flushed and then renamed over the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFs;

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4()))
}

/// Removes the temp file on drop unless it was renamed into place.
///
/// Covers both error returns and a write future dropped mid-flight
/// (e.g. the client went away).
struct TempGuard {
    path: PathBuf,
    armed: bool,
}

impl TempGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        if self.armed {
            // 同步删除：drop 中无法 await
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

#[async_trait]
impl DocumentFs for TokioFs {
    async fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let mut tmp = TempGuard::new(temp_sibling(path));
        let mut file = fs::File::create(&tmp.path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp.path, path).await?;
        tmp.disarm();
        Ok(())
    }
}

/// In-memory file system for tests and doc examples
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryFs {
        files: Mutex<HashMap<PathBuf, Vec<u8>>>,
        fail_writes: AtomicBool,
        fail_reads: AtomicBool,
    }

    impl MemoryFs {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a file with raw bytes, bypassing any store.
        pub fn put(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
            self.files.lock().unwrap().insert(path.into(), bytes.into());
        }

        pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
            self.files.lock().unwrap().get(path).cloned()
        }

        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        pub fn fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl DocumentFs for MemoryFs {
        async fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(io::Error::other("injected read failure"));
            }
            Ok(self.files.lock().unwrap().get(path).cloned())
        }

        async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(io::Error::other("injected write failure"));
            }
            self.files.lock().unwrap().insert(path.to_path_buf(), bytes.to_vec());
            Ok(())
        }
    }
}
