//! The protocol-facing adapter.
//!
//! [`SnapFs`] is the only component that speaks the protocol vocabulary:
//! paths, errno codes, attribute records. It translates dispatch calls into
//! [`FileStore`] and [`SnapshotStore`] operations under a single
//! process-wide `RwLock`, so read-only calls run concurrently while every
//! mutation (including snapshot capture and rollback) observes and leaves a
//! fully consistent table.

use std::sync::RwLock;

use tracing::debug;

use crate::error::Errno;
use crate::limits::FsLimits;
use crate::snapshot::{FileDiff, SnapshotInfo, SnapshotStore};
use crate::store::FileStore;
use crate::traits::{FileType, FilesystemOps, Metadata, SnapshotControl};

const ROOT: &str = "/";

/// Composition root: the live file table plus the snapshot store.
#[derive(Debug)]
struct FsState {
    store: FileStore,
    snapshots: SnapshotStore,
}

/// Versioned in-memory filesystem.
///
/// One instance per mounted filesystem. All state is volatile: it exists
/// only for the process lifetime.
///
/// # Concurrency
///
/// Dispatch layers may call into `SnapFs` from many worker threads. The
/// whole state sits behind one `RwLock`: `getattr`/`readdir`/`read`/`diff`/
/// `snapshots` take the shared lock, everything else takes the exclusive
/// lock. Snapshot capture and rollback hold the exclusive lock for the full
/// copy, so no caller ever observes a partial capture or a half-installed
/// rollback.
pub struct SnapFs {
    state: RwLock<FsState>,
}

impl Default for SnapFs {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapFs {
    /// Create an empty filesystem with default bounds.
    pub fn new() -> Self {
        Self::with_limits(FsLimits::new())
    }

    /// Create an empty filesystem with the given bounds.
    pub fn with_limits(limits: FsLimits) -> Self {
        Self {
            state: RwLock::new(FsState {
                store: FileStore::new(limits.clone()),
                snapshots: SnapshotStore::new(limits),
            }),
        }
    }

    /// Strip the single leading separator to obtain the storage key.
    ///
    /// `/` maps to the empty key, which no file may use (the root is a
    /// directory, handled by the callers that accept it).
    fn storage_key(path: &str) -> Result<&str, Errno> {
        path.strip_prefix('/').ok_or(Errno::EINVAL)
    }
}

impl FilesystemOps for SnapFs {
    fn getattr(&self, path: &str) -> Result<Metadata, Errno> {
        if path == ROOT {
            return Ok(Metadata {
                file_type: FileType::Directory,
                size: 0,
                mode: 0o755,
                nlink: 2,
            });
        }
        let key = Self::storage_key(path)?;
        let state = self.state.read().unwrap();
        let file = state.store.find(key).ok_or(Errno::ENOENT)?;
        Ok(Metadata {
            file_type: FileType::File,
            size: file.size() as u64,
            mode: 0o644,
            nlink: 1,
        })
    }

    fn readdir(&self, path: &str) -> Result<Vec<String>, Errno> {
        if path != ROOT {
            return Err(Errno::ENOENT);
        }
        let state = self.state.read().unwrap();
        let mut names = vec![".".to_string(), "..".to_string()];
        names.extend(state.store.list());
        Ok(names)
    }

    fn create(&self, path: &str) -> Result<(), Errno> {
        if path == ROOT {
            return Err(Errno::EEXIST);
        }
        let key = Self::storage_key(path)?;
        let mut state = self.state.write().unwrap();
        state.store.create(key)?;
        debug!(name = key, "file created");
        Ok(())
    }

    fn write(&self, path: &str, data: &[u8], offset: u64) -> Result<usize, Errno> {
        let key = Self::storage_key(path)?;
        let offset = usize::try_from(offset).map_err(|_| Errno::EFBIG)?;
        let mut state = self.state.write().unwrap();
        let written = state.store.write(key, offset, data)?;
        debug!(name = key, offset, bytes = written, "file written");
        Ok(written)
    }

    fn read(&self, path: &str, size: usize, offset: u64) -> Result<Vec<u8>, Errno> {
        let key = Self::storage_key(path)?;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let state = self.state.read().unwrap();
        Ok(state.store.read(key, offset, size)?.to_vec())
    }

    fn unlink(&self, path: &str) -> Result<(), Errno> {
        let key = Self::storage_key(path)?;
        let mut state = self.state.write().unwrap();
        state.store.delete(key)?;
        debug!(name = key, "file deleted");
        Ok(())
    }
}

impl SnapshotControl for SnapFs {
    fn snapshot(&self) -> Result<u64, Errno> {
        // Exclusive lock: the copy must not observe an in-flight mutation.
        let mut guard = self.state.write().unwrap();
        let FsState { store, snapshots } = &mut *guard;
        Ok(snapshots.capture(store)?)
    }

    fn rollback(&self, id: u64) -> Result<(), Errno> {
        let mut guard = self.state.write().unwrap();
        let files = guard.snapshots.rollback(id)?;
        guard.store.replace(files);
        Ok(())
    }

    fn diff(&self, id1: u64, id2: u64) -> Result<Vec<FileDiff>, Errno> {
        let state = self.state.read().unwrap();
        Ok(state.snapshots.diff(id1, id2)?)
    }

    fn snapshots(&self) -> Vec<SnapshotInfo> {
        let state = self.state.read().unwrap();
        state.snapshots.list()
    }
}
