//! Dispatch-facing trait definitions.
//!
//! A user-space filesystem dispatch layer drives the engine through two
//! object-safe seams: [`FilesystemOps`] for the standard file-call
//! vocabulary and [`SnapshotControl`] for the versioning surface. Both are
//! implemented by [`SnapFs`](crate::SnapFs); a mount loop typically holds
//! `Arc<SnapFs>` and hands each half out as a trait object.
//!
//! All operations are synchronous and thread-safe: implementations must
//! tolerate concurrent calls from multiple dispatch worker threads.

use serde::Serialize;

use crate::error::Errno;
use crate::snapshot::{FileDiff, SnapshotInfo};

/// Entry kind, as reported by `getattr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileType {
    /// Regular file
    File,
    /// Directory
    Directory,
}

impl FileType {
    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }
}

/// Entry attributes, as reported by `getattr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Entry kind
    pub file_type: FileType,
    /// Logical size in bytes
    pub size: u64,
    /// Permissions (Unix mode)
    pub mode: u32,
    /// Hard link count
    pub nlink: u32,
}

/// The standard file-call surface.
///
/// Paths are absolute and separator-prefixed; the storage key is the path
/// with its single leading `/` removed, and `/` itself is the reserved root
/// directory. Failures carry one of the closed set of [`Errno`] codes.
pub trait FilesystemOps: Send + Sync {
    /// Attribute lookup.
    fn getattr(&self, path: &str) -> Result<Metadata, Errno>;

    /// Directory listing. Only the root is listable; yields `.`, `..`,
    /// then live file names in insertion order.
    fn readdir(&self, path: &str) -> Result<Vec<String>, Errno>;

    /// Create an empty file.
    fn create(&self, path: &str) -> Result<(), Errno>;

    /// Write `data` at `offset`, returning the byte count written.
    fn write(&self, path: &str, data: &[u8], offset: u64) -> Result<usize, Errno>;

    /// Read up to `size` bytes from `offset`, clipped to the file size.
    fn read(&self, path: &str, size: usize, offset: u64) -> Result<Vec<u8>, Errno>;

    /// Delete a file.
    fn unlink(&self, path: &str) -> Result<(), Errno>;
}

/// The administrative versioning surface.
///
/// Not part of the standard file-call vocabulary: operators address it
/// out-of-band (a control socket, an RPC endpoint, an admin CLI), while the
/// mount loop keeps using [`FilesystemOps`].
pub trait SnapshotControl: Send + Sync {
    /// Capture a point-in-time snapshot, returning its id.
    fn snapshot(&self) -> Result<u64, Errno>;

    /// Atomically replace the live file table with snapshot `id`'s contents.
    fn rollback(&self, id: u64) -> Result<(), Errno>;

    /// Name-keyed comparison of two snapshots.
    fn diff(&self, id1: u64, id2: u64) -> Result<Vec<FileDiff>, Errno>;

    /// Summaries of all captured snapshots, in capture order.
    fn snapshots(&self) -> Vec<SnapshotInfo>;
}
