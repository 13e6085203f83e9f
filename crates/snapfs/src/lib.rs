//! SnapFS - Versioned in-memory file system engine
//!
//! An in-memory virtual filesystem with point-in-time snapshots, rollback,
//! and content diffing, built to sit behind a user-space filesystem dispatch
//! layer. The dispatch mechanism itself (mount handling, message transport)
//! is out of scope: this crate is the storage engine and its protocol
//! adapter.
//!
//! Two public trait seams split the surface:
//!
//! - [`FilesystemOps`]: the standard file-call vocabulary (`getattr`,
//!   `readdir`, `create`, `read`, `write`, `unlink`), with failures drawn
//!   from the closed errno set `{ENOENT, EEXIST, ENOSPC, EFBIG, EINVAL}`.
//! - [`SnapshotControl`]: the administrative versioning surface
//!   (`snapshot`, `rollback`, `diff`, `snapshots`), meant to be wired to an
//!   out-of-band operator channel rather than the mount loop.
//!
//! # Example
//!
//! ```rust
//! use snapfs::{FilesystemOps, SnapFs, SnapshotControl};
//!
//! fn main() -> Result<(), snapfs::Errno> {
//!     let fs = SnapFs::new();
//!
//!     fs.create("/greeting")?;
//!     fs.write("/greeting", b"Hello", 0)?;
//!     let before = fs.snapshot()?;
//!
//!     fs.write("/greeting", b"Bye", 0)?;
//!     let after = fs.snapshot()?;
//!
//!     // One modified file between the two snapshots.
//!     assert_eq!(fs.diff(before, after)?.len(), 1);
//!
//!     // Rollback is a full substitution of the live table.
//!     fs.rollback(before)?;
//!     assert_eq!(fs.read("/greeting", 64, 0)?, b"Hello");
//!     Ok(())
//! }
//! ```
//!
//! # Bounds
//!
//! Every table is capacity-bounded ([`FsLimits`]); exceeding a bound is a
//! reported, recoverable error, never a silent truncation. All state is
//! volatile and lives only for the process lifetime.

mod error;
mod limits;
mod snapshot;
mod store;
mod traits;
mod vfs;

pub use error::{Errno, Error, Result};
pub use limits::{
    FsLimits, DEFAULT_MAX_CONTENT_SIZE, DEFAULT_MAX_FILES, DEFAULT_MAX_NAME_LENGTH,
    DEFAULT_MAX_SNAPSHOTS,
};
pub use snapshot::{Change, FileDiff, Snapshot, SnapshotInfo, SnapshotStore};
pub use store::{File, FileStore, FileTable};
pub use traits::{FileType, FilesystemOps, Metadata, SnapshotControl};
pub use vfs::SnapFs;
