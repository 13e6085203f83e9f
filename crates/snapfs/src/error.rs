//! Error types for SnapFS
//!
//! Two layers of error vocabulary live here:
//!
//! - [`Error`]: the storage-engine taxonomy. Every failure a [`FileStore`]
//!   or [`SnapshotStore`] operation can produce is one of these variants.
//! - [`Errno`]: the protocol-facing codes spoken by the adapter. Each
//!   [`Error`] maps to exactly one [`Errno`]; no other codes are produced.
//!
//! [`FileStore`]: crate::FileStore
//! [`SnapshotStore`]: crate::SnapshotStore

use serde::Serialize;
use thiserror::Error;

/// Result type alias using SnapFS's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// SnapFS storage errors.
///
/// All of these are expected, recoverable conditions: a failed operation
/// leaves the file table and snapshot store unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No file with the given name exists.
    #[error("file not found: {0}")]
    NotFound(String),

    /// A file with the given name already exists.
    #[error("file exists: {0}")]
    AlreadyExists(String),

    /// The file table is at its configured bound.
    #[error("file table full: {count} files at {limit} file limit")]
    FileTableFull { count: usize, limit: usize },

    /// The snapshot store is at its configured bound.
    #[error("snapshot store full: {count} snapshots at {limit} snapshot limit")]
    SnapshotStoreFull { count: usize, limit: usize },

    /// A write would extend the file past the maximum content size.
    #[error("content too large: write extends to {end} bytes, limit is {limit}")]
    ContentTooLarge { end: usize, limit: usize },

    /// The file name exceeds the maximum name length.
    ///
    /// Over-long names are rejected outright, never truncated to fit.
    #[error("name too long: {length} bytes exceeds {limit} byte limit")]
    NameTooLong { length: usize, limit: usize },

    /// The snapshot id does not reference a captured snapshot.
    #[error("invalid snapshot id: {0}")]
    InvalidSnapshot(u64),
}

/// Standardized protocol error codes produced by the adapter layer.
///
/// The set is closed: `{ENOENT, EEXIST, ENOSPC, EFBIG, EINVAL}`. Dispatch
/// layers that speak an errno-based protocol can pass [`Errno::as_raw`]
/// straight through (negated, if the transport uses the negative-return
/// convention).
#[allow(clippy::upper_case_acronyms)]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Errno {
    /// No such file or directory.
    #[error("no such file or directory (ENOENT)")]
    ENOENT,
    /// File exists.
    #[error("file exists (EEXIST)")]
    EEXIST,
    /// No space left on device.
    #[error("no space left on device (ENOSPC)")]
    ENOSPC,
    /// File too large.
    #[error("file too large (EFBIG)")]
    EFBIG,
    /// Invalid argument.
    #[error("invalid argument (EINVAL)")]
    EINVAL,
}

impl Errno {
    /// The raw errno value, as defined by POSIX.
    pub fn as_raw(self) -> i32 {
        match self {
            Errno::ENOENT => 2,
            Errno::EEXIST => 17,
            Errno::EINVAL => 22,
            Errno::EFBIG => 27,
            Errno::ENOSPC => 28,
        }
    }
}

impl From<Error> for Errno {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(_) => Errno::ENOENT,
            Error::AlreadyExists(_) => Errno::EEXIST,
            Error::FileTableFull { .. } | Error::SnapshotStoreFull { .. } => Errno::ENOSPC,
            Error::ContentTooLarge { .. } => Errno::EFBIG,
            Error::NameTooLong { .. } | Error::InvalidSnapshot(_) => Errno::EINVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_mapping_is_exhaustive_and_stable() {
        assert_eq!(Errno::from(Error::NotFound("a".into())), Errno::ENOENT);
        assert_eq!(Errno::from(Error::AlreadyExists("a".into())), Errno::EEXIST);
        assert_eq!(
            Errno::from(Error::FileTableFull { count: 1, limit: 1 }),
            Errno::ENOSPC
        );
        assert_eq!(
            Errno::from(Error::SnapshotStoreFull { count: 1, limit: 1 }),
            Errno::ENOSPC
        );
        assert_eq!(
            Errno::from(Error::ContentTooLarge { end: 2, limit: 1 }),
            Errno::EFBIG
        );
        assert_eq!(
            Errno::from(Error::NameTooLong { length: 2, limit: 1 }),
            Errno::EINVAL
        );
        assert_eq!(Errno::from(Error::InvalidSnapshot(9)), Errno::EINVAL);
    }

    #[test]
    fn raw_values_match_posix() {
        assert_eq!(Errno::ENOENT.as_raw(), 2);
        assert_eq!(Errno::EEXIST.as_raw(), 17);
        assert_eq!(Errno::EINVAL.as_raw(), 22);
        assert_eq!(Errno::EFBIG.as_raw(), 27);
        assert_eq!(Errno::ENOSPC.as_raw(), 28);
    }
}
