//! Resource bounds for the in-memory engine.
//!
//! All state is volatile and lives in process memory, so every table is
//! capacity-bounded. Exceeding a bound is an expected, recoverable condition
//! reported to the caller; nothing is silently truncated or dropped.

use crate::error::{Error, Result};

/// Default maximum number of live files: 100
pub const DEFAULT_MAX_FILES: usize = 100;

/// Default maximum number of stored snapshots: 100
pub const DEFAULT_MAX_SNAPSHOTS: usize = 100;

/// Default maximum content size of a single file: 64KB
pub const DEFAULT_MAX_CONTENT_SIZE: usize = 65536;

/// Default maximum file name length: 255 bytes
pub const DEFAULT_MAX_NAME_LENGTH: usize = 255;

/// Resource bounds for a SnapFS instance.
///
/// Fixed at construction time; none of these are adjustable once the
/// engine is running.
///
/// # Example
///
/// ```rust
/// use snapfs::FsLimits;
///
/// let limits = FsLimits::new()
///     .max_files(16)
///     .max_snapshots(8)
///     .max_content_size(4096);
/// ```
///
/// # Default Limits
///
/// | Limit | Default | Purpose |
/// |-------|---------|---------|
/// | `max_files` | 100 | Live file table size |
/// | `max_snapshots` | 100 | Snapshot store size |
/// | `max_content_size` | 64KB | Single file content |
/// | `max_name_length` | 255 | File name (storage key) |
#[derive(Debug, Clone)]
pub struct FsLimits {
    /// Maximum number of live files.
    /// Default: 100
    pub max_files: usize,

    /// Maximum number of snapshots that can be captured.
    /// Default: 100
    pub max_snapshots: usize,

    /// Maximum content size of a single file in bytes.
    /// Default: 65,536
    pub max_content_size: usize,

    /// Maximum file name length in bytes.
    /// Default: 255
    pub max_name_length: usize,
}

impl Default for FsLimits {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_snapshots: DEFAULT_MAX_SNAPSHOTS,
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

impl FsLimits {
    /// Create new limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum live file count.
    pub fn max_files(mut self, count: usize) -> Self {
        self.max_files = count;
        self
    }

    /// Set maximum snapshot count.
    pub fn max_snapshots(mut self, count: usize) -> Self {
        self.max_snapshots = count;
        self
    }

    /// Set maximum single-file content size.
    pub fn max_content_size(mut self, bytes: usize) -> Self {
        self.max_content_size = bytes;
        self
    }

    /// Set maximum file name length.
    pub fn max_name_length(mut self, len: usize) -> Self {
        self.max_name_length = len;
        self
    }

    /// Validate a file name against the length bound.
    ///
    /// Empty names are rejected as well: the empty key is reserved for the
    /// root directory at the adapter layer.
    pub fn validate_name(&self, name: &str) -> Result<()> {
        if name.is_empty() || name.len() > self.max_name_length {
            return Err(Error::NameTooLong {
                length: name.len(),
                limit: self.max_name_length,
            });
        }
        Ok(())
    }

    /// Check whether one more file fits in the table.
    pub fn check_file_count(&self, current: usize) -> Result<()> {
        if current >= self.max_files {
            return Err(Error::FileTableFull {
                count: current,
                limit: self.max_files,
            });
        }
        Ok(())
    }

    /// Check whether one more snapshot fits in the store.
    pub fn check_snapshot_count(&self, current: usize) -> Result<()> {
        if current >= self.max_snapshots {
            return Err(Error::SnapshotStoreFull {
                count: current,
                limit: self.max_snapshots,
            });
        }
        Ok(())
    }

    /// Check that a write ending at `end` stays within the content bound.
    pub fn check_content_extent(&self, end: usize) -> Result<()> {
        if end > self.max_content_size {
            return Err(Error::ContentTooLarge {
                end,
                limit: self.max_content_size,
            });
        }
        Ok(())
    }
}
