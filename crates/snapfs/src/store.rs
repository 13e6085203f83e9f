//! Live file table.
//!
//! [`FileStore`] owns the current set of files, keyed by name in insertion
//! order. Lookup is O(1); `list()` and snapshot capture see files in the
//! order they were created, and deletion compacts the table without
//! disturbing the relative order of the survivors.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::limits::FsLimits;

/// The name-keyed, insertion-ordered file table underlying [`FileStore`]
/// and [`Snapshot`](crate::Snapshot).
pub type FileTable = IndexMap<String, File>;

/// A single filesystem entry.
///
/// `content.len()` is the file's logical size. A write at `offset` sets the
/// size to `offset + data.len()`, truncating anything beyond it and
/// zero-filling any gap below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    name: String,
    content: Vec<u8>,
}

impl File {
    fn new(name: String) -> Self {
        Self {
            name,
            content: Vec::new(),
        }
    }

    /// The file's name (its storage key).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file's content up to its logical size.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The file's logical size in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// The live, mutable table of current files.
#[derive(Debug, Clone)]
pub struct FileStore {
    files: IndexMap<String, File>,
    limits: FsLimits,
}

impl FileStore {
    /// Create an empty file table with the given bounds.
    pub fn new(limits: FsLimits) -> Self {
        Self {
            files: IndexMap::new(),
            limits,
        }
    }

    /// Exact-name lookup. Absence is not an error.
    pub fn find(&self, name: &str) -> Option<&File> {
        self.files.get(name)
    }

    /// Create an empty file.
    ///
    /// Fails if the name is invalid, a file with the name already exists,
    /// or the table is at its bound. The table is unchanged on failure.
    pub fn create(&mut self, name: &str) -> Result<()> {
        self.limits.validate_name(name)?;
        if self.files.contains_key(name) {
            return Err(Error::AlreadyExists(name.to_string()));
        }
        self.limits.check_file_count(self.files.len())?;
        self.files
            .insert(name.to_string(), File::new(name.to_string()));
        Ok(())
    }

    /// Write `data` into the file at `offset`, returning the byte count.
    ///
    /// Sets the file's size to `offset + data.len()` regardless of the prior
    /// size; a gap between the old end and `offset` is zero-filled. Fails if
    /// the file does not exist or the new extent exceeds the content bound.
    pub fn write(&mut self, name: &str, offset: usize, data: &[u8]) -> Result<usize> {
        let file = self
            .files
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        let end = offset
            .checked_add(data.len())
            .ok_or(Error::ContentTooLarge {
                end: usize::MAX,
                limit: self.limits.max_content_size,
            })?;
        self.limits.check_content_extent(end)?;

        // size = offset + len, never max(old, offset + len)
        file.content.resize(offset, 0);
        file.content.extend_from_slice(data);
        Ok(data.len())
    }

    /// Read up to `max_len` bytes from `offset`, clipped to the file size.
    ///
    /// Reading at or past the end returns an empty slice, not an error.
    pub fn read(&self, name: &str, offset: usize, max_len: usize) -> Result<&[u8]> {
        let file = self
            .files
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        if offset >= file.content.len() {
            return Ok(&[]);
        }
        let end = file.content.len().min(offset.saturating_add(max_len));
        Ok(&file.content[offset..end])
    }

    /// Remove a file. Surviving files keep their relative order.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.files
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Current file names, in insertion order.
    pub fn list(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    /// Number of live files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the table holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The underlying table, for snapshot capture.
    pub(crate) fn entries(&self) -> &FileTable {
        &self.files
    }

    /// Replace the entire table with `files`.
    ///
    /// This is the rollback installation step: a full substitution, not a
    /// merge.
    pub fn replace(&mut self, files: FileTable) {
        self.files = files;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn store() -> FileStore {
        FileStore::new(FsLimits::new())
    }

    #[test]
    fn create_write_read_round_trip() {
        let mut fs = store();
        fs.create("notes").unwrap();
        assert_eq!(fs.write("notes", 0, b"hello").unwrap(), 5);
        assert_eq!(fs.read("notes", 0, 64).unwrap(), b"hello");
        assert_eq!(fs.find("notes").unwrap().size(), 5);
    }

    #[test]
    fn create_is_unique() {
        let mut fs = store();
        fs.create("a").unwrap();
        assert_eq!(fs.create("a"), Err(Error::AlreadyExists("a".into())));
        fs.delete("a").unwrap();
        fs.create("a").unwrap();
    }

    #[test]
    fn create_respects_file_bound() {
        let mut fs = FileStore::new(FsLimits::new().max_files(2));
        fs.create("a").unwrap();
        fs.create("b").unwrap();
        assert_eq!(
            fs.create("c"),
            Err(Error::FileTableFull { count: 2, limit: 2 })
        );
        assert_eq!(fs.len(), 2);
    }

    #[test]
    fn write_sets_size_to_offset_plus_len() {
        // Deliberately mirrors the engine's size policy: a shorter write at
        // offset 0 shrinks the file.
        let mut fs = store();
        fs.create("f").unwrap();
        fs.write("f", 0, b"Hello, World!").unwrap();
        assert_eq!(fs.find("f").unwrap().size(), 13);
        fs.write("f", 0, b"Bye").unwrap();
        assert_eq!(fs.find("f").unwrap().size(), 3);
        assert_eq!(fs.read("f", 0, 64).unwrap(), b"Bye");
    }

    #[test]
    fn write_past_end_zero_fills_gap() {
        let mut fs = store();
        fs.create("f").unwrap();
        fs.write("f", 0, b"ab").unwrap();
        fs.write("f", 4, b"cd").unwrap();
        assert_eq!(fs.read("f", 0, 64).unwrap(), b"ab\0\0cd");
        assert_eq!(fs.find("f").unwrap().size(), 6);
    }

    #[test]
    fn write_beyond_content_bound_fails_unchanged() {
        let mut fs = FileStore::new(FsLimits::new().max_content_size(8));
        fs.create("f").unwrap();
        fs.write("f", 0, b"12345678").unwrap();
        assert_eq!(
            fs.write("f", 4, b"12345"),
            Err(Error::ContentTooLarge { end: 9, limit: 8 })
        );
        assert_eq!(fs.read("f", 0, 64).unwrap(), b"12345678");
    }

    #[test]
    fn read_at_or_past_size_is_empty() {
        let mut fs = store();
        fs.create("f").unwrap();
        fs.write("f", 0, b"xyz").unwrap();
        assert_eq!(fs.read("f", 3, 10).unwrap(), b"");
        assert_eq!(fs.read("f", 100, 10).unwrap(), b"");
    }

    #[test]
    fn read_clips_to_size() {
        let mut fs = store();
        fs.create("f").unwrap();
        fs.write("f", 0, b"abcdef").unwrap();
        assert_eq!(fs.read("f", 2, 100).unwrap(), b"cdef");
        assert_eq!(fs.read("f", 2, 2).unwrap(), b"cd");
    }

    #[test]
    fn missing_file_errors() {
        let mut fs = store();
        assert_eq!(
            fs.write("nope", 0, b"x"),
            Err(Error::NotFound("nope".into()))
        );
        assert_eq!(fs.read("nope", 0, 1), Err(Error::NotFound("nope".into())));
        assert_eq!(fs.delete("nope"), Err(Error::NotFound("nope".into())));
        assert!(fs.find("nope").is_none());
    }

    #[test]
    fn delete_compacts_preserving_order() {
        let mut fs = store();
        for name in ["a", "b", "c", "d"] {
            fs.create(name).unwrap();
        }
        fs.delete("b").unwrap();
        assert_eq!(fs.list(), vec!["a", "c", "d"]);
    }

    proptest! {
        #[test]
        fn round_trip_any_payload(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let mut fs = store();
            fs.create("blob").unwrap();
            fs.write("blob", 0, &data).unwrap();
            prop_assert_eq!(fs.read("blob", 0, data.len()).unwrap(), &data[..]);
            prop_assert_eq!(fs.find("blob").unwrap().size(), data.len());
        }
    }
}
