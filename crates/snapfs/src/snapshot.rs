//! Point-in-time snapshots of the file table.
//!
//! [`SnapshotStore`] keeps an append-only, capacity-bounded sequence of
//! immutable [`Snapshot`]s. Each snapshot is a deep copy of the file table
//! at capture time: mutating the live table afterwards never alters a
//! stored snapshot, and rollback hands back a fresh copy rather than a
//! reference into the store.

use std::time::SystemTime;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::limits::FsLimits;
use crate::store::{File, FileStore, FileTable};

/// An immutable deep copy of the file table at a point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    id: u64,
    created_at: SystemTime,
    files: FileTable,
}

impl Snapshot {
    /// The snapshot's id: 0-based, monotonically increasing, never reused.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// When the snapshot was captured.
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Look up a captured file by name.
    pub fn get(&self, name: &str) -> Option<&File> {
        self.files.get(name)
    }

    /// Captured files, in the order they existed at capture time.
    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.files.values()
    }

    /// Number of captured files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the snapshot captured an empty table.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Operator-facing summary of a stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotInfo {
    /// Snapshot id, usable with rollback and diff.
    pub id: u64,
    /// Capture time.
    pub created_at: SystemTime,
    /// Number of files captured.
    pub file_count: usize,
}

/// How a file changed between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Change {
    /// Present only in the second snapshot.
    Added { after: Vec<u8> },
    /// Present only in the first snapshot.
    Removed { before: Vec<u8> },
    /// Present in both with differing content.
    Modified { before: Vec<u8>, after: Vec<u8> },
}

/// A per-name difference between two snapshots.
///
/// Unchanged files are omitted from diff output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDiff {
    /// The file's name (storage key).
    pub name: String,
    /// The classification and the relevant before/after content.
    pub change: Change,
}

/// The append-only, bounded sequence of snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    snapshots: Vec<Snapshot>,
    limits: FsLimits,
}

impl SnapshotStore {
    /// Create an empty snapshot store with the given bounds.
    pub fn new(limits: FsLimits) -> Self {
        Self {
            snapshots: Vec::new(),
            limits,
        }
    }

    /// Deep-copy `store`'s current contents into a new snapshot and append
    /// it.
    ///
    /// Fails without mutating the store if the snapshot bound is reached.
    pub fn capture(&mut self, store: &FileStore) -> Result<u64> {
        self.limits.check_snapshot_count(self.snapshots.len())?;
        let id = self.snapshots.len() as u64;
        let files = store.entries().clone();
        info!(snapshot_id = id, files = files.len(), "snapshot captured");
        self.snapshots.push(Snapshot {
            id,
            created_at: SystemTime::now(),
            files,
        });
        Ok(id)
    }

    /// Bounds-checked snapshot lookup.
    pub fn get(&self, id: u64) -> Option<&Snapshot> {
        usize::try_from(id).ok().and_then(|i| self.snapshots.get(i))
    }

    /// A fresh deep copy of snapshot `id`'s file table, for the caller to
    /// install as the new live state. The store itself is not mutated.
    pub fn rollback(&self, id: u64) -> Result<FileTable> {
        let snapshot = self.get(id).ok_or(Error::InvalidSnapshot(id))?;
        info!(snapshot_id = id, files = snapshot.files.len(), "rollback copy produced");
        Ok(snapshot.files.clone())
    }

    /// Name-keyed structural comparison of two snapshots.
    ///
    /// Reports every name present in either snapshot whose content differs:
    /// `Removed` and `Modified` entries come first, in the first snapshot's
    /// order, followed by `Added` entries in the second snapshot's order.
    /// Unchanged files are omitted.
    pub fn diff(&self, id1: u64, id2: u64) -> Result<Vec<FileDiff>> {
        let first = self.get(id1).ok_or(Error::InvalidSnapshot(id1))?;
        let second = self.get(id2).ok_or(Error::InvalidSnapshot(id2))?;

        let mut diffs = Vec::new();
        for file in first.files.values() {
            match second.files.get(file.name()) {
                Some(other) if other.content() == file.content() => {}
                Some(other) => diffs.push(FileDiff {
                    name: file.name().to_string(),
                    change: Change::Modified {
                        before: file.content().to_vec(),
                        after: other.content().to_vec(),
                    },
                }),
                None => diffs.push(FileDiff {
                    name: file.name().to_string(),
                    change: Change::Removed {
                        before: file.content().to_vec(),
                    },
                }),
            }
        }
        for file in second.files.values() {
            if !first.files.contains_key(file.name()) {
                diffs.push(FileDiff {
                    name: file.name().to_string(),
                    change: Change::Added {
                        after: file.content().to_vec(),
                    },
                });
            }
        }
        debug!(
            snapshot_a = id1,
            snapshot_b = id2,
            changes = diffs.len(),
            "snapshot diff computed"
        );
        Ok(diffs)
    }

    /// Summaries of all stored snapshots, in capture order.
    pub fn list(&self) -> Vec<SnapshotInfo> {
        self.snapshots
            .iter()
            .map(|s| SnapshotInfo {
                id: s.id,
                created_at: s.created_at,
                file_count: s.files.len(),
            })
            .collect()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no snapshot has been captured yet.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileStore;
    use pretty_assertions::assert_eq;

    fn table(entries: &[(&str, &[u8])]) -> FileStore {
        let mut fs = FileStore::new(FsLimits::new());
        for (name, content) in entries {
            fs.create(name).unwrap();
            fs.write(name, 0, content).unwrap();
        }
        fs
    }

    #[test]
    fn capture_assigns_monotonic_ids() {
        let mut snaps = SnapshotStore::new(FsLimits::new());
        let fs = table(&[("a", b"x")]);
        assert_eq!(snaps.capture(&fs).unwrap(), 0);
        assert_eq!(snaps.capture(&fs).unwrap(), 1);
        assert_eq!(snaps.capture(&fs).unwrap(), 2);
        assert_eq!(snaps.len(), 3);
    }

    #[test]
    fn capture_respects_snapshot_bound() {
        let limits = FsLimits::new().max_snapshots(2);
        let mut snaps = SnapshotStore::new(limits);
        let fs = table(&[]);
        snaps.capture(&fs).unwrap();
        snaps.capture(&fs).unwrap();
        assert_eq!(
            snaps.capture(&fs),
            Err(Error::SnapshotStoreFull { count: 2, limit: 2 })
        );
        assert_eq!(snaps.len(), 2);
    }

    #[test]
    fn snapshots_are_deep_copies() {
        let mut snaps = SnapshotStore::new(FsLimits::new());
        let mut fs = table(&[("a", b"before")]);
        let id = snaps.capture(&fs).unwrap();

        fs.write("a", 0, b"after").unwrap();
        fs.create("b").unwrap();
        fs.delete("a").unwrap();

        let snap = snaps.get(id).unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.get("a").unwrap().content(), b"before");
        assert!(snap.get("b").is_none());
    }

    #[test]
    fn rollback_returns_copy_without_mutating_store() {
        let mut snaps = SnapshotStore::new(FsLimits::new());
        let fs = table(&[("a", b"x"), ("b", b"y")]);
        let id = snaps.capture(&fs).unwrap();

        let mut restored = snaps.rollback(id).unwrap();
        restored.shift_remove("a");

        // The stored snapshot is untouched by whatever the caller does.
        assert_eq!(snaps.get(id).unwrap().len(), 2);
        assert_eq!(snaps.len(), 1);
    }

    #[test]
    fn rollback_of_unknown_id_fails() {
        let snaps = SnapshotStore::new(FsLimits::new());
        assert_eq!(snaps.rollback(0), Err(Error::InvalidSnapshot(0)));
    }

    #[test]
    fn diff_is_name_keyed() {
        let mut snaps = SnapshotStore::new(FsLimits::new());
        let s1 = table(&[("a", b"x"), ("b", b"y")]);
        let s2 = table(&[("a", b"x"), ("c", b"z")]);
        let id1 = snaps.capture(&s1).unwrap();
        let id2 = snaps.capture(&s2).unwrap();

        let diffs = snaps.diff(id1, id2).unwrap();
        assert_eq!(
            diffs,
            vec![
                FileDiff {
                    name: "b".into(),
                    change: Change::Removed { before: b"y".to_vec() },
                },
                FileDiff {
                    name: "c".into(),
                    change: Change::Added { after: b"z".to_vec() },
                },
            ]
        );
    }

    #[test]
    fn diff_reports_modified_content() {
        let mut snaps = SnapshotStore::new(FsLimits::new());
        let s1 = table(&[("a", b"Hello")]);
        let s2 = table(&[("a", b"Bye")]);
        let id1 = snaps.capture(&s1).unwrap();
        let id2 = snaps.capture(&s2).unwrap();

        let diffs = snaps.diff(id1, id2).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].name, "a");
        assert_eq!(
            diffs[0].change,
            Change::Modified {
                before: b"Hello".to_vec(),
                after: b"Bye".to_vec(),
            }
        );
    }

    #[test]
    fn diff_survives_reordering_after_deletions() {
        // Same membership reached through different insertion histories must
        // produce an empty diff.
        let mut snaps = SnapshotStore::new(FsLimits::new());
        let s1 = table(&[("a", b"1"), ("b", b"2")]);
        let mut s2 = table(&[("b", b"2")]);
        s2.create("a").unwrap();
        s2.write("a", 0, b"1").unwrap();
        let id1 = snaps.capture(&s1).unwrap();
        let id2 = snaps.capture(&s2).unwrap();
        assert_eq!(snaps.diff(id1, id2).unwrap(), vec![]);
    }

    #[test]
    fn diff_of_unknown_ids_fails() {
        let mut snaps = SnapshotStore::new(FsLimits::new());
        let fs = table(&[]);
        let id = snaps.capture(&fs).unwrap();
        assert_eq!(snaps.diff(id, 7), Err(Error::InvalidSnapshot(7)));
        assert_eq!(snaps.diff(7, id), Err(Error::InvalidSnapshot(7)));
    }

    #[test]
    fn list_reflects_capture_order() {
        let mut snaps = SnapshotStore::new(FsLimits::new());
        let empty = table(&[]);
        let two = table(&[("a", b"1"), ("b", b"2")]);
        snaps.capture(&empty).unwrap();
        snaps.capture(&two).unwrap();

        let infos = snaps.list();
        assert_eq!(infos.len(), 2);
        assert_eq!((infos[0].id, infos[0].file_count), (0, 0));
        assert_eq!((infos[1].id, infos[1].file_count), (1, 2));
    }
}
