//! Durable, identity-keyed snapshot storage with diff-and-persist semantics.
//!
//! Each watched domain owns one directory holding a single record file per
//! entity (`<id>.json`, full field set preserved) plus a marker file whose
//! presence distinguishes "initialized empty store" from "directory we know
//! nothing about". The store is the sole writer for its directory; a second
//! writer is undefined behavior, detected best-effort when the marker
//! disappears between cycles.

mod error;

pub use error::StoreError;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::models::{Change, ChangeSet, Record, Snapshot};
use crate::validation::validate_id;

/// Marker file that flags a directory as a managed snapshot location.
/// Its content is advisory: the RFC 3339 time of the last reconcile.
pub const MARKER_FILE: &str = ".vigil";

/// Durable last-known state of one watched collection.
///
/// Constructed once per monitored domain via [`SnapshotStore::open`] and
/// owned by that domain's monitor loop for the process lifetime. Records
/// are created and destroyed only through [`SnapshotStore::reconcile`].
pub struct SnapshotStore<T: Record> {
    dir: PathBuf,
    records: Snapshot<T>,
}

impl<T: Record> SnapshotStore<T> {
    /// Bind to a snapshot directory, creating it if necessary.
    ///
    /// An absent or empty directory becomes a fresh store (marker written,
    /// zero records). A directory carrying the marker is loaded as the
    /// initial before-state. A directory with content but no marker is
    /// ambiguous partial state and fails with [`StoreError::Corrupt`]
    /// rather than being silently adopted or wiped.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        let marker = dir.join(MARKER_FILE);

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
            write_marker(&dir)?;
            debug!(dir = %dir.display(), "initialized fresh snapshot store");
            return Ok(Self {
                dir,
                records: Snapshot::new(),
            });
        }

        if marker.exists() {
            let records = load_records(&dir)?;
            debug!(
                dir = %dir.display(),
                records = records.len(),
                "opened existing snapshot store"
            );
            return Ok(Self { dir, records });
        }

        let mut entries = fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;
        if entries.next().is_some() {
            return Err(StoreError::Corrupt {
                path: dir,
                detail: "directory has content but no marker file; refusing to adopt it"
                    .to_string(),
            });
        }

        write_marker(&dir)?;
        debug!(dir = %dir.display(), "initialized snapshot store in empty directory");
        Ok(Self {
            dir,
            records: Snapshot::new(),
        })
    }

    /// The directory this store persists into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Current in-memory state, equal to what is persisted on disk after
    /// every successful `open`/`reconcile`.
    pub fn records(&self) -> &Snapshot<T> {
        &self.records
    }

    /// Diff the stored state against a freshly fetched snapshot, persist
    /// the new state, and return every detected change.
    ///
    /// The diff is computed set-theoretically over the two key sets, so no
    /// ordering of the source collection is assumed: ids present in both
    /// snapshots are compared structurally (equal means no operation and no
    /// write), ids only in the stored state become `Deleted` and their
    /// files are removed, ids only in the new snapshot become `Created` and
    /// their files are written. Afterwards the store equals `incoming`
    /// exactly.
    ///
    /// Fails with [`StoreError::Unavailable`] if the marker has vanished
    /// since `open`; the check runs before any write. A write failure after
    /// it aborts the call and leaves the in-memory state untouched, though
    /// files written earlier in the same call remain on disk (no multi-file
    /// transaction; see DESIGN.md).
    pub fn reconcile(&mut self, incoming: Snapshot<T>) -> Result<ChangeSet<T>, StoreError> {
        if !self.dir.join(MARKER_FILE).exists() {
            return Err(StoreError::Unavailable {
                path: self.dir.clone(),
            });
        }

        let changes = diff(&self.records, &incoming);

        for (id, change) in &changes {
            let path = self.record_path(id)?;
            match change {
                Change::Created(record) | Change::Updated { after: record, .. } => {
                    let json = serde_json::to_string_pretty(record)
                        .map_err(|e| StoreError::Encode {
                            id: id.clone(),
                            source: e,
                        })?;
                    fs::write(&path, json).map_err(|e| StoreError::io(&path, e))?;
                }
                Change::Deleted(_) => {
                    fs::remove_file(&path).map_err(|e| StoreError::io(&path, e))?;
                }
            }
        }

        write_marker(&self.dir)?;
        self.records = incoming;

        if !changes.is_empty() {
            debug!(
                dir = %self.dir.display(),
                changes = changes.len(),
                "reconciled snapshot"
            );
        }

        Ok(changes)
    }

    fn record_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        validate_id(id).map_err(|e| StoreError::InvalidId {
            id: id.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.dir.join(format!("{id}.json")))
    }
}

/// Compute the change set between a stored state and a fetched snapshot.
fn diff<T: Record>(before: &Snapshot<T>, after: &Snapshot<T>) -> ChangeSet<T> {
    let mut changes = ChangeSet::new();

    for (id, new) in after {
        match before.get(id) {
            Some(old) if old == new => {}
            Some(old) => {
                changes.insert(
                    id.clone(),
                    Change::Updated {
                        before: old.clone(),
                        after: new.clone(),
                    },
                );
            }
            None => {
                changes.insert(id.clone(), Change::Created(new.clone()));
            }
        }
    }

    for (id, old) in before {
        if !after.contains_key(id) {
            changes.insert(id.clone(), Change::Deleted(old.clone()));
        }
    }

    changes
}

fn write_marker(dir: &Path) -> Result<(), StoreError> {
    let marker = dir.join(MARKER_FILE);
    fs::write(&marker, Utc::now().to_rfc3339()).map_err(|e| StoreError::io(&marker, e))
}

/// Load every `<id>.json` record from a marker-bearing directory.
///
/// A record that fails to deserialize is fatal: it means corruption or a
/// schema change, which must never be silently defaulted. A record whose
/// embedded id disagrees with its file name is treated as corruption too.
fn load_records<T: Record>(dir: &Path) -> Result<Snapshot<T>, StoreError> {
    let mut records = Snapshot::new();

    let entries = fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(dir, e))?;
        let path = entry.path();

        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let text = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        let record: T = serde_json::from_str(&text).map_err(|e| StoreError::BadRecord {
            id: id.to_string(),
            source: e,
        })?;

        if record.id() != id {
            return Err(StoreError::Corrupt {
                path: path.clone(),
                detail: format!(
                    "record file is named '{id}' but its content says id '{}'",
                    record.id()
                ),
            });
        }

        records.insert(id.to_string(), record);
    }

    Ok(records)
}
