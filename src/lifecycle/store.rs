//! In-memory lifecycle store and transition execution.
//!
//! Records live for the session, in discovery order. Transitions touch
//! the filesystem first and mutate the record only after the filesystem
//! agreed, so a failed transition leaves the record exactly as it was.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::ClassifiedDocument;
use crate::error::StateError;
use crate::lifecycle::destination::DestinationMap;
use crate::lifecycle::record::{DocumentRecord, RecordState};

/// Result of a batch transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionReport {
    /// Number of records that transitioned.
    pub completed_count: usize,
    /// Number of records skipped because their state did not satisfy the
    /// precondition (or the id was unknown).
    pub skipped_count: usize,
    /// Number of records whose filesystem operation failed.
    pub failed_count: usize,
    /// Error messages from failed transitions.
    pub errors: Vec<String>,
    /// Reasons for skipped records.
    pub skipped: Vec<String>,
    /// Whether no transition failed.
    pub success: bool,
}

pub struct LifecycleStore {
    records: Vec<DocumentRecord>,
    destinations: DestinationMap,
}

impl LifecycleStore {
    pub fn new(destinations: DestinationMap) -> Self {
        Self {
            records: Vec::new(),
            destinations,
        }
    }

    /// Create a pending record for a classified document.
    ///
    /// Returns `None` when a live record already owns the path, which
    /// happens when the watcher and a manual scan both report the same
    /// file before it is processed.
    pub fn create_pending(&mut self, source_path: PathBuf, doc: ClassifiedDocument) -> Option<Uuid> {
        if self
            .records
            .iter()
            .any(|r| r.state.is_live() && r.source_path == source_path)
        {
            tracing::debug!(
                path = %source_path.display(),
                "path already owned by a live record, skipping"
            );
            return None;
        }

        let record = DocumentRecord {
            id: Uuid::new_v4(),
            source_path,
            state: RecordState::Pending,
            doc_type: doc.doc_type,
            proposed_name: doc.proposed_name,
            primary_date: doc.primary_date,
            fields: doc.fields,
            discovered_at: Utc::now(),
        };
        let id = record.id;

        tracing::info!(
            id = %id,
            doc_type = record.doc_type.label(),
            name = %record.proposed_name,
            "pending record created"
        );

        self.records.push(record);
        Some(id)
    }

    /// All records in discovery order.
    pub fn records(&self) -> Vec<DocumentRecord> {
        self.records.clone()
    }

    pub fn get(&self, id: Uuid) -> Option<&DocumentRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rename a pending record's file to its canonical name, in place.
    ///
    /// Requires `Pending`. On success the record is `Renamed` and its
    /// source path points at the new name.
    pub fn rename(&mut self, id: Uuid) -> Result<PathBuf, StateError> {
        let record = self.get_mut(id)?;
        if record.state != RecordState::Pending {
            return Err(StateError::Precondition {
                expected: RecordState::Pending,
                actual: record.state,
            });
        }

        let name = record.proposed_name.clone();
        if name.contains('/') || name.contains('\\') {
            return Err(StateError::InvalidProposedName { name });
        }

        let parent = record
            .source_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| StateError::Io {
                op: "rename",
                path: record.source_path.clone(),
                message: "source path has no parent directory".to_string(),
            })?;
        let new_path = parent.join(&name);

        // The file may already carry its canonical name; renaming onto
        // itself is a state change only, but the file must still be
        // there to advance.
        if new_path == record.source_path {
            if !record.source_path.exists() {
                return Err(StateError::Io {
                    op: "rename",
                    path: record.source_path.clone(),
                    message: "file no longer exists".to_string(),
                });
            }
        } else {
            if new_path.exists() {
                return Err(StateError::DestinationExists { path: new_path });
            }
            fs::rename(&record.source_path, &new_path).map_err(|e| StateError::Io {
                op: "rename",
                path: record.source_path.clone(),
                message: e.to_string(),
            })?;
        }

        record.state = RecordState::Renamed;
        record.source_path = new_path.clone();

        tracing::info!(id = %id, path = %new_path.display(), "record renamed");
        Ok(new_path)
    }

    /// Move a renamed record's file into its archive directory.
    ///
    /// Requires `Renamed`. The directory is created on demand and chosen
    /// by the record's type and primary date. On success the record is
    /// `Moved` and its source path points into the archive.
    pub fn move_to_archive(&mut self, id: Uuid) -> Result<PathBuf, StateError> {
        let (state, doc_type, date, current_path, name) = {
            let record = self
                .records
                .iter()
                .find(|r| r.id == id)
                .ok_or(StateError::RecordNotFound(id))?;
            (
                record.state,
                record.doc_type,
                record.primary_date,
                record.source_path.clone(),
                record.proposed_name.clone(),
            )
        };

        if state != RecordState::Renamed {
            return Err(StateError::Precondition {
                expected: RecordState::Renamed,
                actual: state,
            });
        }

        let archive_dir = self.destinations.archive_dir(doc_type, date);
        fs::create_dir_all(&archive_dir).map_err(|e| StateError::Io {
            op: "move",
            path: archive_dir.clone(),
            message: e.to_string(),
        })?;

        let dest = archive_dir.join(&name);
        if dest.exists() {
            return Err(StateError::DestinationExists { path: dest });
        }

        move_file(&current_path, &dest).map_err(|e| StateError::Io {
            op: "move",
            path: current_path.clone(),
            message: e.to_string(),
        })?;

        let record = self.get_mut(id)?;
        record.state = RecordState::Moved;
        record.source_path = dest.clone();

        tracing::info!(id = %id, path = %dest.display(), "record moved to archive");
        Ok(dest)
    }

    /// Rename each selected record, skipping those not `Pending`.
    pub fn rename_batch(&mut self, ids: &[Uuid]) -> TransitionReport {
        self.run_batch(ids, LifecycleStore::rename)
    }

    /// Move each selected record, skipping those not `Renamed`.
    pub fn move_batch(&mut self, ids: &[Uuid]) -> TransitionReport {
        self.run_batch(ids, LifecycleStore::move_to_archive)
    }

    fn run_batch(
        &mut self,
        ids: &[Uuid],
        op: fn(&mut LifecycleStore, Uuid) -> Result<PathBuf, StateError>,
    ) -> TransitionReport {
        let mut completed = 0usize;
        let mut skipped = Vec::new();
        let mut errors = Vec::new();

        for &id in ids {
            match op(self, id) {
                Ok(_) => completed += 1,
                Err(e)
                    if matches!(
                        e,
                        StateError::Precondition { .. } | StateError::RecordNotFound(_)
                    ) =>
                {
                    tracing::debug!(id = %id, reason = %e, "transition skipped");
                    skipped.push(e.to_string());
                }
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "transition failed");
                    errors.push(e.to_string());
                }
            }
        }

        TransitionReport {
            completed_count: completed,
            skipped_count: skipped.len(),
            failed_count: errors.len(),
            success: errors.is_empty(),
            skipped,
            errors,
        }
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut DocumentRecord, StateError> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StateError::RecordNotFound(id))
    }
}

/// Rename where possible; archive roots commonly sit on a different
/// volume than the watched folder, so fall back to copy + remove there.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}
