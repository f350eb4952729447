//! Pipeline facade.
//!
//! Owns the intake queue, lifecycle store, registry and classifier, and
//! exposes every operation an embedding surface (CLI, tray UI) needs.
//! All methods take `&self`; internal locking keeps the store and queue
//! consistent across the watcher thread and operator calls.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::{Classification, Classifier};
use crate::config::Settings;
use crate::error::{RegistryError, StateError, WatchError};
use crate::extract::{PdfTextExtractor, TextExtractor};
use crate::intake::IntakeQueue;
use crate::lifecycle::record::DocumentRecord;
use crate::lifecycle::store::{LifecycleStore, TransitionReport};
use crate::registry::CustomerRegistry;
use crate::services::watcher::{self, WatchService};

/// Result of one drain pass over the intake queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrainReport {
    /// Ids of records created this pass, in discovery order.
    pub created: Vec<Uuid>,
    /// Paths without a recognized marker, left alone.
    pub ignored_count: usize,
    /// Paths whose classification failed; no record, file untouched.
    pub failed_count: usize,
    /// Paths already owned by a live record.
    pub duplicate_count: usize,
}

impl DrainReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
            && self.ignored_count == 0
            && self.failed_count == 0
            && self.duplicate_count == 0
    }
}

pub struct Pipeline {
    settings: Settings,
    queue: Arc<IntakeQueue>,
    store: Mutex<LifecycleStore>,
    registry: Arc<RwLock<CustomerRegistry>>,
    classifier: Classifier,
    /// Held across a whole drain pass; a drain never overlaps another.
    drain_lock: Mutex<()>,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Result<Self, RegistryError> {
        Self::with_extractor(settings, Arc::new(PdfTextExtractor::new()))
    }

    /// Build a pipeline with a custom extractor (for testing).
    pub fn with_extractor(
        settings: Settings,
        extractor: Arc<dyn TextExtractor>,
    ) -> Result<Self, RegistryError> {
        let registry = Arc::new(RwLock::new(CustomerRegistry::load(
            settings.registry_file.clone(),
        )?));
        let classifier = Classifier::new(extractor, Arc::clone(&registry));
        let store = Mutex::new(LifecycleStore::new(settings.destinations.clone()));

        Ok(Self {
            settings,
            queue: Arc::new(IntakeQueue::new()),
            store,
            registry,
            classifier,
            drain_lock: Mutex::new(()),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Start the folder watcher feeding this pipeline's queue. The
    /// returned service must be kept alive for the watch to continue.
    pub fn start_watcher(&self) -> Result<WatchService, WatchError> {
        watcher::start_watcher(
            Arc::clone(&self.queue),
            self.settings.watch_dir.clone(),
            self.settings.debounce(),
        )
    }

    /// Queue a single file handed in from outside the watcher (file
    /// association, drag and drop). Returns `false` for non-PDFs.
    ///
    /// Records pin the file's absolute location, so a relative path is
    /// resolved against the working directory on entry.
    pub fn enqueue_file(&self, path: &Path) -> bool {
        if !watcher::is_pdf(path) || !path.is_file() {
            tracing::warn!(path = %path.display(), "not a PDF file, ignoring");
            return false;
        }
        match std::path::absolute(path) {
            Ok(absolute) => {
                self.queue.push(absolute);
                true
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot resolve path, ignoring");
                false
            }
        }
    }

    /// Queue every PDF currently sitting in the watched folder
    /// (non-recursive). Complements the watcher for files that arrived
    /// while the pipeline was down.
    pub fn scan_watch_dir(&self) -> io::Result<usize> {
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.settings.watch_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if watcher::is_pdf(&path) {
                found.push(path);
            }
        }

        let count = found.len();
        self.queue.extend(found);

        tracing::info!(
            count,
            dir = %self.settings.watch_dir.display(),
            "manual scan queued files"
        );
        Ok(count)
    }

    /// Classify everything queued and create pending records.
    ///
    /// One failure never stops the pass. The drain lock guarantees a
    /// single active drain even when a timer tick and a manual call race.
    pub fn drain_once(&self) -> DrainReport {
        let _guard = self
            .drain_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut report = DrainReport::default();
        for path in self.queue.drain_all() {
            match self.classifier.classify(&path) {
                Classification::Matched(doc) => {
                    match self.lock_store().create_pending(path, doc) {
                        Some(id) => report.created.push(id),
                        None => report.duplicate_count += 1,
                    }
                }
                Classification::Ignored => report.ignored_count += 1,
                // Already logged by the classifier.
                Classification::Failed { .. } => report.failed_count += 1,
            }
        }

        if !report.is_empty() {
            tracing::info!(
                created = report.created.len(),
                ignored = report.ignored_count,
                failed = report.failed_count,
                duplicates = report.duplicate_count,
                "drain pass complete"
            );
        }
        report
    }

    /// Rename one record to its canonical name.
    pub fn rename_record(&self, id: Uuid) -> Result<PathBuf, StateError> {
        self.lock_store().rename(id)
    }

    /// Move one renamed record into the archive.
    pub fn move_record(&self, id: Uuid) -> Result<PathBuf, StateError> {
        self.lock_store().move_to_archive(id)
    }

    /// Rename the selected records; non-pending ones are skipped.
    pub fn rename_records(&self, ids: &[Uuid]) -> TransitionReport {
        self.lock_store().rename_batch(ids)
    }

    /// Move the selected records; non-renamed ones are skipped.
    pub fn move_records(&self, ids: &[Uuid]) -> TransitionReport {
        self.lock_store().move_batch(ids)
    }

    /// Snapshot of all records in discovery order.
    pub fn records(&self) -> Vec<DocumentRecord> {
        self.lock_store().records()
    }

    /// Add a customer to the registry. Takes effect from the next
    /// classification.
    pub fn add_customer(&self, name: &str) -> Result<bool, RegistryError> {
        self.lock_registry_mut().add(name)
    }

    pub fn remove_customer(&self, name: &str) -> Result<bool, RegistryError> {
        self.lock_registry_mut().remove(name)
    }

    pub fn customers(&self) -> Vec<String> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .names()
            .to_vec()
    }

    fn lock_store(&self) -> MutexGuard<'_, LifecycleStore> {
        self.store.lock().unwrap_or_else(|poisoned| {
            tracing::error!("lifecycle store mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lock_registry_mut(&self) -> std::sync::RwLockWriteGuard<'_, CustomerRegistry> {
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
