//! Intake queue between discovery and classification.
//!
//! The watcher callback and manual scans produce paths; the drain
//! consumes them in arrival order. Duplicates are allowed here and
//! resolved at record creation, where the live-record check lives.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Thread-safe FIFO of discovered paths. Shared behind an `Arc` between
/// the watcher thread and the drain.
#[derive(Default)]
pub struct IntakeQueue {
    paths: Mutex<VecDeque<PathBuf>>,
}

impl IntakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, path: PathBuf) {
        self.lock().push_back(path);
    }

    pub fn extend(&self, paths: impl IntoIterator<Item = PathBuf>) {
        self.lock().extend(paths);
    }

    /// Take everything queued so far, in arrival order.
    pub fn drain_all(&self) -> Vec<PathBuf> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<PathBuf>> {
        self.paths.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
