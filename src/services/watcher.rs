//! Watched-folder service.
//!
//! A debounced notify watcher feeds the intake queue. Debouncing matters
//! here: accounting exports arrive as a create followed by a burst of
//! writes, and the queue should see the file once, after it settled.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::event::{ModifyKind, RenameMode};
use notify::{EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebouncedEvent, Debouncer, RecommendedCache};

use crate::error::WatchError;
use crate::intake::IntakeQueue;

/// Running watch on a single folder. Dropping it stops the watch.
#[allow(dead_code)]
pub struct WatchService {
    debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
    path: PathBuf,
}

impl WatchService {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Start watching `path` (non-recursively) and push every settled PDF
/// into the queue.
pub fn start_watcher(
    queue: Arc<IntakeQueue>,
    path: PathBuf,
    debounce: Duration,
) -> Result<WatchService, WatchError> {
    let queue_for_events = Arc::clone(&queue);

    let mut debouncer = new_debouncer(
        debounce,
        None,
        move |result: Result<Vec<DebouncedEvent>, Vec<notify::Error>>| match result {
            Ok(events) => {
                for event in events {
                    handle_file_event(&queue_for_events, &event);
                }
            }
            Err(errors) => {
                for error in errors {
                    tracing::warn!("watcher error: {:?}", error);
                }
            }
        },
    )
    .map_err(WatchError::Init)?;

    debouncer
        .watch(&path, RecursiveMode::NonRecursive)
        .map_err(|e| WatchError::Watch {
            path: path.clone(),
            source: e,
        })?;

    tracing::info!(path = %path.display(), "watching folder");
    Ok(WatchService { debouncer, path })
}

/// Handle one debounced event.
///
/// Creations and renames into the folder both count as arrivals; exports
/// are sometimes written elsewhere and moved in.
fn handle_file_event(queue: &IntakeQueue, event: &DebouncedEvent) {
    let is_arrival = matches!(
        event.kind,
        EventKind::Create(_)
            | EventKind::Modify(ModifyKind::Name(
                RenameMode::To | RenameMode::Both | RenameMode::Any
            ))
    );
    if !is_arrival {
        return;
    }

    for path in &event.paths {
        // For rename pairs the old path no longer exists; metadata
        // failing filters it out along with anything already deleted.
        let metadata = match std::fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(_) => continue,
        };

        // Skip directories and symlinks (a symlink could point outside
        // the watched folder).
        if metadata.is_dir() || metadata.file_type().is_symlink() {
            continue;
        }

        // Skip files still being written (size is 0)
        if metadata.len() == 0 {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if is_transient_name(&file_name) {
            continue;
        }

        if !is_pdf(path) {
            continue;
        }

        tracing::debug!(path = %path.display(), "file arrived in watched folder");
        queue.push(path.clone());
    }
}

/// Hidden files, temp files and partial downloads never enter the queue.
fn is_transient_name(file_name: &str) -> bool {
    file_name.starts_with('.')
        || file_name.ends_with(".tmp")
        || file_name.ends_with(".crdownload")
        || file_name.ends_with(".part")
        || file_name.ends_with(".download")
}

pub(crate) fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::CreateKind;
    use notify::Event;
    use std::fs;
    use std::time::Instant;
    use tempfile::TempDir;

    fn create_event(path: &Path) -> DebouncedEvent {
        DebouncedEvent::new(
            Event::new(EventKind::Create(CreateKind::File)).add_path(path.to_path_buf()),
            Instant::now(),
        )
    }

    fn rename_to_event(path: &Path) -> DebouncedEvent {
        DebouncedEvent::new(
            Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::To)))
                .add_path(path.to_path_buf()),
            Instant::now(),
        )
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("/watch/a.pdf")));
        assert!(is_pdf(Path::new("/watch/a.PDF")));
        assert!(!is_pdf(Path::new("/watch/a.txt")));
        assert!(!is_pdf(Path::new("/watch/pdf")));
    }

    #[test]
    fn test_transient_names() {
        assert!(is_transient_name(".hidden.pdf"));
        assert!(is_transient_name("report.pdf.crdownload"));
        assert!(is_transient_name("report.pdf.part"));
        assert!(is_transient_name("export.tmp"));
        assert!(!is_transient_name("GDNSO_20240115093000.pdf"));
    }

    #[test]
    fn test_created_pdf_is_queued() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("SO_20240115093000.pdf");
        fs::write(&path, b"pdf bytes").unwrap();

        let queue = IntakeQueue::new();
        handle_file_event(&queue, &create_event(&path));

        assert_eq!(queue.drain_all(), vec![path]);
    }

    #[test]
    fn test_renamed_in_pdf_is_queued() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("SO_20240115093000.pdf");
        fs::write(&path, b"pdf bytes").unwrap();

        let queue = IntakeQueue::new();
        handle_file_event(&queue, &rename_to_event(&path));

        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_non_pdf_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"text").unwrap();

        let queue = IntakeQueue::new();
        handle_file_event(&queue, &create_event(&path));

        assert!(queue.is_empty());
    }

    #[test]
    fn test_directory_is_skipped() {
        let dir = TempDir::new().unwrap();
        let subdir = dir.path().join("batch.pdf");
        fs::create_dir(&subdir).unwrap();

        let queue = IntakeQueue::new();
        handle_file_event(&queue, &create_event(&subdir));

        assert!(queue.is_empty());
    }

    #[test]
    fn test_empty_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("SO_empty.pdf");
        fs::write(&path, b"").unwrap();

        let queue = IntakeQueue::new();
        handle_file_event(&queue, &create_event(&path));

        assert!(queue.is_empty());
    }

    #[test]
    fn test_vanished_path_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("SO_gone.pdf");

        let queue = IntakeQueue::new();
        handle_file_event(&queue, &create_event(&path));

        assert!(queue.is_empty());
    }
}
