//! Interval drain thread.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::pipeline::Pipeline;

/// Background thread that drains the intake queue on a fixed interval.
///
/// The first pass runs immediately, so files queued at startup are
/// classified without waiting out a full tick. A panic inside a pass is
/// caught and logged; the service keeps ticking. Dropping the service
/// signals the thread to stop; `stop` signals and joins.
pub struct DrainService {
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl DrainService {
    pub fn spawn(pipeline: Arc<Pipeline>, interval: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);

        let handle = thread::spawn(move || {
            tracing::info!(interval_ms = interval.as_millis() as u64, "drain service started");
            while !flag.load(Ordering::SeqCst) {
                // One bad document must not take the whole service down.
                if catch_unwind(AssertUnwindSafe(|| pipeline.drain_once())).is_err() {
                    tracing::error!("drain pass panicked");
                }
                thread::sleep(interval);
            }
            tracing::info!("drain service stopped");
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Signal the thread and wait for the in-flight pass to finish.
    pub fn stop(mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("drain thread panicked");
            }
        }
    }
}

impl Drop for DrainService {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}
