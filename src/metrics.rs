use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Metrics {
    courses_loaded: Arc<AtomicU64>,
    courses_failed: Arc<AtomicU64>,
    courses_skipped: Arc<AtomicU64>,
    sources_read: Arc<AtomicU64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_course_loaded(&self) {
        self.courses_loaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_course_failed(&self) {
        self.courses_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Rows dropped at corpus build for lacking a title.
    pub fn record_course_skipped(&self) {
        self.courses_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_source_read(&self) {
        self.sources_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn log_summary(&self) {
        info!(
            courses_loaded = self.courses_loaded.load(Ordering::Relaxed),
            courses_failed = self.courses_failed.load(Ordering::Relaxed),
            courses_skipped = self.courses_skipped.load(Ordering::Relaxed),
            sources_read = self.sources_read.load(Ordering::Relaxed),
            "Final metrics"
        );
    }
}
