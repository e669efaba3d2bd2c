//! Performance metrics for grab runs

use std::sync::atomic::{AtomicU64, Ordering};

/// Performance counters for a grabber instance
#[derive(Debug, Default)]
pub struct GrabMetrics {
    pub tracks_revealed: AtomicU64,
    pub downloads_started: AtomicU64,
    pub downloads_completed: AtomicU64,
    pub downloads_failed: AtomicU64,
    pub total_bytes: AtomicU64,
    pub retries_attempted: AtomicU64,
    pub archives_written: AtomicU64,
}

impl GrabMetrics {
    pub fn record_tracks_revealed(&self, count: u64) {
        self.tracks_revealed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_download_started(&self) {
        self.downloads_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_download_completed(&self, size: u64) {
        self.downloads_completed.fetch_add(1, Ordering::Relaxed);
        self.total_bytes.fetch_add(size, Ordering::Relaxed);
    }

    pub fn record_download_failed(&self) {
        self.downloads_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retries_attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_archive_written(&self) {
        self.archives_written.fetch_add(1, Ordering::Relaxed);
    }

    /// Get metrics snapshot
    pub fn snapshot(&self) -> GrabMetricsSnapshot {
        GrabMetricsSnapshot {
            tracks_revealed: self.tracks_revealed.load(Ordering::Relaxed),
            downloads_started: self.downloads_started.load(Ordering::Relaxed),
            downloads_completed: self.downloads_completed.load(Ordering::Relaxed),
            downloads_failed: self.downloads_failed.load(Ordering::Relaxed),
            total_bytes: self.total_bytes.load(Ordering::Relaxed),
            retries_attempted: self.retries_attempted.load(Ordering::Relaxed),
            archives_written: self.archives_written.load(Ordering::Relaxed),
        }
    }
}

/// Immutable snapshot of metrics
#[derive(Debug, Clone)]
pub struct GrabMetricsSnapshot {
    pub tracks_revealed: u64,
    pub downloads_started: u64,
    pub downloads_completed: u64,
    pub downloads_failed: u64,
    pub total_bytes: u64,
    pub retries_attempted: u64,
    pub archives_written: u64,
}

impl GrabMetricsSnapshot {
    pub fn success_rate(&self) -> f64 {
        if self.downloads_started == 0 {
            0.0
        } else {
            self.downloads_completed as f64 / self.downloads_started as f64
        }
    }

    pub fn average_size(&self) -> f64 {
        if self.downloads_completed == 0 {
            0.0
        } else {
            self.total_bytes as f64 / self.downloads_completed as f64
        }
    }
}
