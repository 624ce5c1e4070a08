// Tue Jan 13 2026 - Alex

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters shared by all workers of one run. Every field is updated on its
/// own; no two counters are ever updated together under one lock.
#[derive(Debug, Default)]
pub struct RunAggregate {
    bytes_scanned: AtomicU64,
    total_matches: AtomicU64,
    files_with_matches: AtomicU64,
    files_scanned: AtomicU64,
    files_too_small: AtomicU64,
    files_unreadable: AtomicU64,
}

impl RunAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bytes(&self, bytes: u64) {
        self.bytes_scanned.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn add_match(&self) {
        self.total_matches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_file_with_matches(&self) {
        self.files_with_matches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_scanned_file(&self) {
        self.files_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_too_small(&self) {
        self.files_too_small.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_unreadable(&self) {
        self.files_unreadable.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters. Only meaningful once every worker has joined.
    pub fn finalize(&self, files_total: usize, workers: usize, elapsed: Duration) -> RunSummary {
        RunSummary {
            files_total: files_total as u64,
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            files_with_matches: self.files_with_matches.load(Ordering::Relaxed),
            files_too_small: self.files_too_small.load(Ordering::Relaxed),
            files_unreadable: self.files_unreadable.load(Ordering::Relaxed),
            total_matches: self.total_matches.load(Ordering::Relaxed),
            bytes_scanned: self.bytes_scanned.load(Ordering::Relaxed),
            workers,
            elapsed_secs: elapsed.as_secs_f64(),
            elapsed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub files_total: u64,
    pub files_scanned: u64,
    pub files_with_matches: u64,
    pub files_too_small: u64,
    pub files_unreadable: u64,
    pub total_matches: u64,
    pub bytes_scanned: u64,
    pub workers: usize,
    pub elapsed_secs: f64,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn bytes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.bytes_scanned as f64 / secs
        } else {
            0.0
        }
    }

    pub fn files_skipped(&self) -> u64 {
        self.files_too_small + self.files_unreadable
    }
}
