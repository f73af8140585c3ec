//! Operation counters for the customer service.
//!
//! Counters are cheap atomics shared through `Arc`, so a cloned
//! `ServiceMetrics` observes the same totals as the original.

use crate::domain::IdentityField;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Default)]
struct Counters {
    created: AtomicU64,
    updated: AtomicU64,
    duplicates_rejected: AtomicU64,
    merged: AtomicU64,
    removed: AtomicU64,
    rows_imported: AtomicU64,
    rows_failed: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub created: u64,
    pub updated: u64,
    pub duplicates_rejected: u64,
    pub merged: u64,
    pub removed: u64,
    pub rows_imported: u64,
    pub rows_failed: u64,
}

/// Metrics tracker shared by the customer and import services.
#[derive(Debug, Clone, Default)]
pub struct ServiceMetrics {
    counters: Arc<Counters>,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_created(&self) {
        self.counters.created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn track_updated(&self) {
        self.counters.updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn track_duplicate(&self, field: IdentityField) {
        self.counters
            .duplicates_rejected
            .fetch_add(1, Ordering::Relaxed);
        tracing::debug!(field = %field, "Duplicate identity rejected");
    }

    /// Track a finished merge of `source_count` records.
    pub fn track_merged(&self, source_count: usize) {
        self.counters.merged.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(source_count, "Merge recorded");
    }

    pub fn track_removed(&self) {
        self.counters.removed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn track_import(&self, imported: usize, failed: usize) {
        self.counters
            .rows_imported
            .fetch_add(imported as u64, Ordering::Relaxed);
        self.counters
            .rows_failed
            .fetch_add(failed as u64, Ordering::Relaxed);
        tracing::debug!(imported, failed, "Import recorded");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let c = &self.counters;
        MetricsSnapshot {
            created: c.created.load(Ordering::Relaxed),
            updated: c.updated.load(Ordering::Relaxed),
            duplicates_rejected: c.duplicates_rejected.load(Ordering::Relaxed),
            merged: c.merged.load(Ordering::Relaxed),
            removed: c.removed.load(Ordering::Relaxed),
            rows_imported: c.rows_imported.load(Ordering::Relaxed),
            rows_failed: c.rows_failed.load(Ordering::Relaxed),
        }
    }
}

/// Measures one operation and logs its duration when finished.
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    pub fn new(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Finish the timer with a specific status, returning elapsed milliseconds.
    pub fn finish_with_status(self, success: bool) -> u128 {
        let duration_ms = self.start.elapsed().as_millis();

        if success {
            tracing::debug!(operation = self.operation, duration_ms, "Operation succeeded");
        } else {
            tracing::warn!(operation = self.operation, duration_ms, "Operation failed");
        }

        duration_ms
    }
}
