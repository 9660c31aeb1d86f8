use super::task::TaskOutcome;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 管線統計（各工作執行緒共用）
#[derive(Debug, Default)]
pub struct PipelineStats {
    submitted: AtomicUsize,
    duplicates_skipped: AtomicUsize,
    kept: AtomicUsize,
    discarded: AtomicUsize,
    removed_after_failure: AtomicUsize,
    frames_written: AtomicUsize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub submitted: usize,
    pub duplicates_skipped: usize,
    pub kept: usize,
    pub discarded: usize,
    pub removed_after_failure: usize,
    pub frames_written: usize,
}

impl StatsSnapshot {
    #[must_use]
    pub const fn finished(&self) -> usize {
        self.kept + self.discarded + self.removed_after_failure
    }
}

impl PipelineStats {
    pub fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record(&self, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::Kept { frames_written, .. } => {
                self.kept.fetch_add(1, Ordering::Relaxed);
                self.frames_written
                    .fetch_add(*frames_written, Ordering::Relaxed);
            }
            TaskOutcome::Discarded { .. } | TaskOutcome::Vanished { .. } => {
                self.discarded.fetch_add(1, Ordering::Relaxed);
            }
            TaskOutcome::RemovedAfterFailure { .. } => {
                self.removed_after_failure.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::Relaxed),
            kept: self.kept.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            removed_after_failure: self.removed_after_failure.load(Ordering::Relaxed),
            frames_written: self.frames_written.load(Ordering::Relaxed),
        }
    }
}
