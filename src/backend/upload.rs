//! Simulated uploads.
//!
//! Nothing leaves the client: an upload is a size check, a fabricated shard
//! count and point reward, and a fixed sequence of progress ticks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use crate::backend::config::AppConfig;
use crate::backend::error::{Result, StorageError};
use crate::backend::ids::IdSource;
use crate::backend::types::{FileStatus, StorageFile, StorageStats, Transaction, TransactionKind};

pub fn shard_count(size: u64, shard_unit: u64) -> u64 {
    size.div_ceil(shard_unit).max(1)
}

pub fn points_for(size: u64, point_unit: u64) -> u64 {
    (size / point_unit).max(1)
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadPlan {
    pub name: String,
    pub size: u64,
    pub shards: u64,
    pub points: u64,
}

/// Checks allocation and fixes the shard/point numbers for an upload.
pub fn plan_upload(stats: &StorageStats, name: &str, size: u64, config: &AppConfig) -> Result<UploadPlan> {
    if stats.total_allocated == 0 {
        return Err(StorageError::NoAllocation);
    }
    if stats.total_used.saturating_add(size) > stats.total_allocated {
        return Err(StorageError::InsufficientAllocation {
            requested: size,
            available: stats.available(),
        });
    }
    Ok(UploadPlan {
        name: name.to_string(),
        size,
        shards: shard_count(size, config.shard_unit_bytes),
        points: points_for(size, config.point_unit_bytes),
    })
}

/// Records produced by a finished upload, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedUpload {
    pub file: StorageFile,
    pub stats: StorageStats,
    pub transaction: Transaction,
}

pub fn complete_upload(plan: &UploadPlan, stats: &StorageStats, ids: &mut dyn IdSource) -> CompletedUpload {
    let now = ids.now_millis();
    let file = StorageFile {
        id: ids.next_id(),
        name: plan.name.clone(),
        size: plan.size,
        uploaded_at: now,
        shards: plan.shards,
        status: FileStatus::Active,
        retrieval_code: ids.retrieval_code(),
    };

    let mut stats = stats.clone();
    stats.total_used += plan.size;
    stats.files_stored += 1;
    stats.points_earned += plan.points;

    let transaction = Transaction {
        id: ids.next_id(),
        kind: TransactionKind::Upload,
        amount: plan.points,
        timestamp: now,
        description: format!("Uploaded {}", plan.name),
    };

    CompletedUpload { file, stats, transaction }
}

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub async fn sleep(duration: Duration) {
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
}

/// Timed progress ticks: waits one interval, then reports 0, step, ... 100.
pub struct ProgressSequence {
    interval: Duration,
    step: u8,
    next: Option<u8>,
    cancel: CancelToken,
}

impl ProgressSequence {
    pub fn new(interval: Duration, step: u8, cancel: CancelToken) -> Self {
        Self { interval, step: step.max(1), next: Some(0), cancel }
    }

    pub fn from_config(config: &AppConfig, cancel: CancelToken) -> Self {
        Self::new(Duration::from_millis(config.tick_interval_ms), config.progress_step, cancel)
    }

    /// Next percentage, or `None` once finished or cancelled.
    pub async fn next_tick(&mut self) -> Option<u8> {
        let percent = self.next?;
        if self.cancel.is_cancelled() {
            self.next = None;
            return None;
        }
        sleep(self.interval).await;
        if self.cancel.is_cancelled() {
            self.next = None;
            return None;
        }
        self.next = if percent >= 100 {
            None
        } else {
            Some(percent.saturating_add(self.step).min(100))
        };
        Some(percent)
    }

    /// True when the final 100% tick was reached.
    pub fn finished(&self) -> bool {
        self.next.is_none() && !self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::config::{GIB, MIB};
    use crate::backend::ids::SequentialIds;

    fn provider_stats(allocated: u64, used: u64) -> StorageStats {
        let mut stats = StorageStats::empty(847);
        stats.total_allocated = allocated;
        stats.total_used = used;
        stats.is_provider = allocated > 0;
        stats
    }

    #[test]
    fn test_shards_and_points() {
        assert_eq!(shard_count(0, 10 * MIB), 1);
        assert_eq!(shard_count(1, 10 * MIB), 1);
        assert_eq!(shard_count(10 * MIB, 10 * MIB), 1);
        assert_eq!(shard_count(10 * MIB + 1, 10 * MIB), 2);
        assert_eq!(shard_count(15 * MIB, 10 * MIB), 2);

        assert_eq!(points_for(0, MIB), 1);
        assert_eq!(points_for(MIB - 1, MIB), 1);
        assert_eq!(points_for(15 * MIB, MIB), 15);
        assert_eq!(points_for(15 * MIB + 512, MIB), 15);
    }

    #[test]
    fn test_no_allocation() {
        let config = AppConfig::default();
        let err = plan_upload(&provider_stats(0, 0), "a.bin", 5 * MIB, &config).unwrap_err();
        assert!(matches!(err, StorageError::NoAllocation));
    }

    #[test]
    fn test_insufficient_allocation() {
        let config = AppConfig::default();
        let stats = provider_stats(GIB, GIB - MIB);
        let err = plan_upload(&stats, "a.bin", 2 * MIB, &config).unwrap_err();
        match err {
            StorageError::InsufficientAllocation { requested, available } => {
                assert_eq!(requested, 2 * MIB);
                assert_eq!(available, MIB);
            }
            other => panic!("unexpected {:?}", other),
        }
        // Exactly filling the allocation is allowed
        assert!(plan_upload(&stats, "a.bin", MIB, &config).is_ok());
    }

    #[test]
    fn test_complete_upload_updates_records() {
        let config = AppConfig::default();
        let stats = provider_stats(10 * GIB, 0);
        let plan = plan_upload(&stats, "movie.mp4", 15 * MIB, &config).unwrap();
        assert_eq!(plan.shards, 2);
        assert_eq!(plan.points, 15);

        let mut ids = SequentialIds::starting_at(0);
        let done = complete_upload(&plan, &stats, &mut ids);
        assert_eq!(done.file.status, FileStatus::Active);
        assert_eq!(done.file.shards, 2);
        assert_eq!(done.stats.total_used, 15 * MIB);
        assert_eq!(done.stats.files_stored, 1);
        assert_eq!(done.stats.points_earned, 15);
        assert_eq!(done.transaction.kind, TransactionKind::Upload);
        assert_eq!(done.transaction.amount, 15);
        assert_eq!(done.transaction.description, "Uploaded movie.mp4");
        assert_eq!(done.transaction.timestamp, done.file.uploaded_at);
    }

    #[tokio::test]
    async fn test_progress_ticks() {
        let mut seq = ProgressSequence::new(Duration::from_millis(1), 10, CancelToken::new());
        let mut ticks = Vec::new();
        while let Some(p) = seq.next_tick().await {
            ticks.push(p);
        }
        assert_eq!(ticks, vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert!(seq.finished());
    }

    #[tokio::test]
    async fn test_progress_stops_when_cancelled() {
        let cancel = CancelToken::new();
        let mut seq = ProgressSequence::new(Duration::from_millis(1), 10, cancel.clone());
        assert_eq!(seq.next_tick().await, Some(0));
        assert_eq!(seq.next_tick().await, Some(10));
        cancel.cancel();
        assert_eq!(seq.next_tick().await, None);
        assert!(!seq.finished());
    }
}
