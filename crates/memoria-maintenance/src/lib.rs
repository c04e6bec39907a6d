//! # memoria-maintenance
//!
//! The background maintainer (C7, spec §4.7): a single-consumer,
//! cooperative scheduler that runs a short, priority-ordered task list
//! between tool calls, bounded by operation count and wall time, and
//! tolerant of every task failing independently.
//!
//! Scheduling model: `schedule()` is a fire-and-forget deferral.
//! Concurrent calls while a run is already active are no-ops — this is
//! the only in-process mutable state this crate owns, guarded by a
//! single atomic flag, matching spec §5's note that the maintainer's
//! `isRunning` flag is owned exclusively by C7.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use memoria_core::config::BackgroundConfig;
use memoria_core::constants::DEFAULT_ORPHAN_MAX_AGE_MS;
use memoria_service::MemoryService;
use tracing::{info, warn};

/// A single priority-ordered maintenance task list, executed in order
/// until `maxOperationsPerRun` or `maxTimePerRun` is exhausted.
enum Task {
    EmbeddingBackfill,
    ImportanceDecay,
    ConsolidationScan,
    OrphanCleanup,
}

pub struct BackgroundMaintainer {
    service: Arc<MemoryService>,
    config: BackgroundConfig,
    is_running: Arc<AtomicBool>,
}

impl BackgroundMaintainer {
    pub fn new(service: Arc<MemoryService>, config: BackgroundConfig) -> Self {
        Self {
            service,
            config,
            is_running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Posts a deferred run. A no-op if a run is already active.
    pub fn schedule(&self) {
        if self
            .is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        let service = self.service.clone();
        let config = self.config.clone();
        let is_running = self.is_running.clone();

        tokio::spawn(async move {
            run_once(&service, &config).await;
            is_running.store(false, Ordering::SeqCst);
        });
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Waits up to `timeout_ms` for an active run to finish, then force
    /// clears the running flag regardless.
    pub async fn dispose(&self, timeout_ms: u64) {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        while self.is_running() && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.is_running.store(false, Ordering::SeqCst);
    }
}

async fn run_once(service: &MemoryService, config: &BackgroundConfig) {
    let started = Instant::now();
    let max_time = Duration::from_millis(config.max_time_ms);
    let mut operations_done: u32 = 0;

    let mut tasks = Vec::new();
    if config.enable_embedding_backfill {
        tasks.push(Task::EmbeddingBackfill);
    }
    if config.enable_importance_decay {
        tasks.push(Task::ImportanceDecay);
    }
    tasks.push(Task::ConsolidationScan);
    tasks.push(Task::OrphanCleanup);

    for task in tasks {
        if operations_done >= config.max_operations {
            break;
        }
        if started.elapsed() >= max_time {
            break;
        }

        match task {
            Task::EmbeddingBackfill => {
                let report = service.generate_embeddings_for_existing(3).await;
                if !report.errors.is_empty() {
                    warn!(errors = ?report.errors, "embedding backfill task reported errors");
                }
                info!(processed = report.processed, updated = report.updated, "embedding backfill ran");
            }
            Task::ImportanceDecay => {
                let report = service.decay_importance().await;
                if !report.errors.is_empty() {
                    warn!(errors = ?report.errors, "importance decay task reported errors");
                }
                info!(updated = report.updated.len(), "importance decay ran");
            }
            Task::ConsolidationScan => match service.scan_consolidation_candidates().await {
                Ok(candidates) if !candidates.is_empty() => {
                    info!(?candidates, "consolidation candidate tags found");
                }
                Ok(_) => {}
                Err(err) => warn!(error = %err, "consolidation candidate scan failed"),
            },
            Task::OrphanCleanup => {
                match service
                    .cleanup_orphaned_consolidations(config.orphan_cleanup_max_age_ms)
                    .await
                {
                    Ok(swept) if swept > 0 => info!(swept, "swept orphaned consolidations"),
                    Ok(_) => {}
                    Err(err) => warn!(error = %err, "orphan consolidation cleanup failed"),
                }
            }
        }

        operations_done += 1;
    }
}
