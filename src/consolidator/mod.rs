//! The periodic consolidation engine: tails raw per-agent sample files for
//! every tracked job and turns them into consolidated fleet-wide records.
pub mod cursor;
pub(crate) mod layout;
pub mod record;
mod windowing;


pub use cursor::{CursorStore, FileCursor, InMemoryCursorStore};
pub use layout::StatsLayout;
pub use record::{ConsolidatedRecord, SampleRecord};

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::AppResult;
use crate::job::JobRegistry;

use windowing::PassParams;

struct EngineState {
    tracked: Vec<String>,
    cursors: Box<dyn CursorStore>,
}

/// Owns the tracked-job set and the per-file cursor table. All three entry
/// points take the engine-wide lock for their full duration, so a scheduled
/// pass and a forced final flush never interleave on the same output files.
pub struct Consolidator {
    config: EngineConfig,
    layout: StatsLayout,
    registry: Arc<dyn JobRegistry>,
    clock: Arc<dyn Clock>,
    state: Mutex<EngineState>,
}

impl Consolidator {
    #[must_use]
    pub fn new(config: EngineConfig, layout: StatsLayout, registry: Arc<dyn JobRegistry>) -> Self {
        Consolidator::with_clock(config, layout, registry, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(
        config: EngineConfig,
        layout: StatsLayout,
        registry: Arc<dyn JobRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Consolidator {
            config,
            layout,
            registry,
            clock,
            state: Mutex::new(EngineState {
                tracked: Vec::new(),
                cursors: Box::new(InMemoryCursorStore::new()),
            }),
        }
    }

    /// Starts tracking a job for live consolidation. Idempotent; touches no
    /// files.
    pub async fn register_job(&self, job_id: &str) {
        let mut state = self.state.lock().await;
        if !state.tracked.iter().any(|id| id == job_id) {
            state.tracked.push(job_id.to_owned());
            info!("Tracking live stats for job {}", job_id);
        }
    }

    /// Stops tracking a job and synchronously runs one final consolidation
    /// pass over its files, treating the job as over, so buffered data is
    /// not lost. Blocks behind any in-flight scheduled pass.
    ///
    /// # Errors
    ///
    /// Returns an error when the job's stats directory cannot be scanned;
    /// per-file failures are logged and skipped as in a scheduled pass.
    pub async fn deregister_job(&self, job_id: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.tracked.retain(|id| id != job_id);
        info!("Running final consolidation pass for job {}", job_id);
        self.consolidate_job(&mut state, job_id, true).await
    }

    /// One scheduled pass over all tracked jobs. Every failure is scoped to
    /// one job or file, logged, and retried from the stored cursor on the
    /// next tick.
    pub async fn tick(&self) {
        let mut state = self.state.lock().await;
        let jobs = state.tracked.clone();
        for job_id in &jobs {
            if let Err(err) = self.consolidate_job(&mut state, job_id, false).await {
                error!("Error while crunching stats for job {}: {}", job_id, err);
            }
        }
    }

    async fn consolidate_job(
        &self,
        state: &mut EngineState,
        job_id: &str,
        force: bool,
    ) -> AppResult<()> {
        let files = layout::realtime_files(&self.layout.job_stats_dir(job_id)).await?;
        // Removal from the tracked set is itself what ends a job from the
        // engine's point of view, independent of the registry's status.
        let job_over = force || self.registry.is_job_over(job_id);
        for file in files {
            let params = PassParams {
                job_id,
                registry: self.registry.as_ref(),
                job_over,
                settle_ms: self
                    .config
                    .settle_ms_for(layout::is_combined_file(&file)),
                grace_ms: self.config.finalize_grace_ms,
                bucket_span_ms: self.config.bucket_span_ms,
                now_ms: self.clock.now_ms(),
            };
            let mut cursor = state.cursors.get(&file);
            let result = windowing::run_pass(&file, &mut cursor, &params).await;
            state.cursors.put(file.clone(), cursor);
            if let Err(err) = result {
                error!(
                    "Failed to consolidate '{}' for job {}: {}",
                    file.display(),
                    job_id,
                    err
                );
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) async fn cursor_snapshot(&self, path: &std::path::Path) -> FileCursor {
        let mut state = self.state.lock().await;
        let cursor = state.cursors.get(path);
        state.cursors.put(path.to_path_buf(), cursor.clone());
        cursor
    }
}
