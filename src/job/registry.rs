use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{AppResult, JobError};

use super::state::JobState;

/// Lookup interface the consolidation engine consumes.
///
/// Implementations answer for jobs they do not know about with "no alive
/// agents" and "not over", so a racing lookup never aborts a pass.
pub trait JobRegistry: Send + Sync {
    fn alive_agent_count(&self, job_id: &str) -> usize;
    fn is_job_over(&self, job_id: &str) -> bool;
}

/// In-memory registry of per-job distributed state, fed by job lifecycle
/// reports from the agents.
#[derive(Debug, Default)]
pub struct InMemoryJobRegistry {
    jobs: Mutex<HashMap<String, JobState>>,
}

impl InMemoryJobRegistry {
    #[must_use]
    pub fn new() -> Self {
        InMemoryJobRegistry::default()
    }

    /// Creates the job entry in `Queued` state. Idempotent.
    pub fn create_job(&self, job_id: &str) {
        self.lock()
            .entry(job_id.to_owned())
            .or_insert_with(|| JobState::new(job_id));
    }

    /// Runs `update` against the job's state.
    ///
    /// # Errors
    ///
    /// Returns `JobError::UnknownJob` when the job was never created.
    pub fn update_job<F>(&self, job_id: &str, update: F) -> AppResult<()>
    where
        F: FnOnce(&mut JobState),
    {
        let mut jobs = self.lock();
        let state = jobs.get_mut(job_id).ok_or_else(|| {
            JobError::UnknownJob {
                job_id: job_id.to_owned(),
            }
        })?;
        update(state);
        Ok(())
    }

    /// Returns a snapshot of the job's state, if known.
    #[must_use]
    pub fn job_state(&self, job_id: &str) -> Option<JobState> {
        self.lock().get(job_id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, JobState>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl JobRegistry for InMemoryJobRegistry {
    fn alive_agent_count(&self, job_id: &str) -> usize {
        self.lock()
            .get(job_id)
            .map_or(0, JobState::alive_agents)
    }

    fn is_job_over(&self, job_id: &str) -> bool {
        self.lock().get(job_id).is_some_and(JobState::is_terminal)
    }
}
