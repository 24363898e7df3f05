use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Running,
    Paused,
    Completed,
    Killed,
    FailedToStart,
}

impl JobStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Killed)
    }

    const fn is_alive(self) -> bool {
        matches!(self, JobStatus::Running | JobStatus::Paused)
    }
}

/// Per-job distributed status: one entry per reporting agent plus a derived
/// overall status.
///
/// The overall status is a projection of the per-agent map. Once no agent is
/// running or paused it becomes `Completed` — even when some agents were
/// individually killed; only the per-agent entries distinguish a kill from a
/// normal completion. Downstream readers that need that distinction must
/// look at the agent map.
#[derive(Debug, Clone)]
pub struct JobState {
    job_id: String,
    overall: JobStatus,
    agents: HashMap<String, JobStatus>,
}

impl JobState {
    #[must_use]
    pub fn new(job_id: &str) -> Self {
        JobState {
            job_id: job_id.to_owned(),
            overall: JobStatus::Queued,
            agents: HashMap::new(),
        }
    }

    #[must_use]
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    #[must_use]
    pub const fn overall(&self) -> JobStatus {
        self.overall
    }

    #[must_use]
    pub fn agent_status(&self, agent_id: &str) -> Option<JobStatus> {
        self.agents.get(agent_id).copied()
    }

    /// Agents currently running or paused.
    #[must_use]
    pub fn alive_agents(&self) -> usize {
        self.agents
            .values()
            .filter(|status| status.is_alive())
            .count()
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.overall.is_terminal()
    }

    pub fn mark_agent_running(&mut self, agent_id: &str) {
        self.agents.insert(agent_id.to_owned(), JobStatus::Running);
        self.overall = JobStatus::Running;
    }

    pub fn mark_agent_paused(&mut self, agent_id: &str) {
        self.agents.insert(agent_id.to_owned(), JobStatus::Paused);
    }

    /// Records a completion report. A `Killed` entry for the agent sticks;
    /// the report is then only used to recompute the overall status.
    pub fn mark_agent_completed(&mut self, agent_id: &str) {
        if self.agent_status(agent_id) != Some(JobStatus::Killed) {
            self.agents
                .insert(agent_id.to_owned(), JobStatus::Completed);
        }
        self.derive_overall();
    }

    /// Records a kill report. A `Completed` entry for the agent sticks.
    pub fn mark_agent_killed(&mut self, agent_id: &str) {
        if self.agent_status(agent_id) != Some(JobStatus::Completed) {
            self.agents.insert(agent_id.to_owned(), JobStatus::Killed);
        }
        self.derive_overall();
    }

    /// Explicit overall-level kill request; the derivation rule itself never
    /// yields `Killed`.
    pub fn kill(&mut self) {
        self.overall = JobStatus::Killed;
    }

    pub fn mark_failed_to_start(&mut self) {
        self.overall = JobStatus::FailedToStart;
    }

    fn derive_overall(&mut self) {
        if !self.agents.values().any(|status| status.is_alive()) {
            self.overall = JobStatus::Completed;
        }
    }
}
