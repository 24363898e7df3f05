use rand::Rng;

use super::registry::{InMemoryJobRegistry, JobRegistry};
use super::state::{JobState, JobStatus};
use crate::error::{AppError, AppResult};

const AGENTS: [&str; 3] = ["10.0.0.1", "10.0.0.2", "10.0.0.3"];

fn expect_overall(state: &JobState, expected: JobStatus) -> AppResult<()> {
    if state.overall() != expected {
        return Err(AppError::job(format!(
            "Expected overall {:?}, got {:?}",
            expected,
            state.overall()
        )));
    }
    Ok(())
}

#[test]
fn starts_queued_and_runs_on_first_agent() -> AppResult<()> {
    let mut state = JobState::new("job-1");
    expect_overall(&state, JobStatus::Queued)?;
    state.mark_agent_running("10.0.0.1");
    expect_overall(&state, JobStatus::Running)?;
    if state.is_terminal() {
        return Err(AppError::job("Running job must not be terminal"));
    }
    Ok(())
}

#[test]
fn completes_once_no_agent_is_running_or_paused() -> AppResult<()> {
    let mut state = JobState::new("job-1");
    state.mark_agent_running("10.0.0.1");
    state.mark_agent_running("10.0.0.2");
    state.mark_agent_completed("10.0.0.1");
    expect_overall(&state, JobStatus::Running)?;
    state.mark_agent_completed("10.0.0.2");
    expect_overall(&state, JobStatus::Completed)?;
    if !state.is_terminal() {
        return Err(AppError::job("Completed job must be terminal"));
    }
    Ok(())
}

#[test]
fn killed_agents_still_yield_overall_completed() -> AppResult<()> {
    let mut state = JobState::new("job-1");
    state.mark_agent_running("10.0.0.1");
    state.mark_agent_running("10.0.0.2");
    state.mark_agent_killed("10.0.0.1");
    state.mark_agent_killed("10.0.0.2");
    // The derivation rule never produces Killed at the overall level; only
    // the per-agent entries record the kill.
    expect_overall(&state, JobStatus::Completed)?;
    if state.agent_status("10.0.0.1") != Some(JobStatus::Killed) {
        return Err(AppError::job("Agent entry should record the kill"));
    }
    Ok(())
}

#[test]
fn paused_agent_keeps_job_alive() -> AppResult<()> {
    let mut state = JobState::new("job-1");
    state.mark_agent_running("10.0.0.1");
    state.mark_agent_running("10.0.0.2");
    state.mark_agent_paused("10.0.0.1");
    state.mark_agent_completed("10.0.0.2");
    expect_overall(&state, JobStatus::Running)?;
    if state.alive_agents() != 1 {
        return Err(AppError::job(format!(
            "Expected 1 alive agent, got {}",
            state.alive_agents()
        )));
    }
    state.mark_agent_completed("10.0.0.1");
    expect_overall(&state, JobStatus::Completed)?;
    Ok(())
}

#[test]
fn completed_agent_ignores_later_kill_report() -> AppResult<()> {
    let mut state = JobState::new("job-1");
    state.mark_agent_running("10.0.0.1");
    state.mark_agent_completed("10.0.0.1");
    state.mark_agent_killed("10.0.0.1");
    if state.agent_status("10.0.0.1") != Some(JobStatus::Completed) {
        return Err(AppError::job(
            "First terminal state must stick for the agent",
        ));
    }
    Ok(())
}

#[test]
fn killed_agent_ignores_later_completion_report() -> AppResult<()> {
    let mut state = JobState::new("job-1");
    state.mark_agent_running("10.0.0.1");
    state.mark_agent_killed("10.0.0.1");
    state.mark_agent_completed("10.0.0.1");
    if state.agent_status("10.0.0.1") != Some(JobStatus::Killed) {
        return Err(AppError::job(
            "First terminal state must stick for the agent",
        ));
    }
    Ok(())
}

#[test]
fn redundant_reports_are_idempotent() -> AppResult<()> {
    let mut state = JobState::new("job-1");
    state.mark_agent_running("10.0.0.1");
    state.mark_agent_completed("10.0.0.1");
    let before = state.overall();
    state.mark_agent_completed("10.0.0.1");
    state.mark_agent_completed("10.0.0.1");
    if state.overall() != before || state.agent_status("10.0.0.1") != Some(JobStatus::Completed) {
        return Err(AppError::job("Re-marking a completed agent must not change state"));
    }
    Ok(())
}

#[test]
fn explicit_kill_is_terminal() -> AppResult<()> {
    let mut state = JobState::new("job-1");
    state.mark_agent_running("10.0.0.1");
    state.kill();
    expect_overall(&state, JobStatus::Killed)?;
    if !state.is_terminal() {
        return Err(AppError::job("Killed job must be terminal"));
    }
    Ok(())
}

#[test]
fn pause_report_alone_does_not_recompute_overall() -> AppResult<()> {
    let mut state = JobState::new("job-1");
    state.mark_agent_running("10.0.0.1");
    state.mark_agent_completed("10.0.0.1");
    expect_overall(&state, JobStatus::Completed)?;
    // A stray pause report from an agent that never reported running sets
    // only the per-agent entry; the overall status is recomputed on
    // completion and kill reports, not on pauses.
    state.mark_agent_paused("10.0.0.2");
    expect_overall(&state, JobStatus::Completed)?;
    if state.agent_status("10.0.0.2") != Some(JobStatus::Paused) || state.alive_agents() != 1 {
        return Err(AppError::job(
            "Pause report should still land in the agent map",
        ));
    }
    state.mark_agent_completed("10.0.0.2");
    expect_overall(&state, JobStatus::Completed)?;
    Ok(())
}

#[test]
fn overall_derivation_holds_for_random_sequences() -> AppResult<()> {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let mut state = JobState::new("job-prop");
        for _ in 0..40 {
            let agent = AGENTS
                .get(rng.gen_range(0..AGENTS.len()))
                .copied()
                .ok_or_else(|| AppError::job("Agent index out of range"))?;
            let op = rng.gen_range(0..4);
            let terminal_before = state.agent_status(agent).filter(|status| {
                matches!(status, JobStatus::Completed | JobStatus::Killed)
            });
            match op {
                0 => state.mark_agent_running(agent),
                // Agents only report a pause out of a running state; a pause
                // report elsewhere does not recompute the overall status, so
                // an unconstrained sequence would not satisfy the derivation
                // oracle below.
                1 => {
                    if state.agent_status(agent) == Some(JobStatus::Running) {
                        state.mark_agent_paused(agent);
                    } else {
                        state.mark_agent_running(agent);
                    }
                }
                2 => state.mark_agent_completed(agent),
                _ => state.mark_agent_killed(agent),
            }

            if op >= 2 {
                let any_alive = AGENTS.iter().any(|id| {
                    matches!(
                        state.agent_status(id),
                        Some(JobStatus::Running | JobStatus::Paused)
                    )
                });
                let completed = state.overall() == JobStatus::Completed;
                if any_alive == completed {
                    return Err(AppError::job(format!(
                        "Derivation violated: alive={} overall={:?}",
                        any_alive,
                        state.overall()
                    )));
                }
                if let Some(previous) = terminal_before {
                    if state.agent_status(agent) != Some(previous) {
                        return Err(AppError::job(format!(
                            "Terminal precedence violated for {}: {:?} -> {:?}",
                            agent,
                            previous,
                            state.agent_status(agent)
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}

#[test]
fn registry_answers_for_known_and_unknown_jobs() -> AppResult<()> {
    let registry = InMemoryJobRegistry::new();
    if registry.alive_agent_count("missing") != 0 || registry.is_job_over("missing") {
        return Err(AppError::job("Unknown jobs must read as idle and not over"));
    }
    if registry.update_job("missing", |_| {}).is_ok() {
        return Err(AppError::job("Updating an unknown job must fail"));
    }

    registry.create_job("job-1");
    registry.update_job("job-1", |state| {
        state.mark_agent_running("10.0.0.1");
        state.mark_agent_running("10.0.0.2");
    })?;
    if registry.alive_agent_count("job-1") != 2 {
        return Err(AppError::job(format!(
            "Expected 2 alive agents, got {}",
            registry.alive_agent_count("job-1")
        )));
    }
    if registry.is_job_over("job-1") {
        return Err(AppError::job("Running job must not be over"));
    }

    registry.update_job("job-1", |state| {
        state.mark_agent_completed("10.0.0.1");
        state.mark_agent_completed("10.0.0.2");
    })?;
    if !registry.is_job_over("job-1") || registry.alive_agent_count("job-1") != 0 {
        return Err(AppError::job("Completed job must be over with no alive agents"));
    }
    Ok(())
}
