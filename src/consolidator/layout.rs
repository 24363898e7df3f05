use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult, ConsolidationError};

/// Marker the agents and the per-job combiner put in raw sample file names.
pub(crate) const REALTIME_MARKER: &str = "realTimeConf";
/// Marker distinguishing the job-combined stream from per-agent streams.
pub(crate) const COMBINED_MARKER: &str = "combined";
/// Suffix of the append-only consolidated stream.
pub(crate) const STATS_SUFFIX: &str = "stats";
/// Suffix of the overwritten latest-bucket snapshot.
pub(crate) const LATEST_SUFFIX: &str = "stats.last";

/// Filesystem layout of the per-job stats tree.
#[derive(Debug, Clone)]
pub struct StatsLayout {
    root: PathBuf,
}

impl StatsLayout {
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        StatsLayout { root }
    }

    #[must_use]
    pub fn job_stats_dir(&self, job_id: &str) -> PathBuf {
        self.root.join(job_id)
    }
}

/// True for raw real-time sample files; consolidated output carries the
/// marker too but is excluded by its `.stats` suffix.
pub(crate) fn is_realtime_source(path: &Path) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| name.contains(REALTIME_MARKER) && !name.contains(STATS_SUFFIX))
}

/// Agent-level streams settle faster than the job-combined stream; the
/// distinction is carried in the file name.
pub(crate) fn is_combined_file(path: &Path) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| name.contains(COMBINED_MARKER))
}

pub(crate) fn stats_path(source: &Path) -> PathBuf {
    suffixed(source, STATS_SUFFIX)
}

pub(crate) fn latest_path(source: &Path) -> PathBuf {
    suffixed(source, LATEST_SUFFIX)
}

fn suffixed(source: &Path, suffix: &str) -> PathBuf {
    let mut name = source.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Recursively lists raw real-time sample files under a job's stats
/// directory, sorted for deterministic pass order.
///
/// # Errors
///
/// Returns an error when a directory in the tree cannot be read, e.g. when
/// the job never produced a stats directory.
pub(crate) async fn realtime_files(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        let mut entries = tokio::fs::read_dir(&current).await.map_err(|err| {
            AppError::consolidation(ConsolidationError::io(
                "scan stats directory",
                &current,
                err,
            ))
        })?;
        loop {
            let entry = entries.next_entry().await.map_err(|err| {
                AppError::consolidation(ConsolidationError::io(
                    "scan stats directory",
                    &current,
                    err,
                ))
            })?;
            let Some(entry) = entry else {
                break;
            };
            let file_type = entry.file_type().await.map_err(|err| {
                AppError::consolidation(ConsolidationError::io(
                    "inspect stats entry",
                    &entry.path(),
                    err,
                ))
            })?;
            if file_type.is_dir() {
                stack.push(entry.path());
            } else if is_realtime_source(&entry.path()) {
                found.push(entry.path());
            }
        }
    }
    found.sort();
    Ok(found)
}
