use std::io::SeekFrom;
use std::path::Path;

use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tracing::debug;

use crate::error::{AppError, AppResult, ConsolidationError};
use crate::job::JobRegistry;
use crate::sinks::writers::emit_record;

use super::cursor::FileCursor;
use super::record::{ConsolidatedRecord, SampleRecord};

pub(super) struct PassParams<'pass> {
    pub job_id: &'pass str,
    pub registry: &'pass dyn JobRegistry,
    /// Terminal per the registry, or forced by deregistration.
    pub job_over: bool,
    pub settle_ms: i64,
    pub grace_ms: i64,
    pub bucket_span_ms: i64,
    pub now_ms: i64,
}

#[derive(Default)]
struct Bucket {
    start_ts: Option<i64>,
    last_ts: i64,
    sum_threads: f64,
    sum_throughput: f64,
    count: u64,
    lines: Vec<String>,
}

impl Bucket {
    fn push(&mut self, line: String, sample: &SampleRecord) -> i64 {
        let start_ts = *self.start_ts.get_or_insert(sample.time_ms);
        self.last_ts = sample.time_ms;
        self.sum_threads += sample.threads;
        self.sum_throughput += sample.throughput;
        self.count = self.count.saturating_add(1);
        self.lines.push(line);
        start_ts
    }

    /// Average the bucket and extrapolate to the fleet: a bucket usually
    /// holds samples from only the subset of agents that reported in the
    /// interval, so the per-sample average is scaled by the alive-agent
    /// count under a homogeneous-load assumption.
    fn close(&self, alive_agents: usize) -> ConsolidatedRecord {
        let alive = if alive_agents == 0 { 1 } else { alive_agents };
        let scale = alive as f64;
        let count = self.count.max(1) as f64;
        ConsolidatedRecord {
            time: self.last_ts,
            threads: (self.sum_threads / count) * scale,
            throughput: (self.sum_throughput / count) * scale,
        }
    }
}

/// One consolidation pass over a single raw sample file: pull new lines into
/// the cursor buffer, and finalize whatever the readiness gate allows.
pub(super) async fn run_pass(
    path: &Path,
    cursor: &mut FileCursor,
    params: &PassParams<'_>,
) -> AppResult<()> {
    read_new_lines(path, cursor).await?;

    // Textual sort keeps the buffer chronological via the leading epoch-ms
    // field, as long as all buffered timestamps have the same digit width.
    cursor.pending.make_contiguous().sort_unstable();

    if !ready_to_finalize(path, cursor, params)? {
        return Ok(());
    }

    // A run with a single repeat produces one line total; it is passed
    // through verbatim rather than averaged and scaled.
    if params.job_over && !cursor.emitted_any && cursor.pending.len() == 1 {
        if let Some(line) = cursor.pending.pop_front() {
            let sample = match SampleRecord::parse(&line) {
                Ok(sample) => sample,
                Err(err) => {
                    cursor.pending.push_front(line);
                    return Err(AppError::consolidation(err));
                }
            };
            let record = ConsolidatedRecord {
                time: sample.time_ms,
                threads: sample.threads,
                throughput: sample.throughput,
            };
            emit_record(path, &record).await?;
            cursor.emitted_any = true;
        }
        return Ok(());
    }

    let mut bucket = Bucket::default();
    while let Some(line) = cursor.pending.pop_front() {
        let sample = match SampleRecord::parse(&line) {
            Ok(sample) => sample,
            Err(err) => {
                cursor.pending.push_front(line);
                return Err(AppError::consolidation(err));
            }
        };

        // Stepping into the settle window of a still-running job: put the
        // sample back, flush whatever accumulated, and wait for the peers.
        if !params.job_over && params.now_ms.saturating_sub(sample.time_ms) < params.settle_ms {
            cursor.pending.push_front(line);
            if bucket.count > 0 {
                close_bucket(path, cursor, params, &bucket).await?;
            }
            return Ok(());
        }

        let start_ts = bucket.push(line, &sample);
        if sample.time_ms.saturating_sub(start_ts) > params.bucket_span_ms
            || (params.job_over && cursor.pending.is_empty())
        {
            close_bucket(path, cursor, params, &bucket).await?;
            bucket = Bucket::default();
        }
    }

    // Buffer drained while the job is alive with a bucket still open: no
    // close condition was met, so the consumed lines go back to the buffer
    // and are finalized once the job ends or the span grows.
    if bucket.count > 0 {
        for line in bucket.lines.into_iter().rev() {
            cursor.pending.push_front(line);
        }
    }
    Ok(())
}

async fn close_bucket(
    path: &Path,
    cursor: &mut FileCursor,
    params: &PassParams<'_>,
    bucket: &Bucket,
) -> AppResult<()> {
    let alive_agents = params.registry.alive_agent_count(params.job_id);
    let record = bucket.close(alive_agents);
    emit_record(path, &record).await?;
    cursor.emitted_any = true;
    Ok(())
}

/// Decides whether buffered content may be finalized: only once the job is
/// over, or the oldest buffered sample has aged past the settle window plus
/// the grace period.
fn ready_to_finalize(
    path: &Path,
    cursor: &FileCursor,
    params: &PassParams<'_>,
) -> AppResult<bool> {
    let Some(first_line) = cursor.pending.front() else {
        return Ok(false);
    };
    let first_ts = SampleRecord::parse(first_line)
        .map_err(AppError::consolidation)?
        .time_ms;
    let age_ms = params.now_ms.saturating_sub(first_ts);
    debug!(
        "Oldest buffered sample for '{}' is {}ms old ({} buffered)",
        path.display(),
        age_ms,
        cursor.pending.len()
    );
    Ok(age_ms > params.settle_ms.saturating_add(params.grace_ms) || params.job_over)
}

async fn read_new_lines(path: &Path, cursor: &mut FileCursor) -> AppResult<()> {
    let file = tokio::fs::File::open(path).await.map_err(|err| {
        AppError::consolidation(ConsolidationError::io("open sample file", path, err))
    })?;
    let mut reader = BufReader::new(file);
    reader
        .seek(SeekFrom::Start(cursor.bytes_consumed))
        .await
        .map_err(|err| {
            AppError::consolidation(ConsolidationError::io("seek sample file", path, err))
        })?;

    let mut line = String::new();
    loop {
        line.clear();
        let bytes = reader.read_line(&mut line).await.map_err(|err| {
            AppError::consolidation(ConsolidationError::io("read sample line", path, err))
        })?;
        if bytes == 0 {
            break;
        }
        if !line.ends_with('\n') {
            // Torn tail write; leave it for the next tick.
            break;
        }
        cursor.bytes_consumed = cursor.bytes_consumed.saturating_add(bytes as u64);
        cursor.lines_consumed = cursor.lines_consumed.saturating_add(1);
        cursor.pending.push_back(line.trim_end().to_owned());
    }
    Ok(())
}
