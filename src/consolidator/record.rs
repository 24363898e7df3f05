use serde::{Deserialize, Serialize};

use crate::error::ConsolidationError;

/// One parsed raw sample line: `<epoch ms>,<threads>,<throughput>[,...]`.
/// Fields past the third are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRecord {
    pub time_ms: i64,
    pub threads: f64,
    pub throughput: f64,
}

impl SampleRecord {
    /// Parses a raw sample line.
    ///
    /// # Errors
    ///
    /// Returns `ConsolidationError::MalformedSample` when any of the three
    /// leading fields is missing or non-numeric.
    pub fn parse(line: &str) -> Result<SampleRecord, ConsolidationError> {
        let trimmed = line.trim_end();
        let mut parts = trimmed.split(',');
        let time_ms = parts
            .next()
            .and_then(|value| value.parse::<i64>().ok())
            .ok_or_else(|| ConsolidationError::malformed(line))?;
        let threads = parts
            .next()
            .and_then(|value| value.parse::<f64>().ok())
            .ok_or_else(|| ConsolidationError::malformed(line))?;
        let throughput = parts
            .next()
            .and_then(|value| value.parse::<f64>().ok())
            .ok_or_else(|| ConsolidationError::malformed(line))?;
        Ok(SampleRecord {
            time_ms,
            threads,
            throughput,
        })
    }
}

/// One finalized bucket, serialized as a single JSON line of the `.stats`
/// stream and of the `.stats.last` snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedRecord {
    pub time: i64,
    pub threads: f64,
    pub throughput: f64,
}
