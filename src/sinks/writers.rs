use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::consolidator::layout::{latest_path, stats_path};
use crate::consolidator::record::ConsolidatedRecord;
use crate::error::{AppError, AppResult, ConsolidationError};

/// Write a closed bucket to both destinations for a raw source file: append
/// one line to the durable `.stats` stream and replace the `.stats.last`
/// snapshot with only this record.
///
/// # Errors
///
/// Returns an error when the record cannot be serialized or either file
/// cannot be written.
pub(crate) async fn emit_record(source: &Path, record: &ConsolidatedRecord) -> AppResult<()> {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');
    append_stats_line(&stats_path(source), &line).await?;
    write_latest(&latest_path(source), &line).await?;
    Ok(())
}

async fn append_stats_line(path: &Path, line: &str) -> AppResult<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|err| {
            AppError::consolidation(ConsolidationError::io("open stats stream", path, err))
        })?;
    file.write_all(line.as_bytes()).await.map_err(|err| {
        AppError::consolidation(ConsolidationError::io("append stats record", path, err))
    })?;
    file.flush().await.map_err(|err| {
        AppError::consolidation(ConsolidationError::io("flush stats stream", path, err))
    })?;
    Ok(())
}

async fn write_latest(path: &Path, line: &str) -> AppResult<()> {
    tokio::fs::write(path, line).await.map_err(|err| {
        AppError::consolidation(ConsolidationError::io("write latest snapshot", path, err))
    })
}
