use thiserror::Error;

use super::{ConfigError, ConsolidationError, JobError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("TOML error: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Consolidation error: {0}")]
    Consolidation(#[from] ConsolidationError),
    #[error("Job error: {0}")]
    Job(#[from] JobError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    #[must_use]
    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    #[must_use]
    pub fn consolidation<E>(error: E) -> Self
    where
        E: Into<ConsolidationError>,
    {
        error.into().into()
    }

    #[must_use]
    pub fn job<E>(error: E) -> Self
    where
        E: Into<JobError>,
    {
        error.into().into()
    }
}
