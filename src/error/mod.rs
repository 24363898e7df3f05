mod app;
mod config;
mod consolidation;
mod job;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use consolidation::ConsolidationError;
pub use job::JobError;
