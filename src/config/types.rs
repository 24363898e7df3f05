use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError};

/// Raw on-disk configuration; every field optional so a file only has to
/// name what it overrides.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub tick_interval_ms: Option<u64>,
    pub agent_settle_secs: Option<u64>,
    pub combined_settle_secs: Option<u64>,
    pub finalize_grace_secs: Option<u64>,
    pub bucket_span_secs: Option<u64>,
}

/// Resolved windowing constants. The defaults are the platform's wire
/// contract with its dashboards; overrides exist for operators running
/// slow-reporting fleets.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub tick_interval_ms: u64,
    pub agent_settle_ms: i64,
    pub combined_settle_ms: i64,
    pub finalize_grace_ms: i64,
    pub bucket_span_ms: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tick_interval_ms: 5_000,
            agent_settle_ms: 20_000,
            combined_settle_ms: 60_000,
            finalize_grace_ms: 30_000,
            bucket_span_ms: 10_000,
        }
    }
}

impl EngineConfig {
    /// Applies a loaded config file on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when a zero interval or window is configured.
    pub fn apply(file: &ConfigFile) -> AppResult<Self> {
        let mut config = EngineConfig::default();
        if let Some(tick_interval_ms) = file.tick_interval_ms {
            require_positive("tick_interval_ms", tick_interval_ms)?;
            config.tick_interval_ms = tick_interval_ms;
        }
        if let Some(secs) = file.agent_settle_secs {
            require_positive("agent_settle_secs", secs)?;
            config.agent_settle_ms = to_ms(secs);
        }
        if let Some(secs) = file.combined_settle_secs {
            require_positive("combined_settle_secs", secs)?;
            config.combined_settle_ms = to_ms(secs);
        }
        if let Some(secs) = file.finalize_grace_secs {
            config.finalize_grace_ms = to_ms(secs);
        }
        if let Some(secs) = file.bucket_span_secs {
            require_positive("bucket_span_secs", secs)?;
            config.bucket_span_ms = to_ms(secs);
        }
        Ok(config)
    }

    #[must_use]
    pub const fn settle_ms_for(&self, combined: bool) -> i64 {
        if combined {
            self.combined_settle_ms
        } else {
            self.agent_settle_ms
        }
    }
}

fn to_ms(secs: u64) -> i64 {
    i64::try_from(secs.saturating_mul(1_000)).unwrap_or(i64::MAX)
}

fn require_positive(field: &'static str, value: u64) -> AppResult<()> {
    if value == 0 {
        return Err(AppError::config(ConfigError::FieldMustBePositive { field }));
    }
    Ok(())
}
