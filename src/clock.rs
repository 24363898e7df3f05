//! Wall-clock source used by the readiness gate.
//!
//! The consolidation engine compares buffered sample timestamps against
//! "now"; injecting the clock keeps the windowing logic testable without
//! waiting out real settle windows.

pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
