//! Distributed job-completion tracking.
mod registry;
mod state;

#[cfg(test)]
mod tests;

pub use registry::{InMemoryJobRegistry, JobRegistry};
pub use state::{JobState, JobStatus};
