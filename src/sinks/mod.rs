//! Consolidated-output destinations.
pub(crate) mod writers;
