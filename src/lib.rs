//! Core library for the `loadgrid` consolidation engine.
//!
//! This crate turns the partial, asynchronously-arriving raw sample streams
//! of a distributed load-test fleet into a consolidated time series: an
//! engine tails per-agent files, buffers and time-windows their content,
//! extrapolates partial observations into fleet-wide totals, and persists
//! an append-only history plus a latest snapshot per stream. The
//! distributed job-completion state machine that gates final flushes lives
//! here too; HTTP surfaces and load generation are separate services that
//! drive this crate through [`consolidator::Consolidator`] and
//! [`job::InMemoryJobRegistry`].
pub mod args;
pub mod clock;
pub mod config;
pub mod consolidator;
pub mod entry;
pub mod error;
pub mod job;
pub mod logger;
pub mod shutdown;
pub mod trigger;

pub(crate) mod sinks;
