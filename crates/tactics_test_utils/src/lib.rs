//! # Tactics Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Recording host with configurable presentation latency
//! - Battle fixtures and archetypes
//! - Determinism harness
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod host;

/// Re-export proptest for convenience.
pub use proptest;
