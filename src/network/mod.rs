//! Network module for packet classification and payload rewriting.
//!
//! This module contains the components the interception host drives per
//! packet: the buffer chain walker, the rewrite engine, and the
//! classification decision logic.

pub mod classify;
pub mod core;
pub mod modules;
pub mod stats;

// Re-export the classification surface for convenience
pub use classify::Classifier;
pub use stats::ClassifyStatistics;
