// crates/rbcm-core/src/lib.rs
//
// rbcm-core: Core types, score calculator, and error types for the
// RBCM reputation simulator.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the node partitions, the trust-score update formula, and the
// shared error type.

pub mod error;
pub mod node;
pub mod scoring;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use rbcm_core::ScoreCalculator;`

pub use error::RbcmError;
pub use node::{NodeEntry, Partition, DEFAULT_SCORE, MAX_SCORE, MIN_SCORE};
pub use scoring::{clamp_score, ScoreCalculator};
