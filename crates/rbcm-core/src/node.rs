// crates/rbcm-core/src/node.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lower bound of every stored trust score.
pub const MIN_SCORE: f64 = 0.0;

/// Upper bound of every stored trust score.
pub const MAX_SCORE: f64 = 100.0;

/// Neutral score assigned to a node the first time it is seen.
pub const DEFAULT_SCORE: f64 = 50.0;

/// Which registry partition a node lives in.
///
/// - **Physical**: a real node whose feedback arrives from an upstream caller.
/// - **Virtual**: a simulated ("ghost") node driven by the simulation loop,
///   including identities injected by a sybil attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partition {
    Physical,
    Virtual,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partition::Physical => write!(f, "Physical"),
            Partition::Virtual => write!(f, "Virtual"),
        }
    }
}

/// A node's score together with the partition it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    /// Current trust score, always within [MIN_SCORE, MAX_SCORE].
    pub score: f64,
    /// Partition the score belongs to.
    pub partition: Partition,
}
