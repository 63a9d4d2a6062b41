// crates/rbcm-daemon/src/shared.rs
//
// DaemonSharedState: the shared mutable state of the daemon.
//
// Constructed once in main.rs, then handed to the simulation driver and the
// RPC server. Nothing in the daemon touches the registry or rogue flag
// except through these handles.

use std::sync::Arc;
use std::time::Instant;

use rbcm_reputation::{ghost_ids, NodeRegistry, RogueMode};

#[derive(Clone)]
pub struct DaemonSharedState {
    /// Physical and virtual node scores.
    pub registry: Arc<NodeRegistry>,
    /// Rogue-mode regime flag read by the simulation driver each tick.
    pub rogue: Arc<RogueMode>,
    /// Daemon start time for uptime calculation.
    pub start_time: Instant,
}

impl DaemonSharedState {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(NodeRegistry::new()),
            rogue: Arc::new(RogueMode::new()),
            start_time: Instant::now(),
        }
    }

    /// Seed the initial ghost population and return the virtual count.
    pub async fn seed_ghosts(&self, count: usize) -> usize {
        self.registry.seed_virtual(ghost_ids(count)).await
    }
}

impl Default for DaemonSharedState {
    fn default() -> Self {
        Self::new()
    }
}
