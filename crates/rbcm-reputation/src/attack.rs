// crates/rbcm-reputation/src/attack.rs
//
// Adversarial scenario injection.
//
// A sybil attack floods the virtual partition with freshly minted identities
// seeded at neutral trust. Rogue mode is a process-wide regime flag that the
// simulation driver reads on every tick to raise the failure probability.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::registry::NodeRegistry;

/// Number of fake identities created per sybil injection.
pub const SYBIL_BATCH_SIZE: usize = 50;

/// Shared rogue-mode flag. Defaults to inactive.
#[derive(Debug, Default)]
pub struct RogueMode {
    active: AtomicBool,
}

impl RogueMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Flip the flag atomically and return the new value.
    pub fn toggle(&self) -> bool {
        !self.active.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn state(&self) -> RogueState {
        RogueState::from(self.is_active())
    }
}

/// Label for the rogue-mode flag as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RogueState {
    Active,
    Inactive,
}

impl From<bool> for RogueState {
    fn from(active: bool) -> Self {
        if active {
            RogueState::Active
        } else {
            RogueState::Inactive
        }
    }
}

impl fmt::Display for RogueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RogueState::Active => write!(f, "Active"),
            RogueState::Inactive => write!(f, "Inactive"),
        }
    }
}

/// On-demand attack operations. Holds no state of its own beyond handles to
/// the shared registry and rogue flag.
#[derive(Debug, Clone)]
pub struct AttackInjector {
    registry: Arc<NodeRegistry>,
    rogue: Arc<RogueMode>,
}

impl AttackInjector {
    pub fn new(registry: Arc<NodeRegistry>, rogue: Arc<RogueMode>) -> Self {
        Self { registry, rogue }
    }

    /// Insert SYBIL_BATCH_SIZE new virtual nodes at the neutral score.
    ///
    /// Identifiers are UUIDv7-based so repeated injections never collide
    /// with each other or with the ghost population. Returns the virtual
    /// population size after injection.
    pub async fn trigger_sybil_attack(&self) -> usize {
        let ids: Vec<String> = (0..SYBIL_BATCH_SIZE)
            .map(|_| format!("sybil-{}", Uuid::now_v7()))
            .collect();
        let total = self.registry.seed_virtual(ids).await;
        tracing::warn!(
            "Sybil attack injected {} fake nodes (virtual population now {})",
            SYBIL_BATCH_SIZE,
            total
        );
        total
    }

    /// Flip rogue mode and return the resulting state.
    pub fn toggle_rogue_mode(&self) -> RogueState {
        let state = RogueState::from(self.rogue.toggle());
        tracing::warn!("Rogue mode is now {}", state);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ghost_ids;

    fn injector() -> (AttackInjector, Arc<NodeRegistry>, Arc<RogueMode>) {
        let registry = Arc::new(NodeRegistry::new());
        let rogue = Arc::new(RogueMode::new());
        (
            AttackInjector::new(registry.clone(), rogue.clone()),
            registry,
            rogue,
        )
    }

    #[tokio::test]
    async fn sybil_adds_exactly_one_batch() {
        let (injector, registry, _) = injector();
        registry.seed_virtual(ghost_ids(20)).await;

        let count = injector.trigger_sybil_attack().await;
        assert_eq!(count, 20 + SYBIL_BATCH_SIZE);
        assert_eq!(registry.virtual_count().await, count);

        let count = injector.trigger_sybil_attack().await;
        assert_eq!(count, 20 + 2 * SYBIL_BATCH_SIZE);
    }

    #[tokio::test]
    async fn sybil_nodes_start_neutral() {
        let (injector, registry, _) = injector();
        injector.trigger_sybil_attack().await;
        let snapshot = registry.snapshot_merged().await;
        assert!(snapshot
            .iter()
            .all(|(id, e)| id.starts_with("sybil-") && e.score == rbcm_core::DEFAULT_SCORE));
    }

    #[test]
    fn rogue_mode_defaults_inactive() {
        let rogue = RogueMode::new();
        assert!(!rogue.is_active());
        assert_eq!(rogue.state(), RogueState::Inactive);
    }

    #[test]
    fn toggling_twice_restores_original() {
        let (injector, _, rogue) = injector();
        assert_eq!(injector.toggle_rogue_mode(), RogueState::Active);
        assert!(rogue.is_active());
        assert_eq!(injector.toggle_rogue_mode(), RogueState::Inactive);
        assert!(!rogue.is_active());
    }

    #[test]
    fn rogue_state_labels() {
        assert_eq!(RogueState::Active.to_string(), "Active");
        assert_eq!(RogueState::Inactive.to_string(), "Inactive");
    }
}
