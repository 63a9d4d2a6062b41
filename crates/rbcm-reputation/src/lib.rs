// crates/rbcm-reputation/src/lib.rs
//
// rbcm-reputation: Node registry, attack injection, and network state view
// for the RBCM reputation simulator.
//
// The registry holds two partitions of id -> trust score (physical nodes fed
// by upstream callers, virtual nodes driven by the simulation). Every write is
// clamped to [0, 100]. The attack injector floods the virtual partition with
// fake identities or flips the rogue regime; the view projects both
// partitions into a sorted snapshot for observers.

pub mod attack;
pub mod registry;
pub mod view;

pub use attack::{AttackInjector, RogueMode, RogueState, SYBIL_BATCH_SIZE};
pub use registry::{ghost_ids, NodeRegistry};
pub use view::{NetworkStateView, NodeStateRow};
