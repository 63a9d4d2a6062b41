// crates/rbcm-reputation/src/registry.rs
//
// NodeRegistry: the shared id -> score store for both node partitions.
//
// One RwLock guards both partition maps, so every read-modify-write
// (read old score, compute, clamp, write) runs under a single write guard
// and snapshots see both partitions at the same instant.

use std::collections::HashMap;

use rand::seq::IteratorRandom;
use rand::Rng;
use tokio::sync::RwLock;

use rbcm_core::{clamp_score, NodeEntry, Partition, RbcmError, ScoreCalculator, DEFAULT_SCORE};

/// Identifiers for the initial ghost population: `ghost-000`, `ghost-001`, ...
pub fn ghost_ids(count: usize) -> impl Iterator<Item = String> {
    (0..count).map(|i| format!("ghost-{:03}", i))
}

#[derive(Debug, Default)]
struct Partitions {
    physical: HashMap<String, f64>,
    virtual_nodes: HashMap<String, f64>,
}

impl Partitions {
    fn get_mut(&mut self, partition: Partition) -> &mut HashMap<String, f64> {
        match partition {
            Partition::Physical => &mut self.physical,
            Partition::Virtual => &mut self.virtual_nodes,
        }
    }
}

/// Concurrency-safe store of trust scores for physical and virtual nodes.
///
/// Entries are never deleted. Physical entries are created lazily on first
/// feedback; virtual entries are seeded in bulk and may grow through sybil
/// injection.
#[derive(Debug)]
pub struct NodeRegistry {
    calculator: ScoreCalculator,
    inner: RwLock<Partitions>,
}

impl NodeRegistry {
    /// Create an empty registry using the default score calculator.
    pub fn new() -> Self {
        Self::with_calculator(ScoreCalculator::default())
    }

    /// Create an empty registry using a custom score calculator.
    pub fn with_calculator(calculator: ScoreCalculator) -> Self {
        Self {
            calculator,
            inner: RwLock::new(Partitions::default()),
        }
    }

    /// Apply one feedback signal to a physical node and return its new score.
    ///
    /// Unknown ids start at the neutral score of 50.0.
    pub async fn upsert_physical(
        &self,
        id: &str,
        success: bool,
        distance: f64,
    ) -> Result<f64, RbcmError> {
        self.upsert(Partition::Physical, id, success, distance).await
    }

    /// Apply one feedback signal to a virtual node and return its new score.
    ///
    /// An id that was never seeded is created at the neutral score rather
    /// than rejected.
    pub async fn upsert_virtual(
        &self,
        id: &str,
        success: bool,
        distance: f64,
    ) -> Result<f64, RbcmError> {
        self.upsert(Partition::Virtual, id, success, distance).await
    }

    async fn upsert(
        &self,
        partition: Partition,
        id: &str,
        success: bool,
        distance: f64,
    ) -> Result<f64, RbcmError> {
        let gradient = ScoreCalculator::gradient(distance)?;

        let mut maps = self.inner.write().await;
        let map = maps.get_mut(partition);

        let current = match map.get(id) {
            Some(score) => *score,
            None => {
                if partition == Partition::Virtual {
                    tracing::debug!("Virtual node {} was not seeded; seeding on write", id);
                }
                DEFAULT_SCORE
            }
        };

        let new_score = clamp_score(self.calculator.compute(current, success, distance)?);
        map.insert(id.to_string(), new_score);
        drop(maps);

        match (partition, success) {
            (Partition::Physical, true) => tracing::info!(
                "Node {} SUCCESS. Gradient: {:.3}. New Score: {:.2}",
                id,
                gradient,
                new_score
            ),
            (Partition::Physical, false) => tracing::info!(
                "Node {} FAIL. Penalty applied. New Score: {:.2}",
                id,
                new_score
            ),
            (Partition::Virtual, _) => tracing::trace!(
                "Ghost {} {} -> {:.2}",
                id,
                if success { "success" } else { "failure" },
                new_score
            ),
        }

        Ok(new_score)
    }

    /// Seed virtual nodes at the neutral score.
    ///
    /// Ids already present keep their current score. Returns the virtual
    /// population size after seeding.
    pub async fn seed_virtual<I>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut maps = self.inner.write().await;
        for id in ids {
            maps.virtual_nodes.entry(id).or_insert(DEFAULT_SCORE);
        }
        maps.virtual_nodes.len()
    }

    /// Immutable copy of both partitions merged into one map.
    ///
    /// Physical entries take precedence when an id exists in both.
    pub async fn snapshot_merged(&self) -> HashMap<String, NodeEntry> {
        let maps = self.inner.read().await;
        let mut merged = HashMap::with_capacity(maps.physical.len() + maps.virtual_nodes.len());

        for (id, score) in &maps.virtual_nodes {
            merged.insert(
                id.clone(),
                NodeEntry {
                    score: *score,
                    partition: Partition::Virtual,
                },
            );
        }
        for (id, score) in &maps.physical {
            merged.insert(
                id.clone(),
                NodeEntry {
                    score: *score,
                    partition: Partition::Physical,
                },
            );
        }
        merged
    }

    /// Look up a single node, checking the physical partition first.
    pub async fn score_of(&self, id: &str) -> Option<NodeEntry> {
        let maps = self.inner.read().await;
        if let Some(score) = maps.physical.get(id) {
            return Some(NodeEntry {
                score: *score,
                partition: Partition::Physical,
            });
        }
        maps.virtual_nodes.get(id).map(|score| NodeEntry {
            score: *score,
            partition: Partition::Virtual,
        })
    }

    /// Population sizes as `(physical, virtual)`.
    pub async fn counts(&self) -> (usize, usize) {
        let maps = self.inner.read().await;
        (maps.physical.len(), maps.virtual_nodes.len())
    }

    /// Number of virtual nodes.
    pub async fn virtual_count(&self) -> usize {
        self.inner.read().await.virtual_nodes.len()
    }

    /// Pick one virtual id uniformly at random, or None if the partition is empty.
    pub async fn random_virtual_id<R>(&self, rng: &mut R) -> Option<String>
    where
        R: Rng + ?Sized,
    {
        let maps = self.inner.read().await;
        maps.virtual_nodes.keys().choose(rng).cloned()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
