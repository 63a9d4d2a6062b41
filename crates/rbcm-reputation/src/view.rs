// crates/rbcm-reputation/src/view.rs
//
// Read-only projection of the registry for observers.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use rbcm_core::{NodeEntry, Partition};

use crate::registry::NodeRegistry;

/// One row of the externally visible network state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStateRow {
    pub id: String,
    /// Score rounded to two decimal places.
    pub score: f64,
    #[serde(rename = "type")]
    pub node_type: Partition,
}

/// Stateless view over a shared registry.
#[derive(Debug, Clone)]
pub struct NetworkStateView {
    registry: Arc<NodeRegistry>,
}

impl NetworkStateView {
    pub fn new(registry: Arc<NodeRegistry>) -> Self {
        Self { registry }
    }

    /// Merged snapshot of both partitions, sorted by score descending.
    pub async fn list_state(&self) -> Vec<NodeStateRow> {
        project(self.registry.snapshot_merged().await)
    }
}

/// Round to two decimal places.
fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

/// Turn a merged snapshot into rows ordered by score descending, then id
/// ascending.
pub fn project(snapshot: HashMap<String, NodeEntry>) -> Vec<NodeStateRow> {
    let mut rows: Vec<NodeStateRow> = snapshot
        .into_iter()
        .map(|(id, entry)| NodeStateRow {
            id,
            score: round2(entry.score),
            node_type: entry.partition,
        })
        .collect();

    rows.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.id.cmp(&b.id),
        other => other,
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: f64, partition: Partition) -> NodeEntry {
        NodeEntry { score, partition }
    }

    #[test]
    fn rows_are_sorted_by_score_then_id() {
        let mut snapshot = HashMap::new();
        snapshot.insert("b".to_string(), entry(40.0, Partition::Virtual));
        snapshot.insert("a".to_string(), entry(40.0, Partition::Physical));
        snapshot.insert("c".to_string(), entry(90.0, Partition::Virtual));
        snapshot.insert("d".to_string(), entry(0.0, Partition::Physical));

        let rows = project(snapshot);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b", "d"]);
        assert!(rows.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn scores_are_rounded_to_two_places() {
        let mut snapshot = HashMap::new();
        snapshot.insert("x".to_string(), entry(54.476_771, Partition::Physical));
        let rows = project(snapshot);
        assert_eq!(rows[0].score, 54.48);
    }

    #[test]
    fn type_serializes_from_partition() {
        let row = NodeStateRow {
            id: "ghost-001".to_string(),
            score: 50.0,
            node_type: Partition::Virtual,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["type"], "Virtual");
        assert_eq!(json["id"], "ghost-001");
    }

    #[tokio::test]
    async fn list_state_covers_both_partitions() {
        let registry = Arc::new(NodeRegistry::new());
        registry.seed_virtual(crate::registry::ghost_ids(3)).await;
        registry.upsert_physical("real-1", true, 1.0).await.unwrap();
        registry.upsert_physical("real-2", false, 1.0).await.unwrap();

        let rows = NetworkStateView::new(registry).list_state().await;
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].id, "real-1");
        assert_eq!(rows[0].node_type, Partition::Physical);
        assert_eq!(rows[4].id, "real-2");
        assert!(rows.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
