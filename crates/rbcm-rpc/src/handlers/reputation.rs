// crates/rbcm-rpc/src/handlers/reputation.rs
//
// Feedback handlers: UpdateScore, GetNodeScore.

use serde::{Deserialize, Deserializer, Serialize};

use rbcm_core::{Partition, RbcmError};
use rbcm_reputation::NodeRegistry;

// ---------------------------------------------------------------------------
// UpdateScore
// ---------------------------------------------------------------------------

/// Feedback about one physical node.
///
/// Every field is optional on the wire: `node_id` defaults to `"0"` and may
/// be sent as a string or a number, `success` defaults to false, and
/// `distance` defaults to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateScoreRequest {
    #[serde(default = "default_node_id", deserialize_with = "lenient_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default = "default_distance")]
    pub distance: f64,
}

fn default_node_id() -> String {
    "0".to_string()
}

fn default_distance() -> f64 {
    1.0
}

/// Accept any JSON scalar as a node id; null falls back to the default.
fn lenient_node_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => default_node_id(),
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateScoreResponse {
    pub new_score: f64,
}

/// Handle an UpdateScore request against the physical partition.
pub async fn handle_update_score(
    registry: &NodeRegistry,
    request: UpdateScoreRequest,
) -> Result<UpdateScoreResponse, String> {
    let new_score = registry
        .upsert_physical(&request.node_id, request.success, request.distance)
        .await
        .map_err(|e| e.to_string())?;
    Ok(UpdateScoreResponse { new_score })
}

// ---------------------------------------------------------------------------
// GetNodeScore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetNodeScoreRequest {
    pub node_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetNodeScoreResponse {
    pub id: String,
    pub score: f64,
    #[serde(rename = "type")]
    pub node_type: Partition,
}

/// Handle a GetNodeScore request. Physical entries shadow virtual ones.
pub async fn handle_get_node_score(
    registry: &NodeRegistry,
    request: GetNodeScoreRequest,
) -> Result<GetNodeScoreResponse, String> {
    match registry.score_of(&request.node_id).await {
        Some(entry) => Ok(GetNodeScoreResponse {
            id: request.node_id,
            score: entry.score,
            node_type: entry.partition,
        }),
        None => Err(RbcmError::NotFound(format!("node {}", request.node_id)).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_lenient_defaults() {
        let req: UpdateScoreRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(req.node_id, "0");
        assert!(!req.success);
        assert_eq!(req.distance, 1.0);
    }

    #[test]
    fn numeric_node_id_is_stringified() {
        let req: UpdateScoreRequest =
            serde_json::from_value(serde_json::json!({"node_id": 7, "success": true})).unwrap();
        assert_eq!(req.node_id, "7");
        assert!(req.success);
    }

    #[test]
    fn null_node_id_falls_back_to_default() {
        let req: UpdateScoreRequest =
            serde_json::from_value(serde_json::json!({"node_id": null})).unwrap();
        assert_eq!(req.node_id, "0");
    }

    #[tokio::test]
    async fn update_score_returns_new_score() {
        let registry = NodeRegistry::new();
        let req = UpdateScoreRequest {
            node_id: "peer-1".to_string(),
            success: false,
            distance: 1.0,
        };
        let resp = handle_update_score(&registry, req).await.unwrap();
        assert!((resp.new_score - (50.0 - 2.0 * 0.5_f64.exp())).abs() < 1e-9);
    }

    #[tokio::test]
    async fn bad_distance_surfaces_domain_error() {
        let registry = NodeRegistry::new();
        let req = UpdateScoreRequest {
            node_id: "peer-1".to_string(),
            success: true,
            distance: -2.0,
        };
        let err = handle_update_score(&registry, req).await.unwrap_err();
        assert!(err.starts_with("Domain error"), "{}", err);
    }

    #[tokio::test]
    async fn unknown_node_is_not_found() {
        let registry = NodeRegistry::new();
        let err = handle_get_node_score(
            &registry,
            GetNodeScoreRequest {
                node_id: "nobody".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(err.starts_with("Not found"));
    }
}
