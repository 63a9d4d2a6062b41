// crates/rbcm-rpc/src/handlers/node.rs
//
// Node health handler: GetHealth.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use rbcm_reputation::{NodeRegistry, RogueMode, RogueState};

/// Request for node health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetHealthRequest {}

/// Response containing node health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetHealthResponse {
    /// Overall health: "healthy".
    pub status: String,
    /// Number of physical nodes with at least one feedback signal.
    pub physical_nodes: usize,
    /// Number of simulated nodes (ghosts plus injected sybils).
    pub virtual_nodes: usize,
    /// Current rogue-mode regime.
    pub rogue_mode: RogueState,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// Software version.
    pub version: String,
}

/// Handle a GetHealth request.
pub async fn handle_get_health(
    _request: GetHealthRequest,
    registry: &NodeRegistry,
    rogue: &RogueMode,
    start_time: Option<Instant>,
) -> Result<GetHealthResponse, String> {
    let (physical_nodes, virtual_nodes) = registry.counts().await;
    Ok(GetHealthResponse {
        status: "healthy".to_string(),
        physical_nodes,
        virtual_nodes,
        rogue_mode: rogue.state(),
        uptime_seconds: start_time.map_or(0, |st| st.elapsed().as_secs()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
