// crates/rbcm-rpc/src/handlers/network.rs
//
// Network state handler: GetNetworkState.

use serde::{Deserialize, Serialize};

use rbcm_reputation::{NetworkStateView, NodeStateRow};

/// Request for the merged network state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetNetworkStateRequest {}

/// Handle a GetNetworkState request.
///
/// Returns every node across both partitions, sorted by score descending.
pub async fn handle_get_network_state(
    view: &NetworkStateView,
    _request: GetNetworkStateRequest,
) -> Result<Vec<NodeStateRow>, String> {
    Ok(view.list_state().await)
}
