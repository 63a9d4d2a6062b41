// crates/rbcm-cli/src/commands/status.rs
//
// `rbcm status` — display daemon health and population counts.

use rbcm_rpc::handlers::node::GetHealthResponse;

use crate::rpc_client::call_method;

/// Run the status command.
pub async fn run(rpc: &str) -> Result<(), Box<dyn std::error::Error>> {
    let health: GetHealthResponse = call_method(rpc, "node/health", serde_json::json!({})).await?;

    println!("RBCM daemon v{}", health.version);
    println!();
    println!("Node Status");
    println!("-----------");
    println!("  RPC endpoint:   {}", rpc);
    println!("  Status:         {}", health.status);
    println!("  Uptime:         {}s", health.uptime_seconds);
    println!("  Physical nodes: {}", health.physical_nodes);
    println!("  Virtual nodes:  {}", health.virtual_nodes);
    println!("  Rogue mode:     {}", health.rogue_mode);

    Ok(())
}
