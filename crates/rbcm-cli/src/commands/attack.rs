// crates/rbcm-cli/src/commands/attack.rs
//
// `rbcm sybil` / `rbcm rogue` — adversarial scenario injection.

use rbcm_rpc::handlers::attack::{TriggerSybilAttackResponse, ToggleRogueModeResponse};

use crate::rpc_client::call_method;

/// Run the sybil command.
pub async fn run_sybil(rpc: &str) -> Result<(), Box<dyn std::error::Error>> {
    let resp: TriggerSybilAttackResponse =
        call_method(rpc, "attack/sybil", serde_json::json!({})).await?;
    println!("{}: virtual population is now {}", resp.status, resp.count);
    Ok(())
}

/// Run the rogue command.
pub async fn run_rogue(rpc: &str) -> Result<(), Box<dyn std::error::Error>> {
    let resp: ToggleRogueModeResponse =
        call_method(rpc, "attack/rogue", serde_json::json!({})).await?;
    println!("Rogue mode: {}", resp.status);
    Ok(())
}
