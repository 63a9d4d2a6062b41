// crates/rbcm-rpc/src/handlers/attack.rs
//
// Attack injection handlers: TriggerSybilAttack, ToggleRogueMode.

use serde::{Deserialize, Serialize};

use rbcm_reputation::AttackInjector;

// ---------------------------------------------------------------------------
// TriggerSybilAttack
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerSybilAttackRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerSybilAttackResponse {
    pub status: String,
    /// Virtual population size after the injection.
    pub count: usize,
}

pub async fn handle_trigger_sybil_attack(
    injector: &AttackInjector,
    _request: TriggerSybilAttackRequest,
) -> Result<TriggerSybilAttackResponse, String> {
    let count = injector.trigger_sybil_attack().await;
    Ok(TriggerSybilAttackResponse {
        status: "Sybil attack launched".to_string(),
        count,
    })
}

// ---------------------------------------------------------------------------
// ToggleRogueMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleRogueModeRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleRogueModeResponse {
    /// "Active" or "Inactive".
    pub status: String,
}

pub async fn handle_toggle_rogue_mode(
    injector: &AttackInjector,
    _request: ToggleRogueModeRequest,
) -> Result<ToggleRogueModeResponse, String> {
    let state = injector.toggle_rogue_mode();
    Ok(ToggleRogueModeResponse {
        status: state.to_string(),
    })
}
