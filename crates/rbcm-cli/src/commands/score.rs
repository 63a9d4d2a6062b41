// crates/rbcm-cli/src/commands/score.rs
//
// `rbcm score` — look up a single node.

use clap::Args;
use serde_json::json;

use rbcm_rpc::handlers::reputation::GetNodeScoreResponse;

use crate::rpc_client::call_method;

#[derive(Debug, Args)]
pub struct ScoreCmd {
    /// Node identifier.
    pub node_id: String,
}

/// Run the score command.
pub async fn run(rpc: &str, cmd: &ScoreCmd) -> Result<(), Box<dyn std::error::Error>> {
    let resp: GetNodeScoreResponse =
        call_method(rpc, "node/score", json!({ "node_id": cmd.node_id })).await?;
    println!("{} ({}): {:.2}", resp.id, resp.node_type, resp.score);
    Ok(())
}
