// crates/rbcm-cli/src/commands/feedback.rs
//
// `rbcm feedback` — record one success/failure signal for a physical node.

use clap::Args;
use serde_json::json;

use rbcm_rpc::handlers::reputation::UpdateScoreResponse;

use crate::rpc_client::call_method;

#[derive(Debug, Args)]
pub struct FeedbackCmd {
    /// Node identifier.
    #[arg(long, default_value = "0")]
    pub node_id: String,

    /// Mark the interaction as successful (omit for a failure).
    #[arg(long)]
    pub success: bool,

    /// Distance the feedback travelled; 1 for direct observation.
    #[arg(long, default_value_t = 1.0)]
    pub distance: f64,
}

/// Run the feedback command.
pub async fn run(rpc: &str, cmd: &FeedbackCmd) -> Result<(), Box<dyn std::error::Error>> {
    let resp: UpdateScoreResponse = call_method(
        rpc,
        "reputation/update_score",
        json!({
            "node_id": cmd.node_id,
            "success": cmd.success,
            "distance": cmd.distance,
        }),
    )
    .await?;

    println!(
        "Node {} {} -> new score {:.2}",
        cmd.node_id,
        if cmd.success { "SUCCESS" } else { "FAIL" },
        resp.new_score
    );
    Ok(())
}
