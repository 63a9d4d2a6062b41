// crates/rbcm-cli/src/commands/state.rs
//
// `rbcm state` — display the network state sorted by score.

use clap::Args;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use rbcm_core::Partition;

use crate::output::{format_json, format_table};
use crate::rpc_client::call_method;

#[derive(Debug, Args)]
pub struct StateCmd {
    /// Print raw JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Show at most this many rows.
    #[arg(long)]
    pub limit: Option<usize>,
}

/// A row in the network state table.
#[derive(Debug, Serialize, Deserialize, Tabled)]
struct StateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Score")]
    score: f64,
    #[serde(rename = "type")]
    #[tabled(rename = "Type")]
    node_type: Partition,
}

/// Run the state command.
pub async fn run(rpc: &str, cmd: &StateCmd) -> Result<(), Box<dyn std::error::Error>> {
    let mut rows: Vec<StateRow> = call_method(rpc, "network/state", serde_json::json!({})).await?;
    let total = rows.len();
    if let Some(limit) = cmd.limit {
        rows.truncate(limit);
    }

    if cmd.json {
        println!("{}", format_json(&rows));
        return Ok(());
    }

    let physical = rows
        .iter()
        .filter(|r| r.node_type == Partition::Physical)
        .count();
    println!(
        "Network state: {} nodes ({} physical shown)",
        total, physical
    );
    println!();
    println!("{}", format_table(&rows));
    Ok(())
}
