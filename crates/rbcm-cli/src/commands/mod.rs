// crates/rbcm-cli/src/commands/mod.rs
//
// Command module declarations for the RBCM CLI.

pub mod attack;
pub mod feedback;
pub mod score;
pub mod state;
pub mod status;
