// crates/rbcm-rpc/src/handlers/mod.rs
//
// Handler modules for all RPC endpoints.
// Each module defines request/response types and handler functions
// for a specific API group.

pub mod attack;
pub mod network;
pub mod node;
pub mod reputation;
