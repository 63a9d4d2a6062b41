// crates/rbcm-rpc/src/lib.rs
//
// rbcm-rpc: JSON-RPC server and handlers for the RBCM reputation simulator.
//
// A tonic server accepting HTTP/1 POSTs of `{method, params}` envelopes to
// `/rbcm.rpc.ReputationService/Call`,
// dispatching to handlers for feedback recording, network state, attack
// injection, and node health.

pub mod handlers;
pub mod middleware;
pub mod server;

// Re-export the main server type for ergonomic access.
pub use server::{
    call_url, JsonRpcRequest, JsonRpcResponse, RbcmRpcServer, RpcConfig, CALL_PATH, SERVICE_NAME,
};
