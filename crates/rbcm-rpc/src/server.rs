// crates/rbcm-rpc/src/server.rs
//
// RPC server setup: RbcmRpcServer and RpcConfig.
//
// A single tonic service accepts JSON-encoded `{method, params}` requests
// over HTTP/1, dispatches to the appropriate handler, and returns a JSON
// `{success, result, error}` envelope. No proto codegen is involved.
//
// tonic routes by service name, so requests must be POSTed to
// `/rbcm.rpc.ReputationService/Call` (see `CALL_PATH`). Any other path is
// answered by tonic with gRPC status Unimplemented and an empty body.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use tonic::transport::Server;
use tonic::Status;

use rbcm_reputation::{AttackInjector, NetworkStateView, NodeRegistry, RogueMode};

use crate::handlers;
use crate::middleware;

/// tonic service name the JSON-RPC service is registered under.
pub const SERVICE_NAME: &str = "rbcm.rpc.ReputationService";

/// HTTP path clients POST JSON-RPC envelopes to.
pub const CALL_PATH: &str = "/rbcm.rpc.ReputationService/Call";

/// Full request URL for a daemon endpoint such as `http://localhost:5000`.
///
/// An endpoint that already ends in `CALL_PATH` is returned unchanged.
pub fn call_url(endpoint: &str) -> String {
    let base = endpoint.trim_end_matches('/');
    if base.ends_with(CALL_PATH) {
        base.to_string()
    } else {
        format!("{}{}", base, CALL_PATH)
    }
}

// ---------------------------------------------------------------------------
// RpcConfig
// ---------------------------------------------------------------------------

/// Configuration for the RPC server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Host to bind to (e.g., "127.0.0.1" or "0.0.0.0").
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

// ---------------------------------------------------------------------------
// JSON-RPC Envelope
// ---------------------------------------------------------------------------

/// A JSON-RPC-style request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// The RPC method to invoke (e.g., "reputation/update_score").
    pub method: String,
    /// JSON-encoded parameters for the method. May be omitted.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// A JSON-RPC-style response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// The result data (if success).
    pub result: Option<serde_json::Value>,
    /// Error message (if not success).
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// RbcmRpcServer
// ---------------------------------------------------------------------------

/// The RPC server for the reputation simulator.
///
/// Holds Arc references to the shared registry and rogue flag, and exposes
/// a tonic server with JSON-RPC dispatching.
#[derive(Clone)]
pub struct RbcmRpcServer {
    /// Server configuration.
    config: RpcConfig,
    service: RbcmServiceImpl,
}

impl std::fmt::Debug for RbcmRpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RbcmRpcServer")
            .field("config", &self.config)
            .finish()
    }
}

impl RbcmRpcServer {
    /// Create a new RbcmRpcServer.
    ///
    /// # Arguments
    /// * `config` - Server configuration (host, port).
    /// * `registry` - Shared node registry.
    /// * `rogue` - Shared rogue-mode flag read by the simulation driver.
    pub fn new(config: RpcConfig, registry: Arc<NodeRegistry>, rogue: Arc<RogueMode>) -> Self {
        let service = RbcmServiceImpl {
            injector: AttackInjector::new(registry.clone(), rogue.clone()),
            view: NetworkStateView::new(registry.clone()),
            registry,
            rogue,
            start_time: None,
        };
        Self { config, service }
    }

    /// Set the daemon start time for uptime calculation.
    pub fn with_start_time(mut self, st: Instant) -> Self {
        self.service.start_time = Some(st);
        self
    }

    /// Dispatch a single request without going through the transport.
    pub async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        self.service.dispatch(request).await
    }

    /// Start the RPC server and serve requests until the process exits.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.start_with_shutdown(std::future::pending()).await
    }

    /// Start the RPC server and serve requests until `signal` completes.
    ///
    /// Requests are accepted as HTTP/1 POSTs to `CALL_PATH`. Returns an
    /// error if the address cannot be parsed or bound.
    pub async fn start_with_shutdown<F>(
        &self,
        signal: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send,
    {
        let addr = format!("{}:{}", self.config.host, self.config.port).parse()?;

        tracing::info!("RBCM RPC server starting on {}", addr);

        Server::builder()
            .accept_http1(true)
            .add_service(tonic::service::interceptor::InterceptedService::new(
                RbcmJsonRpcServer::new(self.service.clone()),
                middleware::logging_interceptor,
            ))
            .serve_with_shutdown(addr, signal)
            .await?;

        tracing::info!("RBCM RPC server stopped");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Service Implementation
// ---------------------------------------------------------------------------

/// The internal service implementation that holds shared state
/// and dispatches JSON-RPC calls to the appropriate handler.
#[derive(Clone)]
struct RbcmServiceImpl {
    registry: Arc<NodeRegistry>,
    rogue: Arc<RogueMode>,
    injector: AttackInjector,
    view: NetworkStateView,
    start_time: Option<Instant>,
}

impl RbcmServiceImpl {
    /// Dispatch a JSON-RPC request to the appropriate handler based on the method name.
    async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let result = match request.method.as_str() {
            // Reputation
            "reputation/update_score" => {
                dispatch_handler(request.params, |r| async move {
                    handlers::reputation::handle_update_score(&self.registry, r).await
                })
                .await
            }
            "node/score" => {
                dispatch_handler(request.params, |r| async move {
                    handlers::reputation::handle_get_node_score(&self.registry, r).await
                })
                .await
            }

            // Network
            "network/state" => {
                dispatch_handler(request.params, |r| async move {
                    handlers::network::handle_get_network_state(&self.view, r).await
                })
                .await
            }

            // Attacks
            "attack/sybil" => {
                dispatch_handler(request.params, |r| async move {
                    handlers::attack::handle_trigger_sybil_attack(&self.injector, r).await
                })
                .await
            }
            "attack/rogue" => {
                dispatch_handler(request.params, |r| async move {
                    handlers::attack::handle_toggle_rogue_mode(&self.injector, r).await
                })
                .await
            }

            // Node
            "node/health" => {
                dispatch_handler(request.params, |r| async move {
                    handlers::node::handle_get_health(r, &self.registry, &self.rogue, self.start_time)
                        .await
                })
                .await
            }

            _ => Err(format!("Unknown method: {}", request.method)),
        };

        match result {
            Ok(value) => JsonRpcResponse {
                success: true,
                result: Some(value),
                error: None,
            },
            Err(err) => {
                tracing::debug!("RPC {} failed: {}", request.method, err);
                JsonRpcResponse {
                    success: false,
                    result: None,
                    error: Some(err),
                }
            }
        }
    }
}

/// Generic dispatch helper: deserialize params into a request type,
/// call the handler, and serialize the result to JSON.
///
/// Absent params are treated as an empty object.
async fn dispatch_handler<Req, Resp, F, Fut>(
    params: serde_json::Value,
    handler: F,
) -> Result<serde_json::Value, String>
where
    Req: serde::de::DeserializeOwned,
    Resp: serde::Serialize,
    F: FnOnce(Req) -> Fut,
    Fut: Future<Output = Result<Resp, String>>,
{
    let params = if params.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        params
    };
    let request: Req = serde_json::from_value(params)
        .map_err(|e| format!("Failed to deserialize request: {}", e))?;
    let response = handler(request).await?;
    serde_json::to_value(response).map_err(|e| format!("Failed to serialize response: {}", e))
}

// ---------------------------------------------------------------------------
// Tonic Service Wiring
// ---------------------------------------------------------------------------
// A single service whose request and response bodies are raw JSON bytes
// (JsonRpcRequest / JsonRpcResponse).

/// The tonic service wrapper. Accepts bytes, deserializes them as JSON-RPC,
/// and dispatches.
#[derive(Clone)]
pub struct RbcmJsonRpcServer {
    inner: RbcmServiceImpl,
}

impl std::fmt::Debug for RbcmJsonRpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RbcmJsonRpcServer").finish()
    }
}

impl RbcmJsonRpcServer {
    fn new(inner: RbcmServiceImpl) -> Self {
        Self { inner }
    }
}

impl tonic::server::NamedService for RbcmJsonRpcServer {
    const NAME: &'static str = SERVICE_NAME;
}

impl<B> tower_service::Service<http::Request<B>> for RbcmJsonRpcServer
where
    B: HttpBody + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
    B::Data: Send,
{
    type Response = http::Response<tonic::body::BoxBody>;
    type Error = std::convert::Infallible;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let inner = self.inner.clone();

        Box::pin(async move {
            let body_bytes = match collect_body(req.into_body()).await {
                Ok(b) => b,
                Err(e) => {
                    tracing::error!("Failed to read request body: {}", e);
                    return Ok(error_response(format!("Failed to read request body: {}", e)));
                }
            };

            let rpc_request: JsonRpcRequest = match serde_json::from_slice(&body_bytes) {
                Ok(r) => r,
                Err(e) => return Ok(error_response(format!("Invalid JSON-RPC request: {}", e))),
            };

            let rpc_response = inner.dispatch(rpc_request).await;
            let json = serde_json::to_vec(&rpc_response).unwrap_or_default();
            Ok(build_response(json))
        })
    }
}

/// Collect the body of an HTTP request into bytes.
async fn collect_body<B>(body: B) -> Result<Vec<u8>, String>
where
    B: HttpBody + Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    B::Data: Send,
{
    let mut collected = Vec::new();
    let mut body = std::pin::pin!(body);

    loop {
        match std::future::poll_fn(|cx| HttpBody::poll_frame(body.as_mut(), cx)).await {
            Some(Ok(frame)) => {
                if let Ok(data) = frame.into_data() {
                    use bytes::Buf;
                    collected.extend_from_slice(data.chunk());
                }
            }
            Some(Err(e)) => return Err(e.into().to_string()),
            None => break,
        }
    }

    Ok(collected)
}

fn error_response(message: String) -> http::Response<tonic::body::BoxBody> {
    let resp = JsonRpcResponse {
        success: false,
        result: None,
        error: Some(message),
    };
    build_response(serde_json::to_vec(&resp).unwrap_or_default())
}

/// Build an HTTP 200 response with the given JSON body.
fn build_response(json: Vec<u8>) -> http::Response<tonic::body::BoxBody> {
    let body = tonic::body::BoxBody::new(
        http_body_util::Full::new(bytes::Bytes::from(json))
            .map_err(|e| Status::internal(format!("body error: {}", e))),
    );

    let mut response = http::Response::new(body);
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    use rbcm_core::Partition;
    use rbcm_reputation::{ghost_ids, NodeStateRow, SYBIL_BATCH_SIZE};
    use serde_json::json;

    fn server() -> (RbcmRpcServer, Arc<NodeRegistry>, Arc<RogueMode>) {
        let registry = Arc::new(NodeRegistry::new());
        let rogue = Arc::new(RogueMode::new());
        let server = RbcmRpcServer::new(RpcConfig::default(), registry.clone(), rogue.clone())
            .with_start_time(Instant::now());
        (server, registry, rogue)
    }

    fn call(method: &str, params: serde_json::Value) -> JsonRpcRequest {
        JsonRpcRequest {
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn update_score_with_empty_params_targets_node_zero() {
        let (server, registry, _) = server();
        let resp = server
            .dispatch(call("reputation/update_score", serde_json::Value::Null))
            .await;
        assert!(resp.success, "{:?}", resp.error);
        let new_score = resp.result.unwrap()["new_score"].as_f64().unwrap();
        assert_eq!(registry.score_of("0").await.unwrap().score, new_score);
    }

    #[tokio::test]
    async fn update_score_rejects_bad_distance() {
        let (server, _, _) = server();
        let resp = server
            .dispatch(call(
                "reputation/update_score",
                json!({"node_id": "a", "success": true, "distance": -1}),
            ))
            .await;
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("distance"));
    }

    #[tokio::test]
    async fn network_state_is_a_sorted_array() {
        let (server, registry, _) = server();
        registry.seed_virtual(ghost_ids(4)).await;
        registry.upsert_physical("real", true, 1.0).await.unwrap();

        let resp = server.dispatch(call("network/state", json!({}))).await;
        let rows: Vec<NodeStateRow> = serde_json::from_value(resp.result.unwrap()).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].id, "real");
        assert_eq!(rows[0].node_type, Partition::Physical);
        assert!(rows.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn attack_methods_round_trip_through_dispatch() {
        let (server, _, rogue) = server();

        let resp = server.dispatch(call("attack/sybil", json!({}))).await;
        let result = resp.result.unwrap();
        assert_eq!(result["count"], SYBIL_BATCH_SIZE);
        assert!(result["status"].is_string());

        let resp = server.dispatch(call("attack/rogue", json!({}))).await;
        assert_eq!(resp.result.unwrap()["status"], "Active");
        assert!(rogue.is_active());
    }

    #[tokio::test]
    async fn health_reports_population() {
        let (server, registry, _) = server();
        registry.seed_virtual(ghost_ids(3)).await;
        let resp = server.dispatch(call("node/health", json!({}))).await;
        let result = resp.result.unwrap();
        assert_eq!(result["virtual_nodes"], 3);
        assert_eq!(result["physical_nodes"], 0);
        assert_eq!(result["rogue_mode"], "Inactive");
    }

    #[test]
    fn call_url_appends_service_path() {
        assert_eq!(
            call_url("http://localhost:5000"),
            "http://localhost:5000/rbcm.rpc.ReputationService/Call"
        );
        assert_eq!(
            call_url("http://localhost:5000/"),
            "http://localhost:5000/rbcm.rpc.ReputationService/Call"
        );
        assert_eq!(
            call_url("http://h:1/rbcm.rpc.ReputationService/Call"),
            "http://h:1/rbcm.rpc.ReputationService/Call"
        );
        assert!(CALL_PATH.starts_with(&format!("/{}/", SERVICE_NAME)));
    }

    #[tokio::test]
    async fn update_score_at_gradient_pole_is_rejected() {
        let (server, registry, _) = server();
        let resp = server
            .dispatch(call(
                "reputation/update_score",
                json!({"node_id": "a", "success": true, "distance": -0.9}),
            ))
            .await;
        assert!(!resp.success);
        assert!(resp.error.unwrap().starts_with("Domain error"));
        assert!(registry.score_of("a").await.is_none());
    }

    #[tokio::test]
    async fn unknown_method_is_an_error_envelope() {
        let (server, _, _) = server();
        let resp = server.dispatch(call("nope", json!({}))).await;
        assert!(!resp.success);
        assert_eq!(resp.error.unwrap(), "Unknown method: nope");
    }
}
