// crates/rbcm-cli/src/rpc_client.rs
//
// Lightweight JSON-RPC client that POSTs to the rbcm-daemon HTTP endpoint.

use rbcm_rpc::{call_url, JsonRpcRequest, JsonRpcResponse};

/// Send a JSON-RPC call to the daemon and return the parsed response.
///
/// `endpoint` is the daemon base URL; the service path is appended.
pub async fn rpc_call(
    endpoint: &str,
    method: &str,
    params: serde_json::Value,
) -> Result<JsonRpcResponse, Box<dyn std::error::Error>> {
    let request = JsonRpcRequest {
        method: method.to_string(),
        params,
    };

    let client = reqwest::Client::new();
    let resp = client.post(call_url(endpoint)).json(&request).send().await?;

    let rpc_response: JsonRpcResponse = resp.json().await?;
    Ok(rpc_response)
}

/// Call a method and deserialize its result, turning an error envelope
/// into an `Err`.
pub async fn call_method<T: serde::de::DeserializeOwned>(
    endpoint: &str,
    method: &str,
    params: serde_json::Value,
) -> Result<T, Box<dyn std::error::Error>> {
    let resp = rpc_call(endpoint, method, params).await?;
    if !resp.success {
        return Err(resp
            .error
            .unwrap_or_else(|| "Unknown error".to_string())
            .into());
    }
    let result = resp.result.ok_or("No result in response")?;
    Ok(serde_json::from_value(result)?)
}
