//! The JSON-RPC collaborator.
//!
//! [`RpcClient`] is the seam the whole pipeline talks through. Endpoint
//! selection, failover and rate limiting live behind it on the host side;
//! here we only issue calls and surface whatever comes back.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

/// Failures surfaced by an RPC call.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The request itself failed: DNS, TLS, connect, timeout.
    #[error("rpc transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc node error {code}: {message}")]
    Node { code: i64, message: String },

    /// The response did not look like JSON-RPC.
    #[error("malformed rpc response: {0}")]
    MalformedResponse(String),
}

/// The opaque JSON-RPC capability the send pipeline depends on.
#[async_trait]
pub trait RpcClient: Send + Sync {
    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, RpcError>;
}

/// Plain single-endpoint HTTP client.
pub struct HttpRpcClient {
    client: reqwest::Client,
    url: String,
}

impl HttpRpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl RpcClient for HttpRpcClient {
    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let payload: Value = resp
            .json()
            .await
            .map_err(|e| RpcError::MalformedResponse(e.to_string()))?;

        if let Some(err) = payload.get("error") {
            let code = err.get("code").and_then(Value::as_i64).unwrap_or(0);
            let message = match err.get("message").and_then(Value::as_str) {
                Some(m) if !m.is_empty() => m.to_string(),
                _ => err.to_string(),
            };
            return Err(RpcError::Node { code, message });
        }

        payload
            .get("result")
            .cloned()
            .ok_or_else(|| RpcError::MalformedResponse("missing 'result' field".into()))
    }
}

// ---------------------------------------------------------------------------
// Typed helpers over the raw capability
// ---------------------------------------------------------------------------

/// Fetch a fresh blockhash at `finalized` commitment.
pub async fn get_latest_blockhash(rpc: &dyn RpcClient) -> Result<[u8; 32], RpcError> {
    let result = rpc
        .rpc_call(
            "getLatestBlockhash",
            json!([{ "commitment": "finalized" }]),
        )
        .await?;

    let hash_str = result
        .pointer("/value/blockhash")
        .and_then(Value::as_str)
        .ok_or_else(|| RpcError::MalformedResponse("no blockhash in response".into()))?;

    let bytes = bs58::decode(hash_str)
        .into_vec()
        .map_err(|e| RpcError::MalformedResponse(format!("blockhash base58: {e}")))?;

    bytes
        .try_into()
        .map_err(|_| RpcError::MalformedResponse("blockhash is not 32 bytes".into()))
}

/// Lamport balance of an account.
pub async fn get_balance(rpc: &dyn RpcClient, address: &str) -> Result<u64, RpcError> {
    let result = rpc.rpc_call("getBalance", json!([address])).await?;
    result
        .pointer("/value")
        .and_then(Value::as_u64)
        .ok_or_else(|| RpcError::MalformedResponse("no balance value".into()))
}

/// Network fee quote for a serialized, base64-encoded message.
///
/// A null quote (node does not know the blockhash yet) is reported as
/// malformed; callers treat any failure here as "estimate unavailable".
pub async fn get_fee_for_message(rpc: &dyn RpcClient, message_b64: &str) -> Result<u64, RpcError> {
    let result = rpc
        .rpc_call(
            "getFeeForMessage",
            json!([message_b64, { "commitment": "confirmed" }]),
        )
        .await?;
    result
        .pointer("/value")
        .and_then(Value::as_u64)
        .ok_or_else(|| RpcError::MalformedResponse("no fee value".into()))
}

/// Rent-exempt minimum for an account of `data_len` bytes.
pub async fn get_rent_exempt_minimum(rpc: &dyn RpcClient, data_len: u64) -> Result<u64, RpcError> {
    let result = rpc
        .rpc_call("getMinimumBalanceForRentExemption", json!([data_len]))
        .await?;
    result
        .as_u64()
        .ok_or_else(|| RpcError::MalformedResponse("no rent value".into()))
}

/// Whether an account exists on chain.
pub async fn account_exists(rpc: &dyn RpcClient, address: &str) -> Result<bool, RpcError> {
    let result = rpc
        .rpc_call("getAccountInfo", json!([address, { "encoding": "base64" }]))
        .await?;
    Ok(result.get("value").is_some_and(|v| !v.is_null()))
}

/// One signature-status probe.
#[derive(Debug, Clone)]
pub struct SignatureStatus {
    /// `processed`, `confirmed` or `finalized`.
    pub confirmation_status: Option<String>,
    /// The on-chain `err` field, rendered, when the transaction failed.
    pub err: Option<String>,
}

/// Probe a signature. `Ok(None)` means the node does not know it yet.
pub async fn get_signature_status(
    rpc: &dyn RpcClient,
    signature: &str,
) -> Result<Option<SignatureStatus>, RpcError> {
    let result = rpc
        .rpc_call(
            "getSignatureStatuses",
            json!([[signature], { "searchTransactionHistory": true }]),
        )
        .await?;

    let entry = match result.pointer("/value/0") {
        Some(v) if !v.is_null() => v.clone(),
        _ => return Ok(None),
    };

    Ok(Some(SignatureStatus {
        confirmation_status: entry
            .get("confirmationStatus")
            .and_then(Value::as_str)
            .map(str::to_string),
        err: entry
            .get("err")
            .filter(|e| !e.is_null())
            .map(Value::to_string),
    }))
}
