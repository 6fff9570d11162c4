//! Broadcast with encoding fallback.
//!
//! Signed bytes go out base64-encoded with preflight enabled. Some endpoints
//! only accept the legacy base58 wire parameter and reject base64 with an
//! encoding complaint; on that specific rejection the same signed bytes are
//! re-encoded as base58 and sent once more, with no `encoding` field so the
//! node applies its default. The transaction is never re-signed.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};

use crate::rpc::{RpcClient, RpcError};

enum SubmitFailure {
    /// The node rejected the encoding itself, not the transaction.
    EncodingMismatch,
    Other,
}

fn inspect(err: &RpcError) -> SubmitFailure {
    if let RpcError::Node { message, .. } = err {
        let text = message.to_lowercase();
        if text.contains("base58") || text.contains("base64") || text.contains("wrongsize") {
            return SubmitFailure::EncodingMismatch;
        }
    }
    SubmitFailure::Other
}

/// Broadcast signed transaction bytes, returning the Base58 signature string
/// the node echoes back.
pub async fn submit_transaction(
    rpc: &dyn RpcClient,
    signed_bytes: &[u8],
) -> Result<String, RpcError> {
    let b64 = BASE64.encode(signed_bytes);
    let first = rpc
        .rpc_call(
            "sendTransaction",
            json!([b64, {
                "encoding": "base64",
                "skipPreflight": false,
                "preflightCommitment": "confirmed",
            }]),
        )
        .await;

    let err = match first {
        Ok(result) => return extract_signature(result),
        Err(e) => e,
    };

    match inspect(&err) {
        SubmitFailure::Other => Err(err),
        SubmitFailure::EncodingMismatch => {
            log::info!("endpoint rejected base64 submission, retrying as base58");
            let b58 = bs58::encode(signed_bytes).into_string();
            let result = rpc
                .rpc_call(
                    "sendTransaction",
                    json!([b58, {
                        "skipPreflight": false,
                        "preflightCommitment": "confirmed",
                    }]),
                )
                .await?;
            extract_signature(result)
        }
    }
}

fn extract_signature(result: Value) -> Result<String, RpcError> {
    result
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| RpcError::MalformedResponse("signature is not a string".into()))
}
