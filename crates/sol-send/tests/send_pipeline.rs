//! Full pipeline runs against a scripted RPC endpoint.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use sol_send::{
    Asset, RpcClient, RpcError, SendError, SendPipeline, TransferRequest, Wallet,
    PLATFORM_FEE_LAMPORTS,
};

const RECIPIENT: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
const BLOCKHASH: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";
const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Scripted endpoint: canned answers per method, every call recorded.
struct MockRpc {
    calls: Mutex<Vec<(String, Value)>>,
    balance: u64,
    ata_exists: bool,
    /// Node errors returned for the first N sendTransaction calls.
    send_failures: Mutex<Vec<RpcError>>,
    /// When false, getSignatureStatuses always answers "unknown".
    confirms: bool,
}

impl MockRpc {
    fn new(balance: u64) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            balance,
            ata_exists: true,
            send_failures: Mutex::new(Vec::new()),
            confirms: true,
        }
    }

    fn methods(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(m, _)| m.clone())
            .collect()
    }

    fn send_params(&self) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == "sendTransaction")
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl RpcClient for MockRpc {
    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));

        match method {
            "getLatestBlockhash" => Ok(json!({ "value": { "blockhash": BLOCKHASH } })),
            "getBalance" => Ok(json!({ "value": self.balance })),
            "getAccountInfo" => {
                if self.ata_exists {
                    Ok(json!({ "value": { "lamports": 2_039_280 } }))
                } else {
                    Ok(json!({ "value": null }))
                }
            }
            "getFeeForMessage" => Ok(json!({ "value": 5_000 })),
            "getMinimumBalanceForRentExemption" => Ok(json!(2_039_280)),
            "sendTransaction" => {
                let mut failures = self.send_failures.lock().unwrap();
                if failures.is_empty() {
                    Ok(json!("4uQeVj5tqViQh7yWWGStvkEG1Zmhx6uasJtWCJziofM"))
                } else {
                    Err(failures.remove(0))
                }
            }
            "getSignatureStatuses" => {
                if self.confirms {
                    Ok(json!({ "value": [{ "confirmationStatus": "confirmed", "err": null }] }))
                } else {
                    Ok(json!({ "value": [null] }))
                }
            }
            other => panic!("unexpected rpc method {other}"),
        }
    }
}

fn test_wallet() -> Wallet {
    let mut seed = [3u8; 32];
    seed[31] = 9;
    Wallet::from_seed(&seed)
}

fn sol_request(amount: &str) -> TransferRequest {
    TransferRequest {
        recipient: RECIPIENT.into(),
        amount: amount.into(),
        asset: Asset::Sol,
    }
}

fn token_request(amount: &str) -> TransferRequest {
    TransferRequest {
        recipient: RECIPIENT.into(),
        amount: amount.into(),
        asset: Asset::Token {
            mint: USDC_MINT.into(),
            decimals: 6,
        },
    }
}

#[tokio::test]
async fn sol_send_happy_path() {
    let rpc = Arc::new(MockRpc::new(2 * LAMPORTS_PER_SOL));
    let pipeline = SendPipeline::new(rpc.clone());

    let receipt = pipeline
        .send(&test_wallet(), &sol_request("1.5"))
        .await
        .unwrap();

    assert!(receipt.confirmed);
    assert!(!receipt.signature.is_empty());
    assert_eq!(
        rpc.methods(),
        vec![
            "getLatestBlockhash",
            "getBalance",
            "getFeeForMessage",
            "sendTransaction",
            "getSignatureStatuses",
        ]
    );
}

#[tokio::test]
async fn insufficient_balance_never_reaches_the_network_with_a_transaction() {
    // 1 SOL cannot cover a 1.5 SOL transfer plus the platform fee.
    let rpc = Arc::new(MockRpc::new(LAMPORTS_PER_SOL));
    let pipeline = SendPipeline::new(rpc.clone());

    let err = pipeline
        .send(&test_wallet(), &sol_request("1.5"))
        .await
        .unwrap_err();

    assert!(matches!(err, SendError::Validation(_)));
    assert!(err.to_string().contains("insufficient balance"));
    // Rejected at the provisional build, before any fee quote or broadcast.
    assert_eq!(rpc.methods(), vec!["getLatestBlockhash", "getBalance"]);
}

#[tokio::test]
async fn platform_fee_tips_a_borderline_balance_over() {
    // Exactly the transfer amount on hand, nothing for fees.
    let rpc = Arc::new(MockRpc::new(LAMPORTS_PER_SOL));
    let pipeline = SendPipeline::new(rpc.clone());

    let err = pipeline
        .send(&test_wallet(), &sol_request("1"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("insufficient balance"));

    // With the platform fee and network fee covered the same send passes.
    let rpc = Arc::new(MockRpc::new(
        LAMPORTS_PER_SOL + PLATFORM_FEE_LAMPORTS + 5_000,
    ));
    let pipeline = SendPipeline::new(rpc.clone());
    pipeline
        .send(&test_wallet(), &sol_request("1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn encoding_rejection_retries_the_same_bytes_as_base58() {
    let rpc = Arc::new(MockRpc::new(2 * LAMPORTS_PER_SOL));
    rpc.send_failures.lock().unwrap().push(RpcError::Node {
        code: -32602,
        message: "failed to deserialize: invalid base58 encoding".into(),
    });
    let pipeline = SendPipeline::new(rpc.clone());

    let receipt = pipeline
        .send(&test_wallet(), &sol_request("0.25"))
        .await
        .unwrap();
    assert!(receipt.confirmed);

    let sends = rpc.send_params();
    assert_eq!(sends.len(), 2);
    assert_eq!(sends[0][1]["encoding"], "base64");
    assert!(sends[1][1].get("encoding").is_none());

    // Both submissions carry the identical signed payload.
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    let first = BASE64.decode(sends[0][0].as_str().unwrap()).unwrap();
    let second = bs58::decode(sends[1][0].as_str().unwrap())
        .into_vec()
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn simulation_failure_propagates_without_retry() {
    let rpc = Arc::new(MockRpc::new(2 * LAMPORTS_PER_SOL));
    rpc.send_failures.lock().unwrap().push(RpcError::Node {
        code: -32002,
        message: "Transaction simulation failed: custom program error: 0x1".into(),
    });
    let pipeline = SendPipeline::new(rpc.clone());

    let err = pipeline
        .send(&test_wallet(), &sol_request("0.25"))
        .await
        .unwrap_err();
    assert!(matches!(err, SendError::Rpc(RpcError::Node { .. })));
    assert_eq!(rpc.send_params().len(), 1);
    assert_eq!(err.category(), sol_send::ErrorCategory::SimulationFailed);
}

#[tokio::test(start_paused = true)]
async fn confirmation_timeout_still_returns_the_signature() {
    let mut rpc = MockRpc::new(2 * LAMPORTS_PER_SOL);
    rpc.confirms = false;
    let rpc = Arc::new(rpc);
    let pipeline = SendPipeline::new(rpc.clone());

    let receipt = pipeline
        .send(&test_wallet(), &sol_request("0.25"))
        .await
        .unwrap();

    // The broadcast succeeded; only confirmation is unresolved.
    assert!(!receipt.confirmed);
    assert!(!receipt.signature.is_empty());
}

#[tokio::test]
async fn token_send_to_existing_account() {
    let rpc = Arc::new(MockRpc::new(LAMPORTS_PER_SOL));
    let pipeline = SendPipeline::new(rpc.clone());

    let receipt = pipeline
        .send(&test_wallet(), &token_request("25.5"))
        .await
        .unwrap();
    assert!(receipt.confirmed);

    let methods = rpc.methods();
    assert!(methods.contains(&"getAccountInfo".to_string()));
    // Existing account, so no rent quote is needed.
    assert!(!methods.contains(&"getMinimumBalanceForRentExemption".to_string()));
}

#[tokio::test]
async fn token_send_to_missing_account_quotes_rent() {
    let mut rpc = MockRpc::new(LAMPORTS_PER_SOL);
    rpc.ata_exists = false;
    let rpc = Arc::new(rpc);
    let pipeline = SendPipeline::new(rpc.clone());

    pipeline
        .send(&test_wallet(), &token_request("25.5"))
        .await
        .unwrap();

    let methods = rpc.methods();
    assert!(methods.contains(&"getMinimumBalanceForRentExemption".to_string()));
}

#[tokio::test]
async fn bad_recipient_fails_before_any_network_call_matters() {
    let rpc = Arc::new(MockRpc::new(LAMPORTS_PER_SOL));
    let pipeline = SendPipeline::new(rpc.clone());

    let request = TransferRequest {
        recipient: "definitely not an address".into(),
        amount: "1".into(),
        asset: Asset::Sol,
    };
    let err = pipeline.send(&test_wallet(), &request).await.unwrap_err();
    assert!(err.to_string().contains("recipient"));
    assert!(rpc.send_params().is_empty());
}
