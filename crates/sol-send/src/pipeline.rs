//! End-to-end send orchestration.
//!
//! One [`SendPipeline::send`] call runs the whole sequence: fetch blockhash
//! and balance, probe the recipient token account, assemble provisionally,
//! quote fee and rent, reassemble with the quotes folded into the balance
//! check, sign, broadcast, and wait for confirmation. A mutex serializes
//! sends so at most one transfer is in flight per wallet.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use tokio::sync::Mutex;
use zeroize::Zeroize;

use sol_tx::address::encode_pubkey;
use sol_tx::instruction::derive_associated_token_address;
use sol_tx::transaction::{serialize_message, sign_transaction};

use crate::builder::{build_transfer, Asset, Quotes, TransferRequest, TOKEN_ACCOUNT_SPAN};
use crate::confirm::await_confirmation;
use crate::error::SendError;
use crate::rpc::{
    account_exists, get_balance, get_fee_for_message, get_latest_blockhash,
    get_rent_exempt_minimum, RpcClient,
};
use crate::submit::submit_transaction;
use crate::wallet::Wallet;

/// Outcome of a broadcast. `confirmed` is false when the confirmation window
/// closed without a definitive status; the transfer may still land.
#[derive(Debug, Clone, Serialize)]
pub struct SendReceipt {
    pub signature: String,
    pub confirmed: bool,
}

pub struct SendPipeline {
    rpc: Arc<dyn RpcClient>,
    in_flight: Mutex<()>,
}

impl SendPipeline {
    pub fn new(rpc: Arc<dyn RpcClient>) -> Self {
        Self {
            rpc,
            in_flight: Mutex::new(()),
        }
    }

    /// Run a transfer from request to receipt.
    pub async fn send(
        &self,
        wallet: &Wallet,
        request: &TransferRequest,
    ) -> Result<SendReceipt, SendError> {
        let _guard = self.in_flight.lock().await;
        let rpc = self.rpc.as_ref();

        let blockhash = get_latest_blockhash(rpc).await?;
        let balance = get_balance(rpc, &wallet.address).await?;

        let needs_ata = match &request.asset {
            Asset::Sol => false,
            Asset::Token { mint, .. } => {
                !self.recipient_ata_exists(&request.recipient, mint).await
            }
        };

        // Provisional assembly with no quotes. This runs the coarse balance
        // check and yields the message the fee quote is priced against.
        let mut quotes = Quotes {
            balance_lamports: balance,
            fee_lamports: None,
            rent_lamports: None,
            recipient_ata_exists: !needs_ata,
            blockhash,
        };
        let provisional = build_transfer(wallet, request, &quotes)?;

        let message_b64 = BASE64.encode(serialize_message(&provisional.transaction));
        quotes.fee_lamports = match get_fee_for_message(rpc, &message_b64).await {
            Ok(fee) => Some(fee),
            Err(e) => {
                log::warn!("fee quote unavailable, degrading balance check: {e}");
                None
            }
        };
        if needs_ata {
            quotes.rent_lamports = match get_rent_exempt_minimum(rpc, TOKEN_ACCOUNT_SPAN).await {
                Ok(rent) => Some(rent),
                Err(e) => {
                    log::warn!("rent quote unavailable, degrading balance check: {e}");
                    None
                }
            };
        }

        let built = build_transfer(wallet, request, &quotes)?;
        if built.degraded_estimate {
            log::warn!("balance checked without full fee data");
        }

        let mut seed = wallet.seed();
        let signed = sign_transaction(&built.transaction, &seed);
        seed.zeroize();

        let signature = submit_transaction(rpc, &signed).await?;
        log::info!("broadcast {signature}");

        let confirmed = match await_confirmation(rpc, &signature).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("confirmation incomplete for {signature}: {e}");
                false
            }
        };

        Ok(SendReceipt {
            signature,
            confirmed,
        })
    }

    /// Probe whether the recipient's associated token account exists. An
    /// unreadable probe is treated as missing so the idempotent creation
    /// instruction rides along.
    async fn recipient_ata_exists(&self, recipient: &str, mint: &str) -> bool {
        let ata_address = match derive_recipient_ata(recipient, mint) {
            Ok(addr) => addr,
            // Bad addresses fail properly in build_transfer.
            Err(_) => return true,
        };

        match account_exists(self.rpc.as_ref(), &ata_address).await {
            Ok(exists) => exists,
            Err(e) => {
                log::warn!("token account probe failed, assuming missing: {e}");
                false
            }
        }
    }
}

fn derive_recipient_ata(recipient: &str, mint: &str) -> Result<String, SendError> {
    let recipient = sol_tx::address::decode_pubkey(recipient)?;
    let mint_key = sol_tx::address::decode_pubkey(mint)?;
    let ata = derive_associated_token_address(&recipient, &mint_key)?;
    Ok(encode_pubkey(&ata))
}
