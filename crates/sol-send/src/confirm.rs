//! Bounded confirmation polling.
//!
//! After broadcast the signature is probed on a fixed interval until it
//! reaches `confirmed` or `finalized` commitment, the chain reports the
//! transaction failed, or the window closes. Transient probe errors are
//! logged and retried on the next tick rather than aborting the wait.

use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::rpc::{get_signature_status, RpcClient};

pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_millis(40_000);
pub const POLL_INTERVAL: Duration = Duration::from_millis(1_000);

#[derive(Debug, Error)]
pub enum ConfirmError {
    /// The window closed without a definitive status. The transaction may
    /// still land.
    #[error("confirmation timed out after {}s", CONFIRMATION_TIMEOUT.as_secs())]
    Timeout,

    /// The chain recorded the transaction as failed.
    #[error("transaction failed on chain: {0}")]
    TransactionFailed(String),
}

/// Poll until the signature confirms, fails, or the window closes.
pub async fn await_confirmation(
    rpc: &dyn RpcClient,
    signature: &str,
) -> Result<(), ConfirmError> {
    let deadline = Instant::now() + CONFIRMATION_TIMEOUT;

    loop {
        match get_signature_status(rpc, signature).await {
            Ok(Some(status)) => {
                if let Some(err) = status.err {
                    return Err(ConfirmError::TransactionFailed(err));
                }
                if matches!(
                    status.confirmation_status.as_deref(),
                    Some("confirmed") | Some("finalized")
                ) {
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(e) => {
                log::debug!("status probe for {signature} failed: {e}");
            }
        }

        if Instant::now() + POLL_INTERVAL > deadline {
            return Err(ConfirmError::Timeout);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
