use thiserror::Error;

use crate::classify::{classify, user_message, ErrorCategory};
use crate::rpc::RpcError;

/// A send attempt fails in exactly one of these ways; confirmation problems
/// after a successful broadcast are deliberately not represented here.
#[derive(Debug, Error)]
pub enum SendError {
    /// Rejected locally before anything reached the network.
    #[error("{0}")]
    Validation(String),

    /// Wire-format construction failed.
    #[error(transparent)]
    Build(#[from] sol_tx::TxError),

    /// The RPC collaborator reported a failure.
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl SendError {
    /// Map this failure onto its user-facing category.
    ///
    /// Only RPC failures run the full substring table. Local validation and
    /// build errors can mention "base58" or "encoding" in their text (a
    /// typo'd address, say) without having anything to do with an endpoint
    /// rejecting the transaction encoding, so for those variants the only
    /// category the text may select is `InsufficientFunds`.
    pub fn category(&self) -> ErrorCategory {
        let category = classify(&self.to_string());
        match self {
            SendError::Rpc(_) => category,
            SendError::Validation(_) | SendError::Build(_) => match category {
                ErrorCategory::InsufficientFunds => ErrorCategory::InsufficientFunds,
                _ => ErrorCategory::Generic,
            },
        }
    }

    /// Fixed user-facing copy for this failure. The raw error text is for
    /// logs only.
    pub fn user_message(&self) -> &'static str {
        user_message(self.category())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_balance_maps_to_insufficient_funds() {
        let err = SendError::Validation("insufficient balance: have 1 SOL, need 2 SOL".into());
        assert_eq!(err.category(), ErrorCategory::InsufficientFunds);
    }

    #[test]
    fn transport_failure_maps_to_network() {
        let err = SendError::Rpc(RpcError::Transport("Failed to fetch".into()));
        assert_eq!(err.category(), ErrorCategory::Network);
    }

    #[test]
    fn typoed_recipient_is_not_an_encoding_error() {
        // The local decode error mentions base58; that must not surface as
        // an RPC encoding rejection.
        let err = SendError::Validation(
            "recipient: invalid address: base58 decode failed: \
             provided string contained invalid character '0' at byte 4"
                .into(),
        );
        assert_eq!(err.category(), ErrorCategory::Generic);
        assert_eq!(err.user_message(), "Transaction failed.");
    }

    #[test]
    fn build_errors_never_reach_rpc_categories() {
        let err = SendError::Build(sol_tx::TxError::InvalidAddress(
            "base58 decode failed: bad length".into(),
        ));
        assert_eq!(err.category(), ErrorCategory::Generic);
    }

    #[test]
    fn node_encoding_rejection_still_classifies_as_encoding() {
        let err = SendError::Rpc(RpcError::Node {
            code: -32602,
            message: "invalid base58 encoding: WrongSize".into(),
        });
        assert_eq!(err.category(), ErrorCategory::Encoding);
    }
}
