use thiserror::Error;

/// Wire-format construction and signing errors.
#[derive(Debug, Error)]
pub enum TxError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("amount overflow: {0}")]
    AmountOverflow(String),

    #[error("transaction build error: {0}")]
    TransactionBuild(String),
}
