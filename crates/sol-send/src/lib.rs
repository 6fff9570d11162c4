//! The wallet's outbound send pipeline.
//!
//! Takes a user transfer request from decimal-string amount to broadcast
//! signature: instruction assembly with the platform fee appended, a
//! pre-submission balance check against live fee and rent quotes, Ed25519
//! signing, submission with a base64→base58 encoding fallback, and bounded
//! confirmation polling.
//!
//! The network is abstracted behind [`rpc::RpcClient`]; endpoint selection
//! and failover are the host's concern. Wire-format primitives come from the
//! `sol-tx` crate.

pub mod builder;
pub mod classify;
pub mod confirm;
pub mod error;
pub mod pipeline;
pub mod rpc;
pub mod submit;
pub mod wallet;

// Re-export key public types for ergonomic imports.
pub use builder::{
    build_transfer, Asset, BuiltTransfer, Quotes, TokenDescriptor, TransferRequest,
    PLATFORM_FEE_LAMPORTS,
};
pub use classify::{classify, user_message, ErrorCategory};
pub use confirm::{await_confirmation, ConfirmError, CONFIRMATION_TIMEOUT, POLL_INTERVAL};
pub use error::SendError;
pub use pipeline::{SendPipeline, SendReceipt};
pub use rpc::{HttpRpcClient, RpcClient, RpcError};
pub use submit::submit_transaction;
pub use wallet::Wallet;
