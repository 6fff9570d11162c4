//! Solana wire-format primitives for the wallet send pipeline.
//!
//! This crate builds Solana transactions entirely by hand, with no
//! `solana-sdk` dependency. It covers exactly what an outbound transfer
//! needs: address handling, decimal-string
//! amount normalization, the three instruction layouts the wallet emits
//! (System transfer, SPL `TransferChecked`, ATA `CreateIdempotent`),
//! associated-token-account derivation, legacy transaction compilation and
//! Ed25519 signing.
//!
//! Everything here is pure and synchronous. Network concerns live in the
//! `sol-send` crate on top of this one.

pub mod address;
pub mod amount;
pub mod error;
pub mod instruction;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::{decode_pubkey, encode_pubkey, validate_pubkey};
pub use amount::{encode_u64_le, format_base_units, to_base_units};
pub use error::TxError;
pub use instruction::{
    create_ata_idempotent, derive_associated_token_address, system_transfer, transfer_checked,
    ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
pub use transaction::{
    compile_transaction, encode_compact_u16, serialize_message, sign_transaction, AccountMeta,
    CompiledInstruction, Instruction, Transaction,
};
