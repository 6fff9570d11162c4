//! Solana address handling.
//!
//! An address is the Base58 encoding of a raw 32-byte Ed25519 public key.
//! There is no hashing step and no checksum beyond what Base58 decoding
//! itself catches.

use crate::error::TxError;

/// Decode a Base58 address into its 32-byte public-key form.
pub fn decode_pubkey(address: &str) -> Result<[u8; 32], TxError> {
    let bytes = bs58::decode(address.trim())
        .into_vec()
        .map_err(|e| TxError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    bytes.try_into().map_err(|v: Vec<u8>| {
        TxError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })
}

/// Encode a 32-byte public key as a Base58 address string.
pub fn encode_pubkey(pubkey: &[u8; 32]) -> String {
    bs58::encode(pubkey).into_string()
}

/// Check that a string is a well-formed Solana address.
pub fn validate_pubkey(address: &str) -> Result<(), TxError> {
    decode_pubkey(address).map(|_| ())
}
