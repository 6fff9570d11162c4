//! Instruction encoders for the three operations this wallet emits, plus
//! associated-token-account derivation.
//!
//! The byte layouts are part of the on-chain wire contract and must not
//! change:
//!
//! ```text
//! System Transfer:       u32 LE 2 | u64 LE lamports                (12 bytes)
//! SPL TransferChecked:   u8 12    | u64 LE amount | u8 decimals    (10 bytes)
//! ATA CreateIdempotent:  u8 1                                      (1 byte)
//! ```
//!
//! Account list order is equally part of the contract; the lists below must
//! stay in exactly the documented order.

use sha2::{Digest, Sha256};

use crate::amount::encode_u64_le;
use crate::error::TxError;
use crate::transaction::{AccountMeta, Instruction};

// ---------------------------------------------------------------------------
// Well-known program IDs
// ---------------------------------------------------------------------------

/// The Solana System Program: 32 zero bytes.
/// Base58: `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0u8; 32];

/// SPL Token Program ID: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: [u8; 32] = [
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79,
    0xac, 0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff,
    0x00, 0xa9,
];

/// Associated Token Account Program ID: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: [u8; 32] = [
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d,
    0x83, 0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9,
    0xf8, 0x59,
];

/// System Program `Transfer` instruction index (u32 LE on the wire).
const SYSTEM_TRANSFER_INDEX: u32 = 2;

/// SPL Token `TransferChecked` opcode.
const TRANSFER_CHECKED_OPCODE: u8 = 12;

/// Associated Token Program `CreateIdempotent` opcode.
const CREATE_IDEMPOTENT_OPCODE: u8 = 1;

/// The marker appended during PDA derivation.
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

// ---------------------------------------------------------------------------
// Instruction builders
// ---------------------------------------------------------------------------

/// Build a System Program `Transfer` instruction moving `lamports` from
/// `from` to `to`.
pub fn system_transfer(from: &[u8; 32], to: &[u8; 32], lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            AccountMeta {
                pubkey: *from,
                is_signer: true,
                is_writable: true,
            },
            AccountMeta {
                pubkey: *to,
                is_signer: false,
                is_writable: true,
            },
        ],
        data,
    }
}

/// Build an SPL Token `TransferChecked` instruction.
///
/// Moves `amount` base units of `mint` from `source` to `destination`,
/// authorized by `owner`. The on-chain program re-validates `decimals`
/// against the mint, which is why this variant is preferred over the plain
/// `Transfer`.
pub fn transfer_checked(
    source: &[u8; 32],
    mint: &[u8; 32],
    destination: &[u8; 32],
    owner: &[u8; 32],
    amount: u64,
    decimals: u8,
) -> Result<Instruction, TxError> {
    if amount == 0 {
        return Err(TxError::InvalidAmount(
            "token transfer amount must be > 0".into(),
        ));
    }

    let mut data = Vec::with_capacity(10);
    data.push(TRANSFER_CHECKED_OPCODE);
    data.extend_from_slice(&encode_u64_le(amount as u128)?);
    data.push(decimals);

    Ok(Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta {
                pubkey: *source,
                is_signer: false,
                is_writable: true,
            },
            AccountMeta {
                pubkey: *mint,
                is_signer: false,
                is_writable: false,
            },
            AccountMeta {
                pubkey: *destination,
                is_signer: false,
                is_writable: true,
            },
            AccountMeta {
                pubkey: *owner,
                is_signer: true,
                is_writable: false,
            },
        ],
        data,
    })
}

/// Build an Associated Token Program `CreateIdempotent` instruction.
///
/// Creates `ata` for (`owner`, `mint`) with `payer` funding the rent, and
/// succeeds harmlessly if the account already exists.
pub fn create_ata_idempotent(
    payer: &[u8; 32],
    ata: &[u8; 32],
    owner: &[u8; 32],
    mint: &[u8; 32],
) -> Instruction {
    Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta {
                pubkey: *payer,
                is_signer: true,
                is_writable: true,
            },
            AccountMeta {
                pubkey: *ata,
                is_signer: false,
                is_writable: true,
            },
            AccountMeta {
                pubkey: *owner,
                is_signer: false,
                is_writable: false,
            },
            AccountMeta {
                pubkey: *mint,
                is_signer: false,
                is_writable: false,
            },
            AccountMeta {
                pubkey: SYSTEM_PROGRAM_ID,
                is_signer: false,
                is_writable: false,
            },
            AccountMeta {
                pubkey: TOKEN_PROGRAM_ID,
                is_signer: false,
                is_writable: false,
            },
        ],
        data: vec![CREATE_IDEMPOTENT_OPCODE],
    }
}

// ---------------------------------------------------------------------------
// Associated Token Account (PDA) derivation
// ---------------------------------------------------------------------------

/// Derive the associated token account address for a wallet + mint pair.
///
/// The ATA is the PDA of the Associated Token Program with seeds
/// `[owner, token_program_id, mint]`. The derivation searches bump seeds
/// from 255 down to 0 for the first hash that is NOT on the Ed25519 curve.
/// A pair with no valid bump has never been observed in practice, but the
/// search space is finite so the result is fallible.
pub fn derive_associated_token_address(
    owner: &[u8; 32],
    mint: &[u8; 32],
) -> Result<[u8; 32], TxError> {
    find_program_address(
        &[owner.as_ref(), &TOKEN_PROGRAM_ID, mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _bump)| address)
}

/// Find a valid Program Derived Address for the given seeds and program.
fn find_program_address(
    seeds: &[&[u8]],
    program_id: &[u8; 32],
) -> Result<([u8; 32], u8), TxError> {
    for bump in (0u8..=255).rev() {
        if let Some(address) = try_create_program_address(seeds, bump, program_id) {
            return Ok((address, bump));
        }
    }

    Err(TxError::InvalidAddress(
        "no valid bump seed in the PDA search space".into(),
    ))
}

/// `SHA-256(seed_0 || ... || seed_n || bump || program_id || marker)`,
/// accepted only when the result is off the Ed25519 curve.
fn try_create_program_address(
    seeds: &[&[u8]],
    bump: u8,
    program_id: &[u8; 32],
) -> Option<[u8; 32]> {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id);
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();
    if is_on_curve(&hash) {
        return None;
    }
    Some(hash)
}

/// Whether 32 bytes decompress to a valid Ed25519 point.
fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}
