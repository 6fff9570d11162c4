//! Transfer assembly.
//!
//! [`build_transfer`] turns a validated request plus live quotes into an
//! unsigned transaction and a total lamport requirement. It is pure: every
//! network-derived input arrives through [`Quotes`], so the balance rules are
//! testable without an endpoint.
//!
//! Instruction order is part of the contract. SOL sends carry the transfer
//! then the platform fee; token sends carry an optional ATA creation, the
//! token transfer, then the platform fee. The fee instruction is always last.

use serde::{Deserialize, Serialize};

use sol_tx::{
    address::decode_pubkey,
    amount::{format_base_units, to_base_units},
    instruction::{
        create_ata_idempotent, derive_associated_token_address, system_transfer, transfer_checked,
    },
    transaction::{compile_transaction, Transaction},
};

use crate::error::SendError;
use crate::wallet::Wallet;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
pub const SOL_DECIMALS: u8 = 9;

/// Flat service fee collected on every send, in lamports (0.0007 SOL).
/// Always charged in SOL regardless of the asset being transferred.
pub const PLATFORM_FEE_LAMPORTS: u64 = 700_000;

/// Destination for the platform fee.
pub const PLATFORM_FEE_ACCOUNT: [u8; 32] = [
    0x5e, 0xc2, 0x91, 0x07, 0x3a, 0xd1, 0x44, 0xab, 0x0f, 0x66, 0x58, 0x3d, 0x29, 0x7c, 0xe1,
    0x90, 0x8b, 0x12, 0xf0, 0x4d, 0xc5, 0x3e, 0xa8, 0x77, 0x21, 0x9b, 0x0c, 0xe4, 0x5a, 0x36,
    0xd2, 0x18,
];

/// Size of an SPL token account, for rent-exemption quotes.
pub const TOKEN_ACCOUNT_SPAN: u64 = 165;

/// What the user asked to move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Asset {
    Sol,
    Token { mint: String, decimals: u8 },
}

/// Session-scoped token reference data: immutable mint metadata merged with
/// an optional live balance, as shown to the user. The decimal `balance`
/// string is display data; it never feeds the lamport balance check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub mint: String,
    pub symbol: String,
    pub decimals: u8,
    pub balance: Option<String>,
}

impl TokenDescriptor {
    /// The asset a transfer of this token moves.
    pub fn asset(&self) -> Asset {
        Asset::Token {
            mint: self.mint.clone(),
            decimals: self.decimals,
        }
    }
}

/// A transfer as entered by the user: decimal-string amount, Base58 recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub recipient: String,
    pub amount: String,
    pub asset: Asset,
}

/// Network-derived inputs to assembly. `fee_lamports` and `rent_lamports`
/// are `None` when their quotes could not be fetched; the balance check then
/// degrades to amount plus platform fee.
#[derive(Debug, Clone)]
pub struct Quotes {
    pub balance_lamports: u64,
    pub fee_lamports: Option<u64>,
    pub rent_lamports: Option<u64>,
    pub recipient_ata_exists: bool,
    pub blockhash: [u8; 32],
}

/// An assembled, unsigned transfer.
#[derive(Debug, Clone)]
pub struct BuiltTransfer {
    pub transaction: Transaction,
    /// Lamports the sender must hold for this transfer to land.
    pub required_lamports: u64,
    /// True when fee or rent quotes were unavailable and the requirement is
    /// an underestimate.
    pub degraded_estimate: bool,
}

/// Assemble a transfer and check it against the sender's balance.
pub fn build_transfer(
    wallet: &Wallet,
    request: &TransferRequest,
    quotes: &Quotes,
) -> Result<BuiltTransfer, SendError> {
    let recipient = decode_pubkey(&request.recipient)
        .map_err(|e| SendError::Validation(format!("recipient: {e}")))?;

    let sender = wallet.pubkey;
    let mut degraded = quotes.fee_lamports.is_none();

    let mut instructions = Vec::new();
    let mut required: u64 = PLATFORM_FEE_LAMPORTS;

    match &request.asset {
        Asset::Sol => {
            let lamports = to_base_units(&request.amount, SOL_DECIMALS)?;
            if lamports == 0 {
                return Err(SendError::Validation("amount must be greater than zero".into()));
            }
            instructions.push(system_transfer(&sender, &recipient, lamports));
            required = checked_sum(required, lamports)?;
        }
        Asset::Token { mint, decimals } => {
            let mint_key =
                decode_pubkey(mint).map_err(|e| SendError::Validation(format!("mint: {e}")))?;
            let amount = to_base_units(&request.amount, *decimals)?;
            if amount == 0 {
                return Err(SendError::Validation("amount must be greater than zero".into()));
            }

            let source_ata = derive_associated_token_address(&sender, &mint_key)?;
            let dest_ata = derive_associated_token_address(&recipient, &mint_key)?;

            if !quotes.recipient_ata_exists {
                instructions.push(create_ata_idempotent(
                    &sender, &dest_ata, &recipient, &mint_key,
                ));
                match quotes.rent_lamports {
                    Some(rent) => required = checked_sum(required, rent)?,
                    None => degraded = true,
                }
            }

            instructions.push(transfer_checked(
                &source_ata,
                &mint_key,
                &dest_ata,
                &sender,
                amount,
                *decimals,
            )?);
        }
    }

    // Platform fee rides last on every send.
    instructions.push(system_transfer(
        &sender,
        &PLATFORM_FEE_ACCOUNT,
        PLATFORM_FEE_LAMPORTS,
    ));

    if let Some(fee) = quotes.fee_lamports {
        required = checked_sum(required, fee)?;
    }

    if quotes.balance_lamports < required {
        return Err(SendError::Validation(format!(
            "insufficient balance: have {} SOL, need {} SOL",
            format_base_units(quotes.balance_lamports, SOL_DECIMALS),
            format_base_units(required, SOL_DECIMALS),
        )));
    }

    let transaction = compile_transaction(&instructions, &sender, &quotes.blockhash)?;

    Ok(BuiltTransfer {
        transaction,
        required_lamports: required,
        degraded_estimate: degraded,
    })
}

fn checked_sum(a: u64, b: u64) -> Result<u64, SendError> {
    a.checked_add(b)
        .ok_or_else(|| SendError::Validation("lamport total overflows u64".into()))
}
