//! Signing identity.
//!
//! A [`Wallet`] holds the 64-byte Ed25519 keypair (32-byte seed followed by
//! the 32-byte public key) that signs outgoing transfers. Key material is
//! wiped on drop and never printed; the struct intentionally has no `Debug`
//! impl.

use ed25519_dalek::SigningKey;
use zeroize::Zeroize;

use crate::error::SendError;

pub struct Wallet {
    /// Base58 form of the public key, used as the fee payer address.
    pub address: String,
    /// Raw public key bytes.
    pub pubkey: [u8; 32],
    /// seed ‖ pubkey, the conventional 64-byte keypair layout.
    keypair: [u8; 64],
}

impl Wallet {
    /// Import a Base58-encoded 64-byte keypair.
    ///
    /// The public half must match the key derived from the seed half, which
    /// catches truncated or corrupted exports before anything is signed.
    pub fn from_base58_keypair(encoded: &str) -> Result<Self, SendError> {
        let mut decoded = bs58::decode(encoded.trim())
            .into_vec()
            .map_err(|e| SendError::Validation(format!("keypair: invalid base58: {e}")))?;

        if decoded.len() != 64 {
            let len = decoded.len();
            decoded.zeroize();
            return Err(SendError::Validation(format!(
                "keypair: expected 64 bytes, got {len}"
            )));
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&decoded[..32]);
        let signing = SigningKey::from_bytes(&seed);
        let derived = signing.verifying_key().to_bytes();

        if derived != decoded[32..] {
            seed.zeroize();
            decoded.zeroize();
            return Err(SendError::Validation(
                "keypair: public key does not match seed".into(),
            ));
        }
        seed.zeroize();

        let mut keypair = [0u8; 64];
        keypair.copy_from_slice(&decoded);
        decoded.zeroize();

        Ok(Self {
            address: bs58::encode(derived).into_string(),
            pubkey: derived,
            keypair,
        })
    }

    /// Build a wallet from a raw 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing = SigningKey::from_bytes(seed);
        let pubkey = signing.verifying_key().to_bytes();

        let mut keypair = [0u8; 64];
        keypair[..32].copy_from_slice(seed);
        keypair[32..].copy_from_slice(&pubkey);

        Self {
            address: bs58::encode(pubkey).into_string(),
            pubkey,
            keypair,
        }
    }

    /// The seed half, for signing. Callers must zeroize their copy.
    pub(crate) fn seed(&self) -> [u8; 32] {
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&self.keypair[..32]);
        seed
    }
}

impl Drop for Wallet {
    fn drop(&mut self) {
        self.keypair.zeroize();
    }
}
