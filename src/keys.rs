use std::str::FromStr;

use bitcoin::secp256k1::{All, Secp256k1};
use bitcoin::{PrivateKey, PubkeyHash, PublicKey};

use crate::errors::SpendError;

/// Recipient of the P2PKH branch, given either by public or private key.
#[derive(Debug, Clone)]
pub enum RecipientKey {
    Public(PublicKey),
    Private(PrivateKey),
}

impl RecipientKey {
    /// A private key wins over a public key when both are given.
    pub fn from_args(pubkey_hex: Option<&str>, wif: Option<&str>) -> Result<Self, SpendError> {
        match (wif, pubkey_hex) {
            (Some(wif), _) => Ok(RecipientKey::Private(parse_private_key(wif)?)),
            (None, Some(pubkey_hex)) => Ok(RecipientKey::Public(parse_public_key(pubkey_hex)?)),
            (None, None) => Err(SpendError::MissingArgument("--pub or --priv")),
        }
    }

    pub fn public_key(&self, secp_ctx: &Secp256k1<All>) -> PublicKey {
        match self {
            RecipientKey::Public(pubkey) => *pubkey,
            RecipientKey::Private(privkey) => privkey.public_key(secp_ctx),
        }
    }

    pub fn pubkey_hash(&self, secp_ctx: &Secp256k1<All>) -> PubkeyHash {
        self.public_key(secp_ctx).pubkey_hash()
    }
}

pub fn parse_private_key(wif: &str) -> Result<PrivateKey, SpendError> {
    PrivateKey::from_wif(wif).map_err(|e| SpendError::InvalidKey(e.to_string()))
}

pub fn parse_public_key(pubkey_hex: &str) -> Result<PublicKey, SpendError> {
    PublicKey::from_str(pubkey_hex).map_err(|e| SpendError::InvalidKey(e.to_string()))
}
