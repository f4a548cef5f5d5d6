use bitcoin::absolute::{self, LOCK_TIME_THRESHOLD};
use bitcoin::blockdata::constants::MAX_SCRIPT_ELEMENT_SIZE;
use bitcoin::script::{Builder, PushBytes, ScriptBuf};
use bitcoin::{Network, PubkeyHash, Txid};
use bitcoin::hashes::Hash;

use crate::errors::TimelockError;

// ============================================================================
// LOCK TIME
// ============================================================================

/// How a CLTV lock value is interpreted. Decided purely by magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockTimeKind {
    /// Values below 500,000,000
    BlockHeight,
    /// Values at or above 500,000,000
    UnixEpoch,
}

impl LockTimeKind {
    pub fn of(value: u32) -> Self {
        if value < LOCK_TIME_THRESHOLD {
            LockTimeKind::BlockHeight
        } else {
            LockTimeKind::UnixEpoch
        }
    }
}

/// A raw lock value carried together with its classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnlockTime {
    value: u32,
    kind: LockTimeKind,
}

impl UnlockTime {
    pub fn new(value: u32) -> Self {
        Self { value, kind: LockTimeKind::of(value) }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn kind(&self) -> LockTimeKind {
        self.kind
    }

    pub fn is_block_height(&self) -> bool {
        self.kind == LockTimeKind::BlockHeight
    }

    /// nLockTime for the spending transaction.
    pub fn to_absolute(&self) -> absolute::LockTime {
        absolute::LockTime::from_consensus(self.value)
    }
}

// ============================================================================
// REDEEM SCRIPT
// ============================================================================

/// `<locktime> OP_CLTV OP_DROP OP_DUP OP_HASH160 <pkh> OP_EQUALVERIFY OP_CHECKSIG`
///
/// Only constructed through `build_redeem_script`, so a value of this type
/// always holds a non-zero lock time and a 20 byte key hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemScript {
    pub(crate) unlock_time: UnlockTime,
    pub(crate) pubkey_hash: PubkeyHash,
    pub(crate) script: ScriptBuf,
}

impl RedeemScript {
    pub fn unlock_time(&self) -> UnlockTime {
        self.unlock_time
    }

    pub fn pubkey_hash(&self) -> &PubkeyHash {
        &self.pubkey_hash
    }

    pub fn as_script(&self) -> &ScriptBuf {
        &self.script
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.script.as_bytes()
    }

    /// Canonical serialized form, the preimage of the P2SH hash.
    pub fn to_hex(&self) -> String {
        hex::encode(self.script.as_bytes())
    }

    /// Opcode listing, e.g. `OP_PUSHBYTES_2 8a02 OP_CLTV OP_DROP ...`
    pub fn to_asm(&self) -> String {
        self.script.to_asm_string()
    }

    /// The P2SH scriptPubKey (`OP_HASH160 <hash> OP_EQUAL`) locking to this script.
    pub fn to_p2sh_script_pubkey(&self) -> ScriptBuf {
        self.script.to_p2sh()
    }

    pub fn to_p2sh_address(&self, network: Network) -> Result<bitcoin::Address, TimelockError> {
        bitcoin::Address::p2sh(&self.script, network)
            .map_err(|e| TimelockError::AddressEncoding(e.to_string()))
    }
}

// ============================================================================
// UNLOCKING WITNESS
// ============================================================================

/// scriptSig for spending a CLTV+P2PKH P2SH output: `<sig> <pubkey> <redeem script>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockingWitness {
    pub signature: Vec<u8>,
    pub public_key: Vec<u8>,
    pub redeem_script: RedeemScript,
}

impl UnlockingWitness {
    pub fn redeem_script_hex(&self) -> String {
        self.redeem_script.to_hex()
    }

    /// Serialize the three elements as data pushes.
    pub fn to_script_sig(&self) -> Result<ScriptBuf, TimelockError> {
        Ok(Builder::new()
            .push_slice(to_push_bytes(&self.signature)?)
            .push_slice(to_push_bytes(&self.public_key)?)
            .push_slice(to_push_bytes(self.redeem_script.as_bytes())?)
            .into_script())
    }
}

/// Consensus caps every stack element at 520 bytes; PushBytes alone only caps at u32.
fn to_push_bytes(data: &[u8]) -> Result<&PushBytes, TimelockError> {
    if data.len() > MAX_SCRIPT_ELEMENT_SIZE {
        return Err(TimelockError::PushTooLarge(data.len()));
    }
    <&PushBytes>::try_from(data).map_err(|_| TimelockError::PushTooLarge(data.len()))
}

// ============================================================================
// NODE DATA
// ============================================================================

/// A coin sitting at the P2SH lock address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedUtxo {
    pub txid: Txid,
    pub vout: u32,
    pub amount_sat: u64,
}

/// Where the spend flow gets its fee rate from.
#[derive(Debug, Clone, PartialEq)]
pub enum FeeSource {
    /// Satoshis per 1000 bytes
    Fixed(u64),
    /// HTTP endpoint returning `medium_fee_per_kb`, taken as satoshis per
    /// 1000 bytes like the other sources (not per 1024)
    Api(String),
    /// `estimatesmartfee` with this confirmation target
    Node(u16),
}

pub const DEFAULT_FEE_API_URL: &str = "https://api.blockcypher.com/v1/btc/test3";

pub(crate) fn pubkey_hash_from_slice(bytes: &[u8]) -> Result<PubkeyHash, TimelockError> {
    PubkeyHash::from_slice(bytes).map_err(|_| TimelockError::InvalidPubKeyHashLength(bytes.len()))
}
