use bitcoin::blockdata::opcodes::all as opcodes;
use bitcoin::hashes::Hash;
use bitcoin::script::{write_scriptint, Builder};
use bitcoin::{ScriptHash, Sequence};

use crate::errors::TimelockError;
use crate::hashing::{Hash160Hasher, ScriptHasher};
use crate::types::{pubkey_hash_from_slice, LockTimeKind, RedeemScript, UnlockTime, UnlockingWitness};

/// Block height if below 500,000,000, Unix epoch seconds otherwise.
pub fn classify_locktime(value: u32) -> LockTimeKind {
    LockTimeKind::of(value)
}

/// Minimal script-number bytes of `locktime`, the operand CHECKLOCKTIMEVERIFY
/// reads off the stack. Little-endian, with an extra zero byte when the top
/// bit of the last byte would otherwise read as a sign.
pub fn encode_for_script(locktime: u32) -> Vec<u8> {
    let mut buf = [0u8; 8];
    let len = write_scriptint(&mut buf, locktime as i64);
    buf[..len].to_vec()
}

/// nSequence for an input spending a CLTV output.
///
/// 0xFFFFFFFE for both kinds: bit 31 is set so BIP68 relative locks stay off,
/// and the value is not final so the transaction's nLockTime is enforced.
pub fn encode_for_sequence(_kind: LockTimeKind) -> Sequence {
    Sequence::ENABLE_LOCKTIME_NO_RBF
}

/// Assemble `<locktime> OP_CLTV OP_DROP OP_DUP OP_HASH160 <pkh> OP_EQUALVERIFY OP_CHECKSIG`.
///
/// The same `(locktime, pubkey_hash)` always yields the same bytes, which is
/// what lets the spend side rebuild the script that was hashed into the address.
pub fn build_redeem_script(locktime: u32, pubkey_hash: &[u8]) -> Result<RedeemScript, TimelockError> {
    let pubkey_hash = pubkey_hash_from_slice(pubkey_hash)?;
    if locktime == 0 {
        return Err(TimelockError::InvalidLockTime(locktime));
    }
    let unlock_time = UnlockTime::new(locktime);

    // push_lock_time picks the shortest push: OP_1..OP_16 or minimal scriptint data
    let script = Builder::new()
        .push_lock_time(unlock_time.to_absolute())
        .push_opcode(opcodes::OP_CLTV)
        .push_opcode(opcodes::OP_DROP)
        .push_opcode(opcodes::OP_DUP)
        .push_opcode(opcodes::OP_HASH160)
        .push_slice(pubkey_hash.as_byte_array())
        .push_opcode(opcodes::OP_EQUALVERIFY)
        .push_opcode(opcodes::OP_CHECKSIG)
        .into_script();

    Ok(RedeemScript { unlock_time, pubkey_hash, script })
}

pub fn build_unlocking_witness(
    signature: &[u8],
    pubkey: &[u8],
    redeem_script: RedeemScript,
) -> Result<UnlockingWitness, TimelockError> {
    if signature.is_empty() {
        return Err(TimelockError::EmptySignature);
    }
    if pubkey.is_empty() {
        return Err(TimelockError::EmptyPublicKey);
    }
    Ok(UnlockingWitness {
        signature: signature.to_vec(),
        public_key: pubkey.to_vec(),
        redeem_script,
    })
}

/// HASH160 of the serialized redeem script, the payload of the P2SH address.
pub fn derive_lock_address(redeem_script: &RedeemScript) -> ScriptHash {
    derive_lock_address_with(&Hash160Hasher, redeem_script)
}

pub fn derive_lock_address_with<H: ScriptHasher>(hasher: &H, redeem_script: &RedeemScript) -> ScriptHash {
    ScriptHash::from_byte_array(hasher.hash160(redeem_script.as_bytes()))
}
