use bitcoin::hashes::Hash;
use bitcoin::secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::Transaction;

use crate::errors::SpendError;
use crate::scripts::timelock::build_unlocking_witness;
use crate::types::RedeemScript;

// ============================================================================
// TRANSACTION SIGNING & VERIFICATION
// ============================================================================

/// Sign a P2SH input with the redeem script standing in for the scriptCode.
///
/// Returns: DER-encoded signature with SIGHASH_ALL appended
pub fn sign_p2sh_input(
    tx: &Transaction,
    input_index: usize,
    redeem_script: &RedeemScript,
    secret_key: &SecretKey,
    secp_ctx: &Secp256k1<All>,
) -> Result<Vec<u8>, SpendError> {
    let msg = legacy_sighash_message(tx, input_index, redeem_script)?;
    let sig = secp_ctx.sign_ecdsa(&msg, secret_key);

    let mut sig_bytes = sig.serialize_der().to_vec();
    sig_bytes.push(EcdsaSighashType::All as u8);
    Ok(sig_bytes)
}

/// Check a signature produced by `sign_p2sh_input`.
pub fn verify_p2sh_signature(
    tx: &Transaction,
    input_index: usize,
    redeem_script: &RedeemScript,
    signature: &[u8],
    pubkey: &PublicKey,
    secp_ctx: &Secp256k1<All>,
) -> Result<bool, SpendError> {
    let msg = legacy_sighash_message(tx, input_index, redeem_script)?;

    // Remove sighash type byte
    let Some((_, der)) = signature.split_last() else {
        return Ok(false);
    };
    let Ok(sig) = bitcoin::secp256k1::ecdsa::Signature::from_der(der) else {
        return Ok(false);
    };

    Ok(secp_ctx.verify_ecdsa(&msg, &sig, pubkey).is_ok())
}

/// Sign every input and install `<sig> <pubkey> <redeem script>` as its scriptSig.
///
/// All inputs come from the same lock address, so one key signs them all.
/// The transaction must not change after this point.
pub fn sign_all_inputs(
    tx: &mut Transaction,
    redeem_script: &RedeemScript,
    secret_key: &SecretKey,
    secp_ctx: &Secp256k1<All>,
) -> Result<(), SpendError> {
    let pubkey = bitcoin::PublicKey::new(PublicKey::from_secret_key(secp_ctx, secret_key));
    let pubkey_bytes = pubkey.to_bytes();

    // Sighashes blank every scriptSig, so signing before installing any of them is equivalent.
    let mut script_sigs = Vec::with_capacity(tx.input.len());
    for input_index in 0..tx.input.len() {
        let sig = sign_p2sh_input(tx, input_index, redeem_script, secret_key, secp_ctx)?;
        let witness = build_unlocking_witness(&sig, &pubkey_bytes, redeem_script.clone())?;
        script_sigs.push(witness.to_script_sig()?);
    }

    for (txin, script_sig) in tx.input.iter_mut().zip(script_sigs) {
        txin.script_sig = script_sig;
    }
    Ok(())
}

fn legacy_sighash_message(
    tx: &Transaction,
    input_index: usize,
    redeem_script: &RedeemScript,
) -> Result<Message, SpendError> {
    let sighash_cache = SighashCache::new(tx);
    let sighash = sighash_cache
        .legacy_signature_hash(input_index, redeem_script.as_script(), EcdsaSighashType::All.to_u32())
        .map_err(|e| SpendError::Signing(e.to_string()))?;

    Ok(Message::from_digest(sighash.to_byte_array()))
}
