use bitcoin::secp256k1::Secp256k1;
use bitcoin::hashes::Hash;
use bitcoin::Network;

use crate::errors::SpendError;
use crate::keys::RecipientKey;
use crate::scripts::timelock::{build_redeem_script, classify_locktime, derive_lock_address};

/// Result of the create-address flow.
#[derive(Debug, Clone)]
pub struct LockAddress {
    pub redeem_script_hex: String,
    pub script_hash_hex: String,
    pub address: String,
}

/// Build the CLTV+P2PKH redeem script for `recipient` and derive its P2SH address.
pub fn create_lock_address(
    recipient: &RecipientKey,
    locktime: u32,
    network: Network,
) -> Result<LockAddress, SpendError> {
    let secp_ctx = Secp256k1::new();
    let pubkey_hash = recipient.pubkey_hash(&secp_ctx);

    let redeem_script = build_redeem_script(locktime, pubkey_hash.as_byte_array())?;
    let script_hash = derive_lock_address(&redeem_script);
    let address = redeem_script.to_p2sh_address(network)?;

    log::info!(
        "Locked until {:?} {} for {}",
        classify_locktime(locktime),
        locktime,
        pubkey_hash
    );
    log::debug!("Redeem script: {}", redeem_script.to_asm());

    Ok(LockAddress {
        redeem_script_hex: redeem_script.to_hex(),
        script_hash_hex: hex::encode(script_hash.as_byte_array()),
        address: address.to_string(),
    })
}

/// Interactive CLI function to create a timelocked P2SH address
pub fn run(
    pubkey_hex: Option<String>,
    wif: Option<String>,
    locktime: Option<u32>,
    network: Network,
) -> Result<(), SpendError> {
    let locktime = locktime.ok_or(SpendError::MissingArgument("--time"))?;
    let recipient = RecipientKey::from_args(pubkey_hex.as_deref(), wif.as_deref())?;

    let lock = create_lock_address(&recipient, locktime, network)?;

    println!("\n✓ Timelocked P2SH Address Created\n");
    println!("Redeem Script: {}", lock.redeem_script_hex);
    println!("Script Hash: {}", lock.script_hash_hex);
    println!("P2SH: {}", lock.address);
    println!();
    Ok(())
}
