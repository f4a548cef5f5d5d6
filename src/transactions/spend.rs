use bitcoin::script::ScriptBuf;
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, Transaction, TxIn, TxOut, Witness};

use crate::errors::SpendError;
use crate::scripts::timelock::encode_for_sequence;
use crate::transactions::fees::calculate_spend_fee;
use crate::types::{LockedUtxo, UnlockTime};

/// Unsigned sweep of every locked coin into one output.
#[derive(Debug, Clone)]
pub struct SpendPlan {
    pub tx: Transaction,
    pub total_in_sat: u64,
    pub fee_sat: u64,
}

/// Build the unsigned spending transaction.
///
/// Every input carries the CLTV sequence and nLockTime is the unlock time
/// itself, so the script's check passes from that height or time onwards.
/// The fee is subtracted here, before anything is signed.
pub fn create_spending_transaction(
    utxos: &[LockedUtxo],
    unlock_time: UnlockTime,
    destination: ScriptBuf,
    fee_per_kb: u64,
) -> Result<SpendPlan, SpendError> {
    let total_in_sat = total_amount(utxos)
        .ok_or_else(|| SpendError::UnexpectedResponse("input amounts overflow".to_string()))?;
    let fee_sat = calculate_spend_fee(utxos.len(), fee_per_kb)
        .ok_or(SpendError::FeeOverflow { fee_per_kb, num_inputs: utxos.len() })?;

    if fee_sat >= total_in_sat {
        return Err(SpendError::InsufficientFunds { available: total_in_sat, fee: fee_sat });
    }

    let sequence = encode_for_sequence(unlock_time.kind());
    let inputs = utxos
        .iter()
        .map(|utxo| TxIn {
            previous_output: OutPoint { txid: utxo.txid, vout: utxo.vout },
            script_sig: ScriptBuf::new(), // filled in after signing
            sequence,
            witness: Witness::new(),
        })
        .collect();

    let output = TxOut {
        value: Amount::from_sat(total_in_sat - fee_sat),
        script_pubkey: destination,
    };

    let tx = Transaction {
        version: Version::TWO,
        lock_time: unlock_time.to_absolute(),
        input: inputs,
        output: vec![output],
    };

    Ok(SpendPlan { tx, total_in_sat, fee_sat })
}

/// Sum of the coins' values, `None` on overflow.
pub fn total_amount(utxos: &[LockedUtxo]) -> Option<u64> {
    utxos.iter().try_fold(0u64, |total, utxo| total.checked_add(utxo.amount_sat))
}
