// ============================================================================
// FEE CALCULATIONS
// ============================================================================
// Legacy (non-segwit) size estimate for a transaction that spends CLTV+P2PKH
// P2SH inputs into a single P2PKH output.

/// Upper bound of one input: outpoint, scriptSig with sig + pubkey + redeem script, sequence.
pub const P2SH_CLTV_INPUT_SIZE: u64 = 180;
/// One P2PKH output.
pub const P2PKH_OUTPUT_SIZE: u64 = 34;
/// Version, locktime and the input/output counts.
pub const TX_OVERHEAD_SIZE: u64 = 10;

/// size = inputs * 180 + 34 + 10 + inputs
///
/// The trailing `+ inputs` keeps the estimate on the upper bound of the
/// usual "plus or minus one byte per input". `None` on overflow.
pub fn estimate_spend_tx_size(num_inputs: usize) -> Option<u64> {
    let num_inputs = u64::try_from(num_inputs).ok()?;
    num_inputs
        .checked_mul(P2SH_CLTV_INPUT_SIZE)?
        .checked_add(P2PKH_OUTPUT_SIZE + TX_OVERHEAD_SIZE)?
        .checked_add(num_inputs)
}

/// Fee: (fee_per_kb * size) / 1000, `None` on overflow
pub fn calculate_fee(tx_size_bytes: u64, fee_per_kb: u64) -> Option<u64> {
    fee_per_kb.checked_mul(tx_size_bytes).map(|fee| fee / 1000)
}

pub fn calculate_spend_fee(num_inputs: usize, fee_per_kb: u64) -> Option<u64> {
    calculate_fee(estimate_spend_tx_size(num_inputs)?, fee_per_kb)
}

/// Node fee estimates come back in BTC per kvB.
pub fn btc_per_kb_to_sat_per_kb(btc_per_kb: f64) -> Option<u64> {
    bitcoin::Amount::from_btc(btc_per_kb).ok().map(|amount| amount.to_sat())
}
