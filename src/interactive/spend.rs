use bitcoin::consensus::encode::serialize_hex;
use bitcoin::hashes::Hash;
use bitcoin::secp256k1::Secp256k1;
use bitcoin::Transaction;

use crate::config::NodeConfig;
use crate::errors::SpendError;
use crate::internal::bitcoind_client::BitcoindClient;
use crate::internal::helper::{parse_address, resolve_fee_per_kb, warn_if_still_locked};
use crate::keys::parse_private_key;
use crate::scripts::timelock::build_redeem_script;
use crate::signing::sign_all_inputs;
use crate::transactions::spend::{create_spending_transaction, total_amount};
use crate::types::{FeeSource, UnlockTime};

const IMPORT_LABEL: &str = "P2SH absolute timelock";

/// Everything the spend flow needs besides the node connection.
#[derive(Debug, Clone)]
pub struct SpendRequest {
    pub wif: String,
    pub locktime: u32,
    pub p2sh_address: String,
    pub p2pkh_address: String,
    pub fee_source: FeeSource,
    pub dry_run: bool,
}

/// Sweep every coin at a CLTV+P2PKH lock address to a P2PKH address.
///
/// Returns the broadcast transaction, or `None` when the address holds no funds.
pub async fn spend_locked_funds(
    bitcoind: &BitcoindClient,
    request: &SpendRequest,
) -> Result<Option<Transaction>, SpendError> {
    let network = bitcoind.config.network;
    let secp_ctx = Secp256k1::new();

    let privkey = parse_private_key(&request.wif)?;
    let pubkey = privkey.public_key(&secp_ctx);
    let unlock_time = UnlockTime::new(request.locktime);

    // Rebuild the script exactly as it was hashed into the lock address
    let redeem_script = build_redeem_script(request.locktime, pubkey.pubkey_hash().as_byte_array())?;

    let from_addr = parse_address(&request.p2sh_address, network)?;
    let expected = redeem_script.to_p2sh_address(network)?;
    if from_addr != expected {
        log::warn!(
            "{} does not match this key and lock time (expected {}); signatures will not satisfy it",
            from_addr,
            expected
        );
    }
    let to_addr = parse_address(&request.p2pkh_address, network)?;

    bitcoind.import_address(&from_addr, IMPORT_LABEL, true).await?;
    let utxos = bitcoind.list_unspent(&from_addr).await?;
    let total_sat = total_amount(&utxos)
        .ok_or_else(|| SpendError::UnexpectedResponse("input amounts overflow".to_string()))?;
    if total_sat == 0 {
        println!("No funds to move");
        return Ok(None);
    }
    println!("Total funds to move (satoshis): {}", total_sat);

    warn_if_still_locked(bitcoind, unlock_time).await?;

    let fee_per_kb = resolve_fee_per_kb(bitcoind, &request.fee_source).await?;
    let plan = create_spending_transaction(&utxos, unlock_time, to_addr.script_pubkey(), fee_per_kb)?;
    log::info!(
        "Spending {} inputs, fee {} sat at {} sat/kB",
        plan.tx.input.len(),
        plan.fee_sat,
        fee_per_kb
    );
    println!("fees (satoshis): {}", plan.fee_sat);

    let mut tx = plan.tx;
    let unsigned_hex = serialize_hex(&tx);

    sign_all_inputs(&mut tx, &redeem_script, &privkey.inner, &secp_ctx)?;
    let signed_hex = serialize_hex(&tx);

    // test if the transaction will be accepted by the mempool
    let accept = bitcoind.test_mempool_accept(&signed_hex).await?;
    if !accept.allowed {
        return Err(SpendError::MempoolRejected(
            accept.reject_reason.unwrap_or_else(|| "unknown reason".to_string()),
        ));
    }

    println!("\nRaw unsigned transaction:\n{}", unsigned_hex);
    println!("\nRaw signed transaction:\n{}", signed_hex);
    println!("\nTxId: {}", tx.compute_txid());

    if request.dry_run {
        log::info!("Dry run, not broadcasting");
        return Ok(Some(tx));
    }

    println!("\nSending transaction...\n");
    let txid = bitcoind.send_raw_transaction(&signed_hex).await?;
    log::info!("Broadcast {}", txid);

    Ok(Some(tx))
}

/// Interactive CLI function to spend from a timelocked P2SH address
pub async fn run(config: NodeConfig, request: SpendRequest) -> Result<(), SpendError> {
    if config.rpc_user.is_empty() || config.rpc_password.is_empty() {
        return Err(SpendError::MissingArgument("--rpcuser and --rpcpass"));
    }
    let bitcoind = BitcoindClient::new(config)?;
    spend_locked_funds(&bitcoind, &request).await?;
    Ok(())
}
