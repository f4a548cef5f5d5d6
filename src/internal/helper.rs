use std::str::FromStr;

use bitcoin::{Address, Network};

use crate::errors::SpendError;
use crate::internal::bitcoind_client::BitcoindClient;
use crate::internal::fee_api::fetch_fee_per_kb;
use crate::transactions::fees::btc_per_kb_to_sat_per_kb;
use crate::types::{FeeSource, LockTimeKind, UnlockTime};

/// Parse an address and make sure it belongs to `network`.
pub fn parse_address(address: &str, network: Network) -> Result<Address, SpendError> {
    let invalid = |reason: String| SpendError::InvalidAddress {
        address: address.to_string(),
        reason,
    };
    Address::from_str(address)
        .map_err(|e| invalid(e.to_string()))?
        .require_network(network)
        .map_err(|e| invalid(e.to_string()))
}

/// Resolve the fee rate, in satoshis per kB, from the configured source.
pub async fn resolve_fee_per_kb(bitcoind: &BitcoindClient, source: &FeeSource) -> Result<u64, SpendError> {
    match source {
        FeeSource::Fixed(fee_per_kb) => Ok(*fee_per_kb),
        FeeSource::Api(url) => Ok(fetch_fee_per_kb(url).await?),
        FeeSource::Node(conf_target) => {
            let feerate = bitcoind.estimate_smart_fee(*conf_target).await?.ok_or_else(|| {
                SpendError::UnexpectedResponse(format!(
                    "estimatesmartfee has no estimate for {} blocks",
                    conf_target
                ))
            })?;
            btc_per_kb_to_sat_per_kb(feerate)
                .ok_or_else(|| SpendError::UnexpectedResponse(format!("bad fee rate {}", feerate)))
        }
    }
}

/// Log a warning when a height lock is still in the future. Time locks are
/// checked against median time past, which we do not query.
pub async fn warn_if_still_locked(bitcoind: &BitcoindClient, unlock_time: UnlockTime) -> Result<(), SpendError> {
    if unlock_time.kind() != LockTimeKind::BlockHeight {
        return Ok(());
    }
    let height = bitcoind.get_block_count().await?;
    if height < u64::from(unlock_time.value()) {
        log::warn!(
            "Chain tip is at height {} but coins unlock at {}; the node will reject the spend",
            height,
            unlock_time.value()
        );
    }
    Ok(())
}
