use serde::Deserialize;

/// The slice of a blockcypher-style chain endpoint we care about.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainFeeInfo {
    pub medium_fee_per_kb: u64,
}

/// Fetch the medium fee rate (satoshis per kB).
pub async fn fetch_fee_per_kb(url: &str) -> Result<u64, reqwest::Error> {
    log::debug!("Fetching fee rate from {}", url);
    let info = reqwest::get(url)
        .await?
        .error_for_status()?
        .json::<ChainFeeInfo>()
        .await?;
    Ok(info.medium_fee_per_kb)
}
