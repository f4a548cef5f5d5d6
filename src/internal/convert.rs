use bitcoin::Txid;
use lightning_block_sync::http::JsonResponse;
use std::convert::TryInto;
use std::str::FromStr;
use serde_json::Value;

use crate::types::LockedUtxo;

fn invalid_data(msg: impl Into<String>) -> std::io::Error {
  std::io::Error::new(std::io::ErrorKind::InvalidData, msg.into())
}

/// Responses such as `importaddress` that return `null` on success.
#[derive(Debug)]
pub struct EmptyResponse;

impl TryInto<EmptyResponse> for JsonResponse {
  type Error = std::io::Error;
  fn try_into(self) -> std::io::Result<EmptyResponse> {
    Ok(EmptyResponse)
  }
}

#[derive(Debug)]
pub struct ListUnspentResponse(pub Vec<LockedUtxo>);

impl TryInto<ListUnspentResponse> for JsonResponse {
  type Error = std::io::Error;
  fn try_into(self) -> Result<ListUnspentResponse, Self::Error> {
    let utxos = self
      .0
      .as_array()
      .ok_or_else(|| invalid_data("listunspent: expected an array"))?
      .iter()
      .map(parse_unspent)
      .collect::<std::io::Result<Vec<_>>>()?;
    Ok(ListUnspentResponse(utxos))
  }
}

fn parse_unspent(utxo: &Value) -> std::io::Result<LockedUtxo> {
  let txid = utxo["txid"]
    .as_str()
    .and_then(|txid| Txid::from_str(txid).ok())
    .ok_or_else(|| invalid_data("listunspent: bad txid"))?;
  let vout = utxo["vout"]
    .as_u64()
    .and_then(|vout| u32::try_from(vout).ok())
    .ok_or_else(|| invalid_data("listunspent: bad vout"))?;
  let amount_sat = utxo["amount"]
    .as_f64()
    .and_then(|btc| bitcoin::Amount::from_btc(btc).ok())
    .ok_or_else(|| invalid_data("listunspent: bad amount"))?
    .to_sat();
  Ok(LockedUtxo { txid, vout, amount_sat })
}

#[derive(Debug)]
pub struct MempoolAcceptResponse {
  pub allowed: bool,
  pub reject_reason: Option<String>,
}

impl TryInto<MempoolAcceptResponse> for JsonResponse {
  type Error = std::io::Error;
  fn try_into(self) -> std::io::Result<MempoolAcceptResponse> {
    // one entry per submitted transaction; we only ever submit one
    let result = self
      .0
      .as_array()
      .and_then(|results| results.first())
      .ok_or_else(|| invalid_data("testmempoolaccept: empty result"))?;
    Ok(MempoolAcceptResponse {
      allowed: result["allowed"].as_bool().unwrap_or(false),
      reject_reason: result["reject-reason"].as_str().map(str::to_string),
    })
  }
}

#[derive(Debug)]
pub struct SendRawTxResponse(pub Txid);

impl TryInto<SendRawTxResponse> for JsonResponse {
  type Error = std::io::Error;
  fn try_into(self) -> std::io::Result<SendRawTxResponse> {
    let txid = self
      .0
      .as_str()
      .and_then(|txid| Txid::from_str(txid).ok())
      .ok_or_else(|| invalid_data("sendrawtransaction: bad txid"))?;
    Ok(SendRawTxResponse(txid))
  }
}

#[derive(Debug)]
pub struct FeeEstimateResponse {
  /// BTC per kvB, absent when the node has no estimate yet
  pub feerate: Option<f64>,
}

impl TryInto<FeeEstimateResponse> for JsonResponse {
  type Error = std::io::Error;
  fn try_into(self) -> std::io::Result<FeeEstimateResponse> {
    Ok(FeeEstimateResponse { feerate: self.0["feerate"].as_f64() })
  }
}

#[derive(Debug)]
pub struct BlockCountResponse(pub u64);

impl TryInto<BlockCountResponse> for JsonResponse {
  type Error = std::io::Error;
  fn try_into(self) -> std::io::Result<BlockCountResponse> {
    self
      .0
      .as_u64()
      .map(BlockCountResponse)
      .ok_or_else(|| invalid_data("getblockcount: expected a number"))
  }
}
