use lightning_block_sync::http::HttpEndpoint;
use lightning_block_sync::rpc::RpcClient;
use std::sync::Arc;
use bitcoin::address::Address;
use bitcoin::Txid;

use crate::config::NodeConfig;
use crate::internal::convert::{
    BlockCountResponse, EmptyResponse, FeeEstimateResponse, ListUnspentResponse,
    MempoolAcceptResponse, SendRawTxResponse};
use crate::types::LockedUtxo;

/// `listunspent` upper bound on confirmations; large enough to mean "any".
const MAX_CONFIRMATIONS: u32 = 9_999_999;

#[derive(Clone)]
pub struct BitcoindClient {
    pub bitcoind_rpc_client: Arc<RpcClient>,
    pub config: NodeConfig,
}

impl BitcoindClient {
    pub fn new(config: NodeConfig) -> std::io::Result<Self> {
        let http_endpoint = HttpEndpoint::for_host(config.host.clone()).with_port(config.port);
        let rpc_credentials = config.rpc_credentials();
        let bitcoind_rpc_client = RpcClient::new(&rpc_credentials, http_endpoint)?;

        log::debug!("RPC client for {}:{} ({})", config.host, config.port, config.network);

        Ok(Self {
            bitcoind_rpc_client: Arc::new(bitcoind_rpc_client),
            config,
        })
    }

    /// Watch-only import so `listunspent` can see coins at a P2SH address.
    pub async fn import_address(&self, address: &Address, label: &str, rescan: bool) -> std::io::Result<()> {
        let params = [
            serde_json::json!(address.to_string()),
            serde_json::json!(label),
            serde_json::json!(rescan),
        ];
        self.bitcoind_rpc_client
            .call_method::<EmptyResponse>("importaddress", &params)
            .await?;
        Ok(())
    }

    pub async fn list_unspent(&self, address: &Address) -> std::io::Result<Vec<LockedUtxo>> {
        let params = [
            serde_json::json!(0),
            serde_json::json!(MAX_CONFIRMATIONS),
            serde_json::json!([address.to_string()]),
        ];
        let utxos = self.bitcoind_rpc_client
            .call_method::<ListUnspentResponse>("listunspent", &params)
            .await?;
        Ok(utxos.0)
    }

    pub async fn test_mempool_accept(&self, tx_hex: &str) -> std::io::Result<MempoolAcceptResponse> {
        let params = [serde_json::json!([tx_hex])];
        self.bitcoind_rpc_client
            .call_method::<MempoolAcceptResponse>("testmempoolaccept", &params)
            .await
    }

    pub async fn send_raw_transaction(&self, tx_hex: &str) -> std::io::Result<Txid> {
        let params = [serde_json::json!(tx_hex)];
        let txid = self.bitcoind_rpc_client
            .call_method::<SendRawTxResponse>("sendrawtransaction", &params)
            .await?;
        Ok(txid.0)
    }

    /// Fee rate in BTC/kvB, `None` while the node lacks data (common on regtest).
    pub async fn estimate_smart_fee(&self, conf_target: u16) -> std::io::Result<Option<f64>> {
        let params = [serde_json::json!(conf_target)];
        let estimate = self.bitcoind_rpc_client
            .call_method::<FeeEstimateResponse>("estimatesmartfee", &params)
            .await?;
        Ok(estimate.feerate)
    }

    pub async fn get_block_count(&self) -> std::io::Result<u64> {
        let count = self.bitcoind_rpc_client
            .call_method::<BlockCountResponse>("getblockcount", &[])
            .await?;
        Ok(count.0)
    }
}
