use bitcoin::Network;

/// Connection settings for the bitcoind JSON-RPC interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub rpc_user: String,
    pub rpc_password: String,
    pub network: Network,
}

impl NodeConfig {
    pub fn new(rpc_user: impl Into<String>, rpc_password: impl Into<String>) -> Self {
        Self {
            rpc_user: rpc_user.into(),
            rpc_password: rpc_password.into(),
            ..Self::default()
        }
    }

    /// `user:password`, base64 encoded for the basic auth header.
    pub fn rpc_credentials(&self) -> String {
        base64::encode(format!("{}:{}", self.rpc_user, self.rpc_password))
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 18443,
            rpc_user: String::new(),
            rpc_password: String::new(),
            network: Network::Regtest,
        }
    }
}
