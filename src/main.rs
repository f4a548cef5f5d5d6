use clap::{Parser, Subcommand};
use std::process::ExitCode;

use cltv_timelock::hashing::hash160;
use cltv_timelock::interactive;
use cltv_timelock::interactive::spend::SpendRequest;
use cltv_timelock::{FeeSource, Network, NodeConfig, DEFAULT_FEE_API_URL};

// ============================================================================
// CLI DEFINITION
// ============================================================================

/// Main CLI structure
#[derive(Parser)]
#[command(name = "CLTV Timelock CLI")]
#[command(version = "1.0")]
#[command(about = "Lock funds in a CLTV+P2PKH P2SH address and spend them after the timelock", long_about = None)]
struct Cli {
    /// Network for address encoding and checks
    #[arg(long, global = true, default_value = "regtest")]
    network: Network,

    #[command(subcommand)]
    command: Commands,
}

/// CLI Subcommands
#[derive(Subcommand)]
enum Commands {
    /// Create a P2SH address locked until a block height or unix time
    CreateAddress {
        #[arg(long = "pub", help = "Public key (hex)")]
        pubkey: Option<String>,
        #[arg(long = "priv", help = "Private key (WIF)")]
        privkey: Option<String>,
        #[arg(long, help = "Unlock time (block height or unix epoch)")]
        time: Option<u32>,
    },
    /// Spend all funds of a timelocked P2SH address to a P2PKH address
    Spend {
        #[arg(long = "priv", help = "Private key for the P2PKH part (WIF)")]
        privkey: String,
        #[arg(long, help = "Unlock time (block height or unix epoch)")]
        time: u32,
        #[arg(long, help = "The P2SH address to get the funds from")]
        p2sh: String,
        #[arg(long, help = "The P2PKH address to send the funds to")]
        p2pkh: String,
        #[arg(long, help = "RPC proxy username")]
        rpcuser: String,
        #[arg(long, help = "RPC proxy password")]
        rpcpass: String,
        #[arg(long, default_value = "127.0.0.1", help = "RPC host")]
        rpchost: String,
        #[arg(long, default_value_t = 18443, help = "RPC port")]
        rpcport: u16,
        #[arg(long, help = "Fixed fee rate in satoshis per kB")]
        fee_per_kb: Option<u64>,
        #[arg(long, help = "Ask the node (estimatesmartfee) for this confirmation target")]
        fee_target: Option<u16>,
        #[arg(long, default_value = DEFAULT_FEE_API_URL, help = "Fee API returning medium_fee_per_kb")]
        fee_url: String,
        #[arg(long, help = "Check mempool acceptance but do not broadcast")]
        dry_run: bool,
    },
    /// Calculate RIPEMD160(SHA256()) hash
    Hash160 {
        #[arg(short = 'd', long, help = "Input data to hash (hex)")]
        data: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let network = cli.network;

    let result = match cli.command {
        Commands::CreateAddress { pubkey, privkey, time } => {
            interactive::create_address::run(pubkey, privkey, time, network)
        },
        Commands::Spend {
            privkey, time, p2sh, p2pkh, rpcuser, rpcpass, rpchost, rpcport,
            fee_per_kb, fee_target, fee_url, dry_run,
        } => {
            let config = NodeConfig {
                host: rpchost,
                port: rpcport,
                rpc_user: rpcuser,
                rpc_password: rpcpass,
                network,
            };
            let fee_source = match (fee_per_kb, fee_target) {
                (Some(fee_per_kb), _) => FeeSource::Fixed(fee_per_kb),
                (None, Some(target)) => FeeSource::Node(target),
                (None, None) => FeeSource::Api(fee_url),
            };
            let request = SpendRequest {
                wif: privkey,
                locktime: time,
                p2sh_address: p2sh,
                p2pkh_address: p2pkh,
                fee_source,
                dry_run,
            };
            interactive::spend::run(config, request).await
        },
        Commands::Hash160 { data } => match hex::decode(&data) {
            Ok(bytes) => {
                println!("RIPEMD160(SHA256()) Hash: {}", hex::encode(hash160(&bytes)));
                Ok(())
            },
            Err(e) => {
                log::error!("Invalid hex input: {}", e);
                return ExitCode::FAILURE;
            },
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        },
    }
}
