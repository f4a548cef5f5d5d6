use thiserror::Error;

/// Failures of the pure script-building core. None of these are retried;
/// the caller has to supply different input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelockError {
    #[error("Invalid lock time {0}: CHECKLOCKTIMEVERIFY needs a non-zero value")]
    InvalidLockTime(u32),
    #[error("Invalid public key hash length: expected 20 bytes, got {0}")]
    InvalidPubKeyHashLength(usize),
    #[error("Signature must not be empty")]
    EmptySignature,
    #[error("Public key must not be empty")]
    EmptyPublicKey,
    #[error("Push of {0} bytes exceeds the script push limit")]
    PushTooLarge(usize),
    #[error("Address encoding failed: {0}")]
    AddressEncoding(String),
}

/// Failures of the create/spend flows that talk to keys, the node and the fee API.
#[derive(Error, Debug)]
pub enum SpendError {
    #[error("Script error: {0}")]
    Timelock(#[from] TimelockError),
    #[error("Node RPC error: {0}")]
    Rpc(#[from] std::io::Error),
    #[error("Fee API error: {0}")]
    FeeApi(#[from] reqwest::Error),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("Unexpected node response: {0}")]
    UnexpectedResponse(String),
    #[error("Signing failed: {0}")]
    Signing(String),
    #[error("Insufficient funds: {available} sat available, fee is {fee} sat")]
    InsufficientFunds { available: u64, fee: u64 },
    #[error("Fee rate {fee_per_kb} sat/kB overflows the fee for {num_inputs} inputs")]
    FeeOverflow { fee_per_kb: u64, num_inputs: usize },
    #[error("Transaction rejected by mempool: {0}")]
    MempoolRejected(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
}
