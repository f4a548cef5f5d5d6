pub mod bitcoind_client;
pub mod convert;
pub mod fee_api;
pub mod helper;
