//! Build, lock and spend P2SH outputs guarded by an absolute
//! CHECKLOCKTIMEVERIFY timelock in front of a P2PKH condition.
//!
//! The script logic in [`scripts::timelock`] is pure; the node and fee API
//! glue lives in [`internal`] and [`interactive`].

// Re-export commonly used external types
pub use bitcoin::Network;

pub mod config;
pub mod errors;
pub mod hashing;
pub mod keys;
pub mod scripts;
pub mod signing;
pub mod transactions;
pub mod types;

// Internal utilities
pub mod internal;

// Interactive CLI modules
pub mod interactive;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use config::NodeConfig;
pub use errors::{SpendError, TimelockError};
pub use scripts::timelock::*;
pub use signing::*;
pub use transactions::fees::*;
pub use transactions::spend::*;
pub use types::*;
