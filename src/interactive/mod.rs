// Interactive CLI flows: lock funds to a timelocked P2SH address, and sweep
// them out again once the lock has expired.

pub mod create_address;
pub mod spend;
