pub mod timelock;

pub use timelock::*;
