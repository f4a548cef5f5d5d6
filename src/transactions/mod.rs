pub mod fees;
pub mod spend;

pub use fees::*;
pub use spend::*;
