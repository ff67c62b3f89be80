pub mod config;
pub mod entropy;
pub mod hex32;
pub mod prng;
pub mod protocol;
pub mod shuffle;

#[cfg(test)]
pub mod test_utils;

pub use config::{ProtocolConfig, RecommitPolicy};
pub use protocol::{ShuffleProtocol, ShuffleProtocolError};
