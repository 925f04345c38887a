pub mod ecc;
pub mod error;

pub use ecc::{ChannelConfig, Codeword, HammingCodec, MessageBlock, NoisyChannel};
pub use error::{Error, Result};
