//! Error correction over a simulated noisy channel.
//!
//! This module provides:
//! - Fixed-width bit blocks and MSB-first bit/integer conversions
//! - The Hamming(7,4) codec (encode, syndrome decode, noise injection)
//! - A seeded noisy channel that tracks what happened to every block
//! - Bit-string and byte-stream transmission pipelines built on the codec
//!
//! # Examples
//!
//! ```rust
//! use hamming_channel::ecc::{ChannelConfig, NoisyChannel};
//!
//! let mut channel = NoisyChannel::new(ChannelConfig::default().with_seed(7)).unwrap();
//! let report = channel.transmit_bytes(b"moon");
//! assert_eq!(report.corrected, b"moon");
//! ```

/// Result type for error correction operations
pub type Result<T> = crate::error::Result<T>;

/// Trait for error correction code implementations
pub trait ErrorCorrection {
    /// Encode data with error correction symbols
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decode data and correct errors if possible
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>>;
}

pub mod bits;
pub mod channel;
pub mod hamming;
pub mod transmission;

pub use bits::{
    bits_to_value, join_nibbles, parse_bit_string, split_byte, value_to_bits, BitBlock, Codeword,
    MessageBlock, Syndrome,
};
pub use channel::{BlockReport, BlockStatus, ChannelConfig, ChannelStats, NoisyChannel};
pub use hamming::{create_hamming_7_4, Correction, DecodeOutcome, HammingCodec};
pub use transmission::{decode_all, BitStringTransmission, ByteTransmission};
