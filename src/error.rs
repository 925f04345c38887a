//! Error types shared by the codec, the channel simulator and the bit helpers.

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Contract violations reported by the crate.
///
/// Detected and corrected transmission errors are never reported through this type;
/// they are part of a [`DecodeOutcome`](crate::ecc::hamming::DecodeOutcome).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed caller input that does not fit a more specific variant
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A bit block had the wrong number of bits
    #[error("Expected {expected} bits, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// A bit position held something other than 0 or 1
    #[error("Bit {index} must be 0 or 1, got {value}")]
    InvalidBit { index: usize, value: u8 },

    /// Noise probability outside [0, 1]
    #[error("Error probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),

    /// A bit sequence does not fit in the requested integer type
    #[error("{bits} significant bits do not fit in a {capacity}-bit value")]
    Overflow { bits: usize, capacity: usize },

    /// Generator or parity-check matrix cannot form a single-error-correcting code
    #[error("Malformed matrix: {0}")]
    MalformedMatrix(String),
}
