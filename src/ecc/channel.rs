//! Noisy channel simulation.
//!
//! The channel flips at most one bit per 7-bit codeword: with the configured probability a
//! position is chosen uniformly and inverted, otherwise the codeword passes unchanged. This is
//! a simplification of a binary symmetric channel, which would flip every bit independently.

use crate::ecc::bits::{Codeword, MessageBlock};
use crate::ecc::hamming::{
    check_probability, flip_at_most_one, Correction, DecodeOutcome, HammingCodec,
};
use crate::ecc::Result;
use crate::error::Error;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::fmt;

/// Parameters for configuring a noisy channel
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelConfig {
    /// Probability in [0, 1] that a codeword gets one bit flipped
    pub error_probability: f64,
    /// Seed for the channel's generator; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            error_probability: 0.1,
            seed: None,
        }
    }
}

impl ChannelConfig {
    /// Create a config from a probability in [0, 1]
    pub fn new(error_probability: f64) -> Result<Self> {
        let config = Self {
            error_probability,
            seed: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a config from a user-facing percentage in [0, 100]
    pub fn from_percentage(percent: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(Error::InvalidInput(format!(
                "noise percentage must be within [0, 100], got {}",
                percent
            )));
        }
        Self::new(percent / 100.0)
    }

    /// Fix the generator seed for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_probability(self.error_probability)
    }
}

/// Counters accumulated by a channel across transmissions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Codewords passed through the channel
    pub blocks: usize,
    /// Codewords that had a bit flipped
    pub bits_flipped: usize,
    /// Decoded blocks with a non-zero syndrome
    pub errors_detected: usize,
    /// Decoded blocks whose data differs from what was sent
    pub miscorrections: usize,
}

/// A Hamming(7,4) codec attached to a noisy channel.
#[derive(Debug, Clone)]
pub struct NoisyChannel<R = ChaCha20Rng> {
    codec: HammingCodec,
    error_probability: f64,
    rng: R,
    stats: ChannelStats,
}

impl NoisyChannel<ChaCha20Rng> {
    /// Create a channel backed by a ChaCha20 generator
    pub fn new(config: ChannelConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Self::with_rng(config.error_probability, rng)
    }
}

impl<R: Rng> NoisyChannel<R> {
    /// Create a channel with an injected random source
    pub fn with_rng(error_probability: f64, rng: R) -> Result<Self> {
        check_probability(error_probability)?;
        Ok(Self {
            codec: HammingCodec::new(),
            error_probability,
            rng,
            stats: ChannelStats::default(),
        })
    }

    pub fn codec(&self) -> &HammingCodec {
        &self.codec
    }

    pub fn error_probability(&self) -> f64 {
        self.error_probability
    }

    pub fn stats(&self) -> ChannelStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = ChannelStats::default();
    }

    /// Pass one codeword through the channel
    pub fn transmit(&mut self, codeword: &Codeword) -> Codeword {
        let noisy = flip_at_most_one(codeword, self.error_probability, &mut self.rng);
        self.stats.blocks += 1;
        if noisy != *codeword {
            self.stats.bits_flipped += 1;
            log::trace!("channel flipped a bit: {} -> {}", codeword, noisy);
        }
        noisy
    }

    /// Encode, transmit and decode one message block
    pub fn send(&mut self, message: &MessageBlock) -> BlockReport {
        let encoded = self.codec.encode(message);
        let noisy = self.transmit(&encoded);
        let outcome = self.codec.decode(&noisy);
        self.record(message, &outcome);
        BlockReport {
            message: *message,
            encoded,
            noisy,
            outcome,
        }
    }

    /// Fold a decode result for `message` into the counters
    pub(crate) fn record(&mut self, message: &MessageBlock, outcome: &DecodeOutcome) {
        if outcome.error_detected() {
            self.stats.errors_detected += 1;
        }
        if outcome.data != *message {
            self.stats.miscorrections += 1;
            log::warn!(
                "block {} decoded as {} (syndrome {}, {:?})",
                message,
                outcome.data,
                outcome.syndrome,
                outcome.correction
            );
        }
    }
}

/// Everything that happened to one message block on its way through the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockReport {
    pub message: MessageBlock,
    pub encoded: Codeword,
    pub noisy: Codeword,
    pub outcome: DecodeOutcome,
}

/// Summary of a block's fate, as seen by the sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    /// Arrived intact
    Ok,
    /// Arrived damaged and was repaired
    Corrected,
    /// Decoded data differs from what was sent
    Miscorrected,
    /// Error detected but its syndrome matched no position; nothing was flipped back
    Uncorrected,
}

impl BlockReport {
    pub fn status(&self) -> BlockStatus {
        let intact = self.outcome.data == self.message;
        match self.outcome.correction {
            Correction::Unmatched => BlockStatus::Uncorrected,
            _ if !intact => BlockStatus::Miscorrected,
            Correction::Clean => BlockStatus::Ok,
            Correction::Corrected { .. } => BlockStatus::Corrected,
        }
    }
}

impl fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BlockStatus::Ok => "OK",
            BlockStatus::Corrected => "CORRECTED",
            BlockStatus::Miscorrected => "MISCORRECTED",
            BlockStatus::Uncorrected => "UNCORRECTED",
        };
        f.pad(label)
    }
}

/// One table row: original | encoded | noisy | decoded | status
impl fmt::Display for BlockReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<15} | {:<20} | {:<20} | {:<15} | {}",
            self.message,
            self.encoded,
            self.noisy,
            self.outcome.data,
            self.status()
        )
    }
}
