//! Multi-block transmission over a [`NoisyChannel`].
//!
//! Two pipelines are provided:
//! - bit strings typed by a user, padded with zeros to whole 4-bit blocks
//! - byte payloads (e.g. grayscale pixels), split into two nibbles per byte, high first
//!
//! Decoding is independent per block, so a batch of received codewords can be decoded in
//! parallel; with the `parallel` feature this uses rayon.

use crate::ecc::bits::{
    join_nibbles, pad_to_multiple, parse_bit_string, split_byte, Codeword, MessageBlock,
};
use crate::ecc::channel::{BlockReport, NoisyChannel};
use crate::ecc::hamming::{DecodeOutcome, HammingCodec, DATA_BITS};
use crate::ecc::Result;
use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of sending a bit string block by block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStringTransmission {
    /// Zeros appended to fill the last block
    pub padding: usize,
    pub blocks: Vec<BlockReport>,
}

impl BitStringTransmission {
    /// Received bits after correction, padding included
    pub fn decoded_bits(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.outcome.data.to_string())
            .collect()
    }

    /// Number of blocks with a non-zero syndrome
    pub fn errors_detected(&self) -> usize {
        self.blocks
            .iter()
            .filter(|block| block.outcome.error_detected())
            .count()
    }
}

/// Outcome of sending a byte payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteTransmission {
    /// What a receiver without correction would read: the first four bits of each noisy codeword
    pub noisy: Vec<u8>,
    /// Bytes rebuilt from the decoded blocks
    pub corrected: Vec<u8>,
    /// Codewords whose syndrome was non-zero
    pub errors_detected: usize,
}

impl ByteTransmission {
    /// Bytes of `corrected` that differ from `original`
    pub fn residual_errors(&self, original: &[u8]) -> usize {
        self.corrected
            .iter()
            .zip(original.iter())
            .filter(|(a, b)| a != b)
            .count()
    }
}

/// Decodes a batch of independent codewords, preserving order.
pub fn decode_all(codec: &HammingCodec, codewords: &[Codeword]) -> Vec<DecodeOutcome> {
    #[cfg(feature = "parallel")]
    {
        codewords.par_iter().map(|c| codec.decode(c)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        codewords.iter().map(|c| codec.decode(c)).collect()
    }
}

impl<R: Rng> NoisyChannel<R> {
    /// Sends a string of `0`/`1` characters, padding it to a multiple of four bits.
    pub fn transmit_bit_string(&mut self, input: &str) -> Result<BitStringTransmission> {
        let mut bits = parse_bit_string(input)?;
        let padding = pad_to_multiple(&mut bits, DATA_BITS);
        if padding > 0 {
            log::debug!("appended {} zero bit(s) to complete the last block", padding);
        }

        let blocks = bits
            .chunks_exact(DATA_BITS)
            .map(|chunk| MessageBlock::from_slice(chunk).map(|message| self.send(&message)))
            .collect::<Result<Vec<_>>>()?;

        Ok(BitStringTransmission { padding, blocks })
    }

    /// Sends a byte payload, two codewords per byte, and reassembles it on the far side.
    pub fn transmit_bytes(&mut self, data: &[u8]) -> ByteTransmission {
        let messages: Vec<MessageBlock> = data.iter().flat_map(|&byte| split_byte(byte)).collect();

        let received: Vec<Codeword> = messages
            .iter()
            .map(|message| {
                let encoded = self.codec().encode(message);
                self.transmit(&encoded)
            })
            .collect();

        let outcomes = decode_all(self.codec(), &received);
        for (message, outcome) in messages.iter().zip(outcomes.iter()) {
            self.record(message, outcome);
        }

        let noisy = received
            .chunks_exact(2)
            .map(|pair| {
                join_nibbles(
                    &pair[0].prefix::<DATA_BITS>(),
                    &pair[1].prefix::<DATA_BITS>(),
                )
            })
            .collect();
        let corrected = outcomes
            .chunks_exact(2)
            .map(|pair| join_nibbles(&pair[0].data, &pair[1].data))
            .collect();
        let errors_detected = outcomes.iter().filter(|o| o.error_detected()).count();

        log::debug!(
            "sent {} byte(s) as {} codewords, {} error(s) detected",
            data.len(),
            received.len(),
            errors_detected
        );

        ByteTransmission {
            noisy,
            corrected,
            errors_detected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecc::channel::{BlockStatus, ChannelConfig};
    use crate::error::Error;

    fn seeded(p: f64, seed: u64) -> NoisyChannel {
        NoisyChannel::new(ChannelConfig::new(p).unwrap().with_seed(seed)).unwrap()
    }

    /// A 100x100 grayscale gradient, the size the image flow resizes to
    fn gradient() -> Vec<u8> {
        (0..100 * 100).map(|i| ((i * 7) % 256) as u8).collect()
    }

    #[test]
    fn test_bit_string_without_noise() {
        let mut channel = seeded(0.0, 1);
        let report = channel.transmit_bit_string("10110001").unwrap();
        assert_eq!(report.padding, 0);
        assert_eq!(report.blocks.len(), 2);
        assert_eq!(report.decoded_bits(), "10110001");
        assert_eq!(report.errors_detected(), 0);
        assert_eq!(report.blocks[0].encoded.to_string(), "1011010");
        assert!(report.blocks.iter().all(|b| b.status() == BlockStatus::Ok));
    }

    #[test]
    fn test_bit_string_is_padded() {
        let mut channel = seeded(0.0, 1);
        let report = channel.transmit_bit_string("101").unwrap();
        assert_eq!(report.padding, 1);
        assert_eq!(report.blocks.len(), 1);
        assert_eq!(report.decoded_bits(), "1010");

        let report = channel.transmit_bit_string("").unwrap();
        assert_eq!(report.padding, 0);
        assert!(report.blocks.is_empty());
        assert_eq!(report.decoded_bits(), "");
    }

    #[test]
    fn test_bit_string_rejects_non_binary() {
        let mut channel = seeded(0.5, 1);
        assert!(matches!(
            channel.transmit_bit_string("10x1"),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(channel.stats().blocks, 0);
    }

    #[test]
    fn test_bit_string_with_heavy_noise() {
        let mut channel = seeded(1.0, 21);
        let input = "1011000111110000010";
        let report = channel.transmit_bit_string(input).unwrap();
        assert_eq!(report.padding, 1);
        assert_eq!(report.decoded_bits(), format!("{}0", input));
        assert_eq!(report.errors_detected(), report.blocks.len());
        for block in &report.blocks {
            assert_eq!(block.status(), BlockStatus::Corrected);
            assert_eq!(block.noisy.distance(&block.encoded), 1);
            let repaired = block.outcome.error_position().map(|p| block.noisy.flipped(p));
            assert_eq!(repaired, Some(block.encoded));
        }
    }

    #[test]
    fn test_bytes_are_recovered_exactly() {
        let data = gradient();
        let mut channel = seeded(0.15, 2024);
        let report = channel.transmit_bytes(&data);

        assert_eq!(report.corrected, data);
        assert_eq!(report.residual_errors(&data), 0);
        assert_eq!(report.noisy.len(), data.len());
        // Some flips land in the data bits and show up uncorrected
        assert!(report.noisy != data);

        let stats = channel.stats();
        assert_eq!(stats.blocks, data.len() * 2);
        assert_eq!(stats.bits_flipped, report.errors_detected);
        assert_eq!(stats.miscorrections, 0);
        let rate = report.errors_detected as f64 / stats.blocks as f64;
        approx::assert_abs_diff_eq!(rate, 0.15, epsilon = 0.02);
    }

    #[test]
    fn test_bytes_without_noise() {
        let mut channel = seeded(0.0, 0);
        let report = channel.transmit_bytes(b"luna");
        assert_eq!(report.noisy, b"luna");
        assert_eq!(report.corrected, b"luna");
        assert_eq!(report.errors_detected, 0);

        assert_eq!(channel.transmit_bytes(&[]), ByteTransmission::default());
    }

    #[test]
    fn test_bytes_are_reproducible() {
        let data = gradient();
        let a = seeded(0.4, 99).transmit_bytes(&data);
        let b = seeded(0.4, 99).transmit_bytes(&data);
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_all_preserves_order() {
        let codec = HammingCodec::new();
        let codewords: Vec<Codeword> = (0..16u32)
            .flat_map(|v| {
                let codeword = codec.encode(&MessageBlock::from_value(v));
                (0..7).map(move |p| codeword.flipped(p))
            })
            .collect();

        let outcomes = decode_all(&codec, &codewords);
        assert_eq!(outcomes.len(), codewords.len());
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.data, MessageBlock::from_value((i / 7) as u32));
            assert_eq!(outcome.error_position(), Some(i % 7));
        }
    }
}
