//! Hamming(7,4) channel codec.
//!
//! Hamming codes are a family of linear error-correcting codes developed by Richard Hamming
//! in 1950. The (7,4) member encodes 4 data bits into 7 bits by adding 3 parity bits, and can
//! correct any single flipped bit per codeword.
//!
//! This implementation works directly with the generator matrix `G` and parity-check matrix
//! `H` over GF(2):
//! - Encoding computes `m · G` with XOR-based dot products
//! - Decoding computes the syndrome `H · rᵀ` and looks up the flipped position in a table
//!   derived from the columns of `H`
//! - Noise injection flips at most one uniformly chosen bit per codeword
//!
//! The standard `G` is systematic: the first four codeword bits are the message itself.
//!
//! # Limitations
//!
//! Two or more flipped bits in one codeword produce a syndrome equal to that of some single
//! flip. The decoder then "corrects" the wrong bit and reports success. This is inherent to
//! the (7,4) code and is not detected here.
//!
//! # Examples
//!
//! ```
//! use hamming_channel::ecc::bits::MessageBlock;
//! use hamming_channel::ecc::hamming::{Correction, HammingCodec};
//!
//! let codec = HammingCodec::new();
//! let message = MessageBlock::new([1, 0, 1, 1]).unwrap();
//! let codeword = codec.encode(&message);
//!
//! let outcome = codec.decode(&codeword.flipped(2));
//! assert_eq!(outcome.data, message);
//! assert_eq!(outcome.correction, Correction::Corrected { position: 2 });
//! ```

use crate::ecc::bits::{join_nibbles, split_byte, Codeword, MessageBlock, Syndrome};
use crate::ecc::{ErrorCorrection, Result};
use crate::error::Error;
use rand::Rng;

/// Number of message bits per block
pub const DATA_BITS: usize = 4;
/// Number of bits per codeword
pub const CODE_BITS: usize = 7;
/// Number of parity (syndrome) bits
pub const PARITY_BITS: usize = 3;

/// Generator matrix type (4×7)
pub type GeneratorMatrix = [[u8; CODE_BITS]; DATA_BITS];
/// Parity-check matrix type (3×7)
pub type ParityCheckMatrix = [[u8; CODE_BITS]; PARITY_BITS];
/// Maps a syndrome value (0..8) to the codeword position whose flip produces it
pub type SyndromeTable = [Option<usize>; 1 << PARITY_BITS];

/// Standard generator matrix
pub const GENERATOR: GeneratorMatrix = [
    [1, 0, 0, 0, 1, 1, 0],
    [0, 1, 0, 0, 1, 0, 1],
    [0, 0, 1, 0, 0, 1, 1],
    [0, 0, 0, 1, 1, 1, 1],
];

/// Standard parity-check matrix, `G · Hᵀ = 0`
pub const PARITY_CHECK: ParityCheckMatrix = [
    [1, 1, 0, 1, 1, 0, 0],
    [1, 0, 1, 1, 0, 1, 0],
    [0, 1, 1, 1, 0, 0, 1],
];

/// What the decoder did with a received codeword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// Zero syndrome, nothing changed
    Clean,
    /// Non-zero syndrome matched a column of `H`; that bit was flipped back
    Corrected { position: usize },
    /// Non-zero syndrome with no table entry; the word is left as received
    Unmatched,
}

/// Result of decoding one codeword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOutcome {
    /// Recovered message bits
    pub data: MessageBlock,
    /// Raw syndrome of the received word
    pub syndrome: Syndrome,
    pub correction: Correction,
    /// Received word after correction
    pub corrected: Codeword,
}

impl DecodeOutcome {
    /// True whenever the syndrome was non-zero
    pub fn error_detected(&self) -> bool {
        !matches!(self.correction, Correction::Clean)
    }

    /// Position that was flipped back, if any
    pub fn error_position(&self) -> Option<usize> {
        match self.correction {
            Correction::Corrected { position } => Some(position),
            Correction::Clean | Correction::Unmatched => None,
        }
    }
}

/// Hamming(7,4) encoder/decoder.
///
/// Holds the two matrices and the derived syndrome table; all of it is read-only after
/// construction, so a codec can be shared between threads freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HammingCodec {
    generator: GeneratorMatrix,
    parity_check: ParityCheckMatrix,
    table: SyndromeTable,
}

impl HammingCodec {
    /// Creates the codec with the standard matrices
    pub fn new() -> Self {
        Self {
            generator: GENERATOR,
            parity_check: PARITY_CHECK,
            table: build_syndrome_table(&PARITY_CHECK),
        }
    }

    /// Creates a codec from caller-supplied matrices.
    ///
    /// # Arguments
    ///
    /// * `generator` - 4×7 generator matrix whose first four columns are the identity
    /// * `parity_check` - 3×7 parity-check matrix with seven distinct non-zero columns
    ///
    /// # Returns
    ///
    /// The codec, or `Error::MalformedMatrix` if the pair cannot correct single errors
    pub fn from_matrices(
        generator: GeneratorMatrix,
        parity_check: ParityCheckMatrix,
    ) -> Result<Self> {
        let binary = |rows: &[[u8; CODE_BITS]]| rows.iter().flatten().all(|&b| b <= 1);
        if !binary(&generator[..]) || !binary(&parity_check[..]) {
            return Err(Error::MalformedMatrix(
                "entries must be 0 or 1".to_string(),
            ));
        }

        for (i, row) in generator.iter().enumerate() {
            for (j, &bit) in row.iter().take(DATA_BITS).enumerate() {
                if bit != u8::from(i == j) {
                    return Err(Error::MalformedMatrix(
                        "generator must be systematic (identity in the first four columns)"
                            .to_string(),
                    ));
                }
            }
        }

        let mut seen = [false; 1 << PARITY_BITS];
        for position in 0..CODE_BITS {
            let column = column_value(&parity_check, position);
            if column == 0 {
                return Err(Error::MalformedMatrix(format!(
                    "parity-check column {} is zero",
                    position
                )));
            }
            if seen[column] {
                return Err(Error::MalformedMatrix(format!(
                    "parity-check column {} duplicates an earlier column",
                    position
                )));
            }
            seen[column] = true;
        }

        for (i, row) in generator.iter().enumerate() {
            if !syndrome_of(&parity_check, row).is_zero() {
                return Err(Error::MalformedMatrix(format!(
                    "generator row {} is not a codeword of the parity-check matrix",
                    i
                )));
            }
        }

        Ok(Self {
            generator,
            parity_check,
            table: build_syndrome_table(&parity_check),
        })
    }

    pub fn generator(&self) -> &GeneratorMatrix {
        &self.generator
    }

    pub fn parity_check(&self) -> &ParityCheckMatrix {
        &self.parity_check
    }

    pub fn syndrome_table(&self) -> &SyndromeTable {
        &self.table
    }

    /// Encodes a 4-bit message as `message · G (mod 2)`
    pub fn encode(&self, message: &MessageBlock) -> Codeword {
        let mut out = [0u8; CODE_BITS];
        for (j, bit) in out.iter_mut().enumerate() {
            *bit = message
                .bits()
                .iter()
                .zip(self.generator.iter())
                .fold(0, |acc, (&m, row)| acc ^ (m & row[j]));
        }
        Codeword::from_raw(out)
    }

    /// Computes `H · receivedᵀ (mod 2)`
    pub fn syndrome(&self, received: &Codeword) -> Syndrome {
        syndrome_of(&self.parity_check, received.bits())
    }

    /// Decodes a received codeword, correcting at most one flipped bit.
    ///
    /// The input is never modified; the corrected word is returned in the outcome.
    pub fn decode(&self, received: &Codeword) -> DecodeOutcome {
        let syndrome = self.syndrome(received);

        let (correction, corrected) = if syndrome.is_zero() {
            (Correction::Clean, *received)
        } else {
            match self.table[syndrome.value() as usize] {
                Some(position) => (Correction::Corrected { position }, received.flipped(position)),
                None => {
                    log::warn!(
                        "syndrome {} has no entry in the syndrome table, leaving {} uncorrected",
                        syndrome,
                        received
                    );
                    (Correction::Unmatched, *received)
                }
            }
        };

        DecodeOutcome {
            data: corrected.prefix::<DATA_BITS>(),
            syndrome,
            correction,
            corrected,
        }
    }

    /// Passes a codeword through the simplified binary symmetric channel.
    ///
    /// With probability `error_probability` one position, chosen uniformly among the seven,
    /// is flipped in a copy of `codeword`; otherwise the copy is returned unchanged.
    pub fn simulate_noise<R: Rng>(
        &self,
        codeword: &Codeword,
        error_probability: f64,
        rng: &mut R,
    ) -> Result<Codeword> {
        check_probability(error_probability)?;
        Ok(flip_at_most_one(codeword, error_probability, rng))
    }
}

impl Default for HammingCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte interface: every input byte becomes two codeword bytes, high nibble first,
/// each holding its 7 codeword bits MSB-first in the low bits.
impl ErrorCorrection for HammingCodec {
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data
            .iter()
            .flat_map(|&byte| split_byte(byte))
            .map(|nibble| HammingCodec::encode(self, &nibble).value() as u8)
            .collect())
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.len() % 2 != 0 {
            return Err(Error::InvalidInput(format!(
                "encoded data must hold two codewords per byte, got {} codewords",
                data.len()
            )));
        }

        let codeword = |byte: u8| {
            if byte >= 0x80 {
                return Err(Error::InvalidInput(format!(
                    "codeword byte {:#04x} uses more than 7 bits",
                    byte
                )));
            }
            Ok(Codeword::from_value(u32::from(byte)))
        };

        data.chunks_exact(2)
            .map(|pair| {
                let high = HammingCodec::decode(self, &codeword(pair[0])?).data;
                let low = HammingCodec::decode(self, &codeword(pair[1])?).data;
                Ok(join_nibbles(&high, &low))
            })
            .collect()
    }
}

/// Rejects probabilities that are NaN or outside [0, 1]
pub(crate) fn check_probability(p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(Error::InvalidProbability(p))
    }
}

/// Noise model for a probability already known to be valid
pub(crate) fn flip_at_most_one<R: Rng>(codeword: &Codeword, p: f64, rng: &mut R) -> Codeword {
    if rng.gen_bool(p) {
        codeword.flipped(rng.gen_range(0..CODE_BITS))
    } else {
        *codeword
    }
}

/// Column `position` of `H` as a 3-bit value, row 0 most significant
fn column_value(parity_check: &ParityCheckMatrix, position: usize) -> usize {
    parity_check
        .iter()
        .fold(0, |acc, row| (acc << 1) | usize::from(row[position]))
}

fn syndrome_of(parity_check: &ParityCheckMatrix, word: &[u8; CODE_BITS]) -> Syndrome {
    let mut out = [0u8; PARITY_BITS];
    for (bit, row) in out.iter_mut().zip(parity_check.iter()) {
        *bit = row.iter().zip(word.iter()).fold(0, |acc, (&h, &r)| acc ^ (h & r));
    }
    Syndrome::from_raw(out)
}

fn build_syndrome_table(parity_check: &ParityCheckMatrix) -> SyndromeTable {
    let mut table = [None; 1 << PARITY_BITS];
    for position in 0..CODE_BITS {
        table[column_value(parity_check, position)] = Some(position);
    }
    // A zero column would otherwise claim the no-error slot
    table[0] = None;
    table
}

/// Creates a standard Hamming(7,4) codec
pub fn create_hamming_7_4() -> HammingCodec {
    HammingCodec::new()
}
