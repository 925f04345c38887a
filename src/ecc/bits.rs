//! Fixed-width bit blocks and the bit/integer conversions the codec's callers rely on.
//!
//! Every conversion here is most-significant-bit first: bit 0 of a block or of a
//! returned sequence is the highest-order bit of the corresponding integer.
//!
//! # Examples
//!
//! ```
//! use hamming_channel::ecc::bits::{bits_to_value, value_to_bits};
//!
//! assert_eq!(value_to_bits(5u8, 4), vec![0, 1, 0, 1]);
//! assert_eq!(bits_to_value::<u8>(&[0, 1, 0, 1]).unwrap(), 5);
//! ```

use crate::ecc::Result;
use crate::error::Error;
use bitvec::prelude::*;
use num_traits::{PrimInt, Unsigned};
use std::fmt;
use std::ops::Index;

/// A block of exactly `N` bits, each stored as a `u8` holding 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitBlock<const N: usize>([u8; N]);

/// 4-bit unit of input data
pub type MessageBlock = BitBlock<4>;

/// 7-bit unit sent over the channel
pub type Codeword = BitBlock<7>;

/// 3-bit result of applying the parity-check matrix to a received word
pub type Syndrome = BitBlock<3>;

impl<const N: usize> BitBlock<N> {
    /// Number of bits in the block
    pub const WIDTH: usize = N;

    /// Creates a block after checking that every entry is 0 or 1
    pub fn new(bits: [u8; N]) -> Result<Self> {
        if let Some((index, &value)) = bits.iter().enumerate().find(|&(_, &b)| b > 1) {
            return Err(Error::InvalidBit { index, value });
        }
        Ok(Self(bits))
    }

    /// Creates a block from a slice, rejecting any width other than `N`
    pub fn from_slice(bits: &[u8]) -> Result<Self> {
        let array = <[u8; N]>::try_from(bits).map_err(|_| Error::InvalidLength {
            expected: N,
            actual: bits.len(),
        })?;
        Self::new(array)
    }

    /// Creates a block from the low `N` bits of `value`, most significant first
    pub fn from_value(value: u32) -> Self {
        let mut bits = [0u8; N];
        for (i, bit) in bits.iter_mut().enumerate() {
            let shift = N - 1 - i;
            if shift < u32::BITS as usize {
                *bit = ((value >> shift) & 1) as u8;
            }
        }
        Self(bits)
    }

    /// All-zero block
    pub const fn zero() -> Self {
        Self([0; N])
    }

    /// Wraps bits already known to be binary.
    pub(crate) const fn from_raw(bits: [u8; N]) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> &[u8; N] {
        &self.0
    }

    pub fn into_bits(self) -> [u8; N] {
        self.0
    }

    /// Interprets the block as an MSB-first integer
    pub fn value(&self) -> u32 {
        self.0
            .iter()
            .fold(0u32, |acc, &bit| acc.wrapping_shl(1) | u32::from(bit))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Number of set bits
    pub fn weight(&self) -> usize {
        self.0.iter().filter(|&&b| b == 1).count()
    }

    /// Number of positions at which `self` and `other` differ
    pub fn distance(&self, other: &Self) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Returns a copy with the bit at `position` inverted.
    ///
    /// # Panics
    ///
    /// Panics if `position >= N`.
    pub fn flipped(&self, position: usize) -> Self {
        let mut bits = self.0;
        bits[position] ^= 1;
        Self(bits)
    }

    /// Returns the first `M` bits as a new block.
    ///
    /// # Panics
    ///
    /// Panics if `M > N`.
    pub fn prefix<const M: usize>(&self) -> BitBlock<M> {
        let mut bits = [0u8; M];
        bits.copy_from_slice(&self.0[..M]);
        BitBlock(bits)
    }
}

impl<const N: usize> Default for BitBlock<N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize> Index<usize> for BitBlock<N> {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.0[index]
    }
}

impl<const N: usize> AsRef<[u8]> for BitBlock<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> TryFrom<&[u8]> for BitBlock<N> {
    type Error = Error;

    fn try_from(bits: &[u8]) -> Result<Self> {
        Self::from_slice(bits)
    }
}

impl<const N: usize> TryFrom<[u8; N]> for BitBlock<N> {
    type Error = Error;

    fn try_from(bits: [u8; N]) -> Result<Self> {
        Self::new(bits)
    }
}

impl<const N: usize> fmt::Display for BitBlock<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: String = self
            .0
            .iter()
            .map(|&b| if b == 1 { '1' } else { '0' })
            .collect();
        // pad() so width/alignment flags apply to table output
        f.pad(&rendered)
    }
}

fn bit_capacity<T: PrimInt>() -> usize {
    T::zero().count_zeros() as usize
}

/// Expands `value` into `width` bits, most significant first.
///
/// Only the low `width` bits of `value` are kept. A `width` larger than the bit
/// width of `T` yields leading zeros.
pub fn value_to_bits<T: PrimInt + Unsigned>(value: T, width: usize) -> Vec<u8> {
    let capacity = bit_capacity::<T>();
    (0..width)
        .rev()
        .map(|shift| {
            if shift < capacity {
                u8::from((value >> shift) & T::one() == T::one())
            } else {
                0
            }
        })
        .collect()
}

/// Interprets an MSB-first bit sequence as an unsigned integer.
///
/// Leading zeros are ignored when checking that the value fits in `T`; an empty
/// sequence is zero.
pub fn bits_to_value<T: PrimInt + Unsigned>(bits: &[u8]) -> Result<T> {
    if let Some((index, &value)) = bits.iter().enumerate().find(|&(_, &b)| b > 1) {
        return Err(Error::InvalidBit { index, value });
    }

    let capacity = bit_capacity::<T>();
    let significant = bits.iter().skip_while(|&&b| b == 0).count();
    if significant > capacity {
        return Err(Error::Overflow {
            bits: significant,
            capacity,
        });
    }

    Ok(bits
        .iter()
        .skip(bits.len() - significant)
        .fold(T::zero(), |acc, &bit| {
            let next = if bit == 1 { T::one() } else { T::zero() };
            (acc << 1) | next
        }))
}

/// Splits a byte into its high and low nibbles, in that order.
pub fn split_byte(byte: u8) -> [MessageBlock; 2] {
    let bits = byte.view_bits::<Msb0>();
    let nibble = |half: &BitSlice<u8, Msb0>| {
        let mut out = [0u8; 4];
        for (slot, bit) in out.iter_mut().zip(half.iter()) {
            *slot = u8::from(*bit);
        }
        MessageBlock::from_raw(out)
    };
    [nibble(&bits[..4]), nibble(&bits[4..])]
}

/// Reassembles a byte from its high and low nibbles.
pub fn join_nibbles(high: &MessageBlock, low: &MessageBlock) -> u8 {
    let mut byte = 0u8;
    let bits = byte.view_bits_mut::<Msb0>();
    for (i, &bit) in high.bits().iter().chain(low.bits().iter()).enumerate() {
        bits.set(i, bit == 1);
    }
    byte
}

/// Parses a string of `0` and `1` characters into bits.
pub fn parse_bit_string(input: &str) -> Result<Vec<u8>> {
    input
        .chars()
        .enumerate()
        .map(|(i, c)| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            other => Err(Error::InvalidInput(format!(
                "character {:?} at position {} is not a binary digit",
                other, i
            ))),
        })
        .collect()
}

/// Appends zeros until the length is a multiple of `block`; returns how many were added.
pub fn pad_to_multiple(bits: &mut Vec<u8>, block: usize) -> usize {
    let remainder = bits.len() % block;
    if remainder == 0 {
        return 0;
    }
    let padding = block - remainder;
    bits.resize(bits.len() + padding, 0);
    padding
}
