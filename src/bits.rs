//! Packed bit-vector type shared by records, queries, and committed-bit sets.

use serde::{Deserialize, Serialize};

/// Fixed-layout bit-vector packed into 64-bit words.
///
/// Logical bit `64 * i + j` lives in bit `j` of `words[i]`. The vector is
/// conceptually infinite and zero-padded: reading past the last word yields
/// clear bits, and all operations treat operands of different word lengths
/// as if the shorter one were zero-extended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitVector {
    words: Vec<u64>,
}

impl BitVector {
    /// Create an empty vector (no bits set).
    pub fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Wrap an existing packed-word buffer.
    pub fn from_words(words: Vec<u64>) -> Self {
        Self { words }
    }

    /// Build a vector from a list of set bit positions.
    pub fn from_bits(bits: &[usize]) -> Self {
        let mut v = Self::new();
        for &bit in bits {
            v.set(bit);
        }
        v
    }

    /// The packed words backing this vector.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Test a single bit. Positions past the last word read as clear.
    #[inline]
    pub fn get(&self, bit: usize) -> bool {
        let chunk = bit / 64;
        match self.words.get(chunk) {
            Some(word) => word & (1u64 << (bit % 64)) != 0,
            None => false,
        }
    }

    /// Set a single bit, growing the word buffer as needed.
    #[inline]
    pub fn set(&mut self, bit: usize) {
        let chunk = bit / 64;
        if chunk >= self.words.len() {
            self.words.resize(chunk + 1, 0);
        }
        self.words[chunk] |= 1u64 << (bit % 64);
    }

    /// Bitwise OR of `other` into `self`.
    pub fn union_with(&mut self, other: &Self) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            *a |= b;
        }
    }

    /// True iff every bit set in `other` is also set in `self`.
    ///
    /// Equivalent to `(self | other) == self` under zero-extension of the
    /// shorter operand.
    #[inline]
    pub fn is_superset_of(&self, other: &Self) -> bool {
        let shared = self.words.len().min(other.words.len());
        for (a, b) in self.words[..shared].iter().zip(&other.words[..shared]) {
            if b & !a != 0 {
                return false;
            }
        }
        // Anything set beyond our last word cannot be covered.
        other.words[shared..].iter().all(|&w| w == 0)
    }

    /// True iff `self` and `other` share at least one set bit.
    pub fn intersects(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .any(|(a, b)| a & b != 0)
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Position of the highest set bit, or `None` if no bit is set.
    pub fn highest_set_bit(&self) -> Option<usize> {
        for (chunk, &word) in self.words.iter().enumerate().rev() {
            if word != 0 {
                return Some(chunk * 64 + 63 - word.leading_zeros() as usize);
            }
        }
        None
    }

    /// True iff no bit is set.
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }
}
