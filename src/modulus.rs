use std::cmp::Ordering;

use crate::util;

/// Represent an integer modulus of up to 61 bits.
///
/// An instance of the Modulus class represents the prime `q` the ring
/// `Z_q[X]/(X^N + 1)` is defined over. Besides the value it caches the
/// bit count and the primality of `q`, which [RingParameters](crate::RingParameters)
/// checks on construction.
#[derive(Debug, Eq, Clone, Copy, Default)]
pub struct Modulus {
    value: u64,
    bit_count: usize,
    is_prime: bool,
}

impl Ord for Modulus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for Modulus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Modulus {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Modulus {

    /// Create a new Modulus instance with the given value.
    ///
    /// Panics if the value is 1 or wider than 61 bits.
    pub fn new(value: u64) -> Self {
        if value == 0 {
            return Self::default();
        }
        if (value >> util::HE_MOD_BIT_COUNT_MAX != 0) || (value == 1) {
            panic!("[Invalid argument] Value can be at most 61-bit and cannot be 1.");
        }
        let mut ret = Modulus {
            value,
            bit_count: util::get_significant_bit_count(value),
            is_prime: false,
        };
        ret.is_prime = util::is_prime(&ret);
        ret
    }

    /// Reduce a [u64] modulo the modulus.
    #[inline]
    pub fn reduce(&self, value: u64) -> u64 {
        if value < self.value {value} else {value % self.value}
    }

    /// Reduce a [u128] modulo the modulus.
    #[inline]
    pub fn reduce_u128(&self, value: u128) -> u64 {
        (value % self.value as u128) as u64
    }

    /// Map a signed integer to its residue in `[0, q)`.
    #[inline]
    pub fn reduce_i64(&self, value: i64) -> u64 {
        let q = self.value as i128;
        (((value as i128 % q) + q) % q) as u64
    }

    /// Centered representative of a residue: values above `q/2` map to `r - q`.
    #[inline]
    pub fn center(&self, residue: u64) -> i64 {
        let half = self.value / 2;
        if residue > half {
            residue as i64 - self.value as i64
        } else {
            residue as i64
        }
    }

    /// The [u64] value.
    pub fn value(&self) -> u64 {self.value}
    /// Is the value a prime number?
    pub fn is_prime(&self) -> bool {self.is_prime}
    /// Is the value zero?
    pub fn is_zero(&self) -> bool {self.value == 0}
    /// How many bits are there in the modulus?
    pub fn bit_count(&self) -> usize {self.bit_count}

}

impl std::fmt::Display for Modulus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Modulus ({})", self.value)
    }
}
