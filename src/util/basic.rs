pub const HE_MOD_BIT_COUNT_MAX: usize = 61;

pub const HE_POLY_MOD_DEGREE_MAX: usize = 131072;
pub const HE_POLY_MOD_DEGREE_MIN: usize = 2;

pub const HE_PRNG_SEED_BYTES: usize = 64;

/// Retry budget used by [crate::RetryPolicy::default].
pub const HE_KEYGEN_ATTEMPTS_DEFAULT: usize = 1000;

#[inline]
pub fn get_significant_bit_count(value: u64) -> usize {
    if value == 0 {0}
    else {64 - value.leading_zeros() as usize}
}

#[inline]
pub fn get_power_of_two(value: u64) -> isize {
    if value == 0 || (value & (value - 1)) != 0 {-1}
    else {63 - value.leading_zeros() as isize}
}

#[inline]
pub fn reverse_bits_u64(operand: u64, bit_count: usize) -> u64 {
    if bit_count == 0 {
        0
    } else {
        operand.reverse_bits() >> (64 - bit_count)
    }
}

#[inline]
pub fn multiply_u64_high_word(operand1: u64, operand2: u64) -> u64 {
    ((operand1 as u128 * operand2 as u128) >> 64) as u64
}
