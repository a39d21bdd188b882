//! Plain bit vectors: parsing, formatting and the reference computations the
//! homomorphic circuits are checked against.
//!
//! Vectors are least-significant bit first. Strings are most-significant
//! digit first, the way numbers are written.

use itertools::Itertools;
use rand::Rng;

use crate::{HeError, Result};

/// Parse a binary string. Surrounding whitespace is ignored; an empty string
/// is the empty vector.
pub fn parse_binary(text: &str) -> Result<Vec<u8>> {
    text.trim().chars().rev()
        .map(|c| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            other => Err(HeError::InvalidBinaryDigit(other)),
        })
        .collect()
}

pub fn to_binary_string(bits: &[u8]) -> String {
    bits.iter().rev().map(|&b| if b & 1 == 1 {'1'} else {'0'}).collect()
}

/// Zero-extend on the most significant side up to `len` bits.
pub fn pad_to(bits: &mut Vec<u8>, len: usize) {
    if bits.len() < len {
        bits.resize(len, 0);
    }
}

/// Strip leading zeros from a binary string, keeping at least one digit.
pub fn trim_leading_zeros(text: &str) -> &str {
    let trimmed = text.trim_start_matches('0');
    if trimmed.is_empty() && !text.is_empty() {
        &text[text.len() - 1..]
    } else {
        trimmed
    }
}

/// Ripple-carry addition without encryption. The result has one bit more
/// than the longer operand; the last bit is the carry out.
pub fn plain_add(a: &[u8], b: &[u8]) -> Vec<u8> {
    let width = a.len().max(b.len());
    let mut carry = 0u8;
    let mut sum = Vec::with_capacity(width + 1);
    for i in 0..width {
        let x = a.get(i).copied().unwrap_or(0) & 1;
        let y = b.get(i).copied().unwrap_or(0) & 1;
        sum.push(x ^ y ^ carry);
        carry = (x & y) | (carry & (x ^ y));
    }
    sum.push(carry);
    sum
}

/// Position-wise XOR of several equally long bit vectors.
pub fn plain_xor_columns(rows: &[Vec<u8>]) -> Result<Vec<u8>> {
    let width = rows.first().map_or(0, |r| r.len());
    if let Some(row) = rows.iter().find(|r| r.len() != width) {
        return Err(HeError::WidthMismatch {left: width, right: row.len()});
    }
    Ok((0..width)
        .map(|i| rows.iter().fold(0, |acc, row| acc ^ (row[i] & 1)))
        .collect())
}

pub fn random_bits<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen_range(0..=1u8)).collect()
}

/// Render a bit vector as `[b0, b1, ...]`, least significant first.
pub fn format_bits(bits: &[u8]) -> String {
    format!("[{}]", bits.iter().join(", "))
}
