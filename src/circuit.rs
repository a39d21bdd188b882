use tracing::trace;

use crate::{bits, Ciphertext, Decryptor, Evaluator, HeError, Result};

/// Sum bits and carry out of a [BinaryAdderCircuit::add] run.
#[derive(Clone, Debug)]
pub struct AdderOutput {
    /// Sum bits, least significant first.
    pub sum: Vec<Ciphertext>,
    /// The final carry, i.e. the overflow bit.
    pub carry: Ciphertext,
}

impl AdderOutput {

    /// Decrypt to `width + 1` bits, least significant first, with the carry
    /// as the most significant bit.
    pub fn decrypt(&self, decryptor: &Decryptor) -> Vec<u8> {
        let mut bits = decryptor.decrypt_bits(&self.sum);
        bits.push(decryptor.decrypt(&self.carry));
        bits
    }

    /// Decrypt to a binary string, carry first.
    pub fn decrypt_to_string(&self, decryptor: &Decryptor) -> String {
        bits::to_binary_string(&self.decrypt(decryptor))
    }

}

/// Ripple-carry adder evaluated on ciphertexts.
///
/// Each position is a full adder built from XOR (ring addition) and AND
/// (ring multiplication):
///
/// ```text
/// sum   = a ^ b ^ c
/// carry = ((a ^ c) & (b ^ c)) ^ c
/// ```
///
/// The carry of one position feeds the next, so positions are evaluated
/// strictly in order and the circuit costs one multiplication per bit on the
/// carry path. Noise grows with every multiplication and is not checked;
/// wide operands eventually decrypt incorrectly.
pub struct BinaryAdderCircuit<'a> {
    evaluator: &'a Evaluator,
}

impl<'a> BinaryAdderCircuit<'a> {

    pub fn new(evaluator: &'a Evaluator) -> Self {
        Self {evaluator}
    }

    /// One full adder: returns `(sum, carry_out)`.
    pub fn full_adder(&self, a: &Ciphertext, b: &Ciphertext, carry_in: &Ciphertext) -> (Ciphertext, Ciphertext) {
        let evaluator = self.evaluator;
        let partial = evaluator.add_new(a, b);
        let sum = evaluator.add_new(&partial, carry_in);
        let t1 = evaluator.add_new(a, carry_in);
        let t2 = evaluator.add_new(b, carry_in);
        let carry_out = evaluator.add_new(&evaluator.multiply_new(&t1, &t2), carry_in);
        (sum, carry_out)
    }

    /// Add two equally wide operands, least significant bit first.
    ///
    /// `carry_in` is normally an encryption of 0. Operands of different width
    /// are rejected; pad the shorter one with encryptions of 0 first.
    pub fn add(&self, a: &[Ciphertext], b: &[Ciphertext], carry_in: &Ciphertext) -> Result<AdderOutput> {
        if a.len() != b.len() {
            return Err(HeError::WidthMismatch {left: a.len(), right: b.len()});
        }
        let mut carry = carry_in.clone();
        let mut sum = Vec::with_capacity(a.len());
        for (position, (x, y)) in a.iter().zip(b.iter()).enumerate() {
            trace!(position, "full adder");
            let (s, c) = self.full_adder(x, y, &carry);
            sum.push(s);
            carry = c;
        }
        Ok(AdderOutput {sum, carry})
    }

}
