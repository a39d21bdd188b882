use std::sync::Arc;

use crate::{Coefficient, Evaluation, ParmsID, RingElement, RingParameters};

/// Struct to store a plaintext bit.
///
/// The plaintext is the constant polynomial `m` whose coefficient 0 holds the
/// bit; every other coefficient is zero. It is kept in the coefficient
/// domain, where the message is read back after decryption.
///
/// See [Ciphertext] for the class that stores ciphertexts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plaintext {
    element: RingElement<Coefficient>,
}

impl Plaintext {

    /// Encode a bit. Panics unless `bit` is 0 or 1.
    pub fn from_bit(ring: &Arc<RingParameters>, bit: u8) -> Self {
        if bit > 1 {
            panic!("[Invalid argument] Plaintext bit must be 0 or 1, got {}.", bit);
        }
        let mut element = RingElement::zero(ring);
        element.set(0, bit as u64);
        Self {element}
    }

    /// The encoded bit.
    pub fn bit(&self) -> u8 {
        (self.element[0] & 1) as u8
    }

    /// The [ParmsID] of the ring the plaintext lives in.
    pub fn parms_id(&self) -> &ParmsID {
        self.element.ring().parms_id()
    }

    /// The inner ring element.
    pub fn as_element(&self) -> &RingElement<Coefficient> {
        &self.element
    }

}

/// Struct to store a ciphertext of one bit.
///
/// A ciphertext is a single ring element `c = h * s + 2e + m` held in the
/// evaluation domain, where `h` is the public key of the encrypting party,
/// `s` and `e` are fresh small-norm elements and `m` the plaintext.
/// Ciphertexts under different parties' keys can be added and multiplied
/// together; the result decrypts under the product of those parties' keys.
///
/// - See [Encryptor](crate::Encryptor) for the class that produces ciphertexts.
/// - See [Evaluator](crate::Evaluator) for the class that computes on them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext {
    element: RingElement<Evaluation>,
}

impl Ciphertext {

    /// Wrap an evaluation-domain element.
    pub fn new(element: RingElement<Evaluation>) -> Self {
        Self {element}
    }

    /// The [ParmsID] of the ring the ciphertext lives in.
    pub fn parms_id(&self) -> &ParmsID {
        self.element.ring().parms_id()
    }

    pub fn ring(&self) -> &Arc<RingParameters> {
        self.element.ring()
    }

    /// The inner ring element.
    pub fn as_element(&self) -> &RingElement<Evaluation> {
        &self.element
    }

    /// The inner ring element.
    pub fn as_element_mut(&mut self) -> &mut RingElement<Evaluation> {
        &mut self.element
    }

    pub fn into_element(self) -> RingElement<Evaluation> {
        self.element
    }

}

impl From<RingElement<Evaluation>> for Ciphertext {
    fn from(element: RingElement<Evaluation>) -> Self {
        Self::new(element)
    }
}
