use std::sync::Arc;

use rand::Rng;

use crate::{
    util,
    Ciphertext, CombinedSecretKey, Coefficient, HeContext, Plaintext, PublicKey, RingElement, ValCheck,
};

/// Encrypts bits into [Ciphertext] objects under one party's [PublicKey].
///
/// Every encryption samples its own `s` and `e` from a fresh randomness stream
/// of the [HeContext], so ciphertexts never share noise.
///
/// ```rust
/// use mkfhe::*;
/// let context = HeContext::from_preset(ParameterPreset::Headroom).unwrap();
/// let keypair = KeyGenerator::new(context.clone())
///     .generate_keypair_with_retry(&RetryPolicy::default()).unwrap();
/// let encryptor = Encryptor::new(context.clone(), keypair.public_key().clone());
/// let decryptor = Decryptor::new(context, keypair.private_key().into());
/// assert_eq!(1, decryptor.decrypt(&encryptor.encrypt(1)));
/// ```
pub struct Encryptor {
    context: Arc<HeContext>,
    public_key: PublicKey,
}

impl Encryptor {

    /// Creates a new Encryptor object.
    /// Panics if the public key was generated under different ring parameters.
    pub fn new(context: Arc<HeContext>, public_key: PublicKey) -> Self {
        if !public_key.is_valid_for(&context) {
            panic!("[Invalid argument] Public key not valid for HE context.");
        }
        Self {context, public_key}
    }

    /// Get the public key used by the encryptor.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn context(&self) -> &Arc<HeContext> {
        &self.context
    }

    /// Encrypt one bit. Panics unless `bit` is 0 or 1.
    pub fn encrypt(&self, bit: u8) -> Ciphertext {
        let mut rng = self.context.create_random_generator();
        self.encrypt_with_rng(bit, &mut rng)
    }

    /// Encrypt each bit independently.
    pub fn encrypt_bits(&self, bits: &[u8]) -> Vec<Ciphertext> {
        bits.iter().map(|&bit| self.encrypt(bit)).collect()
    }

    /// Encrypt one bit drawing `s` and `e` from `rng`.
    pub fn encrypt_with_rng<R: Rng + ?Sized>(&self, bit: u8, rng: &mut R) -> Ciphertext {
        let ring = self.context.ring();
        let gaussian = self.context.gaussian();
        let plain = Plaintext::from_bit(ring, bit);
        let s = RingElement::<Coefficient>::sample_small(ring, gaussian, rng);
        let e = RingElement::<Coefficient>::sample_small(ring, gaussian, rng);

        // c = h * s + (2e + m)
        let masked = self.public_key.as_element() * &s.to_evaluation();
        let noisy_message = &e.scalar_mul(2) + plain.as_element();
        Ciphertext::new(&masked + &noisy_message.to_evaluation())
    }

}

/// Decrypts [Ciphertext] objects with the [CombinedSecretKey] of every party
/// whose key contributed to them.
///
/// Decryption multiplies by the key, returns to the coefficient domain and
/// reads the parity of the centered coefficient 0. The result is correct as
/// long as that coefficient, the accumulated noise, stays below roughly `q/4`
/// in magnitude. Nothing tracks or enforces this: a ciphertext past the bound
/// simply decrypts to a wrong bit. [Decryptor::noise_magnitude] and
/// [Decryptor::noise_budget_bits] report the current value for diagnostics.
pub struct Decryptor {
    context: Arc<HeContext>,
    secret_key: CombinedSecretKey,
}

impl Decryptor {

    /// Creates a new Decryptor.
    /// Panics if the key was generated under different ring parameters.
    pub fn new(context: Arc<HeContext>, secret_key: CombinedSecretKey) -> Self {
        if !secret_key.is_valid_for(&context) {
            panic!("[Invalid argument] Secret key not valid for HE context.");
        }
        Self {context, secret_key}
    }

    pub fn secret_key(&self) -> &CombinedSecretKey {
        &self.secret_key
    }

    fn check_ciphertext(&self, encrypted: &Ciphertext) {
        if !encrypted.is_valid_for(&self.context) {
            panic!("[Invalid argument] Ciphertext not valid for HE context.");
        }
    }

    fn raw_decrypt(&self, encrypted: &Ciphertext) -> RingElement<Coefficient> {
        self.check_ciphertext(encrypted);
        (encrypted.as_element() * self.secret_key.as_element()).to_coefficient()
    }

    /// Decrypt to a bit.
    pub fn decrypt(&self, encrypted: &Ciphertext) -> u8 {
        let centered = self.raw_decrypt(encrypted).centered(0);
        centered.rem_euclid(2) as u8
    }

    pub fn decrypt_bits(&self, encrypted: &[Ciphertext]) -> Vec<u8> {
        encrypted.iter().map(|c| self.decrypt(c)).collect()
    }

    /// Infinity norm of `c * sk` in the coefficient domain.
    pub fn noise_magnitude(&self, encrypted: &Ciphertext) -> u64 {
        self.raw_decrypt(encrypted).infinity_norm()
    }

    /// Bits left between the noise magnitude and `q/4`. Zero means the
    /// ciphertext may already decrypt incorrectly.
    pub fn noise_budget_bits(&self, encrypted: &Ciphertext) -> usize {
        let bound = self.context.ring().modulus().value() >> 2;
        let noise = self.noise_magnitude(encrypted);
        util::get_significant_bit_count(bound).saturating_sub(util::get_significant_bit_count(noise))
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyGenerator, ParameterPreset, RetryPolicy, KeyPair};

    fn keypair(context: &Arc<HeContext>) -> KeyPair {
        KeyGenerator::new(context.clone()).generate_keypair_with_retry(&RetryPolicy::default()).unwrap()
    }

    #[test]
    fn test_round_trip_exact() {
        let context = HeContext::from_preset_with_seed(ParameterPreset::Headroom, 21).unwrap();
        let keypair = keypair(&context);
        let encryptor = Encryptor::new(context.clone(), keypair.public_key().clone());
        let decryptor = Decryptor::new(context.clone(), keypair.private_key().into());
        for trial in 0..200 {
            let bit = (trial % 2) as u8;
            assert_eq!(bit, decryptor.decrypt(&encryptor.encrypt(bit)));
        }
        let bits = vec![1, 0, 0, 1, 1];
        assert_eq!(bits, decryptor.decrypt_bits(&encryptor.encrypt_bits(&bits)));
    }

    #[test]
    fn test_round_trip_failure_rate() {
        let context = HeContext::from_preset_with_seed(ParameterPreset::Demo, 22).unwrap();
        let mut failures = 0;
        let trials = 300;
        for trial in 0..trials {
            let keypair = keypair(&context);
            let encryptor = Encryptor::new(context.clone(), keypair.public_key().clone());
            let decryptor = Decryptor::new(context.clone(), keypair.private_key().into());
            let bit = (trial % 2) as u8;
            if decryptor.decrypt(&encryptor.encrypt(bit)) != bit {
                failures += 1;
            }
        }
        assert!(failures * 20 <= trials, "{} failures out of {}", failures, trials);
    }

    #[test]
    fn test_fresh_noise_per_encryption() {
        let context = HeContext::from_preset_with_seed(ParameterPreset::Headroom, 23).unwrap();
        let keypair = keypair(&context);
        let encryptor = Encryptor::new(context, keypair.public_key().clone());
        assert_ne!(encryptor.encrypt(0), encryptor.encrypt(0));
    }

    #[test]
    fn test_noise_diagnostics() {
        let context = HeContext::from_preset_with_seed(ParameterPreset::Headroom, 24).unwrap();
        let keypair = keypair(&context);
        let encryptor = Encryptor::new(context.clone(), keypair.public_key().clone());
        let decryptor = Decryptor::new(context.clone(), keypair.private_key().into());
        let cipher = encryptor.encrypt(1);
        let noise = decryptor.noise_magnitude(&cipher);
        assert!(noise > 0);
        assert!(noise < context.ring().modulus().value() / 4);
        assert!(decryptor.noise_budget_bits(&cipher) > 0);
    }

    #[test]
    #[should_panic]
    fn test_encrypt_rejects_non_bit() {
        let context = HeContext::from_preset_with_seed(ParameterPreset::Demo, 25).unwrap();
        let keypair = keypair(&context);
        Encryptor::new(context, keypair.public_key().clone()).encrypt(2);
    }

    #[test]
    #[should_panic]
    fn test_decrypt_rejects_foreign_ciphertext() {
        let context = HeContext::from_preset_with_seed(ParameterPreset::Demo, 26).unwrap();
        let other = HeContext::from_preset_with_seed(ParameterPreset::Headroom, 26).unwrap();
        let decryptor = Decryptor::new(context.clone(), keypair(&context).private_key().into());
        let cipher = Encryptor::new(other.clone(), keypair(&other).public_key().clone()).encrypt(1);
        decryptor.decrypt(&cipher);
    }
}
