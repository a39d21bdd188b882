use std::sync::Arc;

use crate::{Ciphertext, HeContext, HeError, Result, ValCheck};

/// Provides operations on [Ciphertext] objects.
///
/// Ciphertexts are single ring elements in the evaluation domain, so the
/// homomorphic operations are the ring operations themselves. Under the
/// product of the contributing parties' keys, addition acts on the plaintext
/// bits as XOR and multiplication as AND:
///
/// - `Dec(sk1 * sk2, Enc(pk1, a) + Enc(pk2, b)) = a ^ b`
/// - `Dec(sk1 * sk2, Enc(pk1, a) * Enc(pk2, b)) = a & b`
///
/// Both hold only while the noise stays below the decryption bound, which is
/// neither tracked nor enforced. A product of ciphertexts decrypts under the
/// product of the keys they were made with; multiplying two ciphertexts of
/// the same party therefore needs keys close to 1 to stay decryptable under
/// the combined key (see [ParameterPreset::Toy](crate::ParameterPreset::Toy)).
///
/// ## Inplace and new variants
/// Every operation comes in a variant that returns a new ciphertext and one
/// that overwrites a caller-owned destination. Inputs are never modified.
pub struct Evaluator {
    context: Arc<HeContext>,
}

impl Evaluator {

    /// Create a evaluator with the specified [HeContext].
    pub fn new(context: Arc<HeContext>) -> Self {
        Self {context}
    }

    pub fn context(&self) -> &Arc<HeContext> {
        &self.context
    }

    pub(crate) fn check_ciphertext(&self, ciphertext: &Ciphertext) {
        if !ciphertext.is_valid_for(self.context.as_ref()) {
            panic!("[Invalid argument] Ciphertext is not valid for encryption parameters.");
        }
    }

    /// Homomorphic XOR.
    pub fn add_new(&self, encrypted1: &Ciphertext, encrypted2: &Ciphertext) -> Ciphertext {
        self.check_ciphertext(encrypted1);
        self.check_ciphertext(encrypted2);
        Ciphertext::new(encrypted1.as_element() + encrypted2.as_element())
    }

    /// Homomorphic AND.
    pub fn multiply_new(&self, encrypted1: &Ciphertext, encrypted2: &Ciphertext) -> Ciphertext {
        self.check_ciphertext(encrypted1);
        self.check_ciphertext(encrypted2);
        Ciphertext::new(encrypted1.as_element() * encrypted2.as_element())
    }

    pub fn add_inplace(&self, destination: &mut Ciphertext, encrypted: &Ciphertext) {
        *destination = self.add_new(destination, encrypted);
    }

    pub fn multiply_inplace(&self, destination: &mut Ciphertext, encrypted: &Ciphertext) {
        *destination = self.multiply_new(destination, encrypted);
    }

    /// Ring sum of all operands. Panics on an empty slice.
    pub fn add_many_new(&self, operands: &[Ciphertext]) -> Ciphertext {
        let (first, rest) = match operands.split_first() {
            Some(split) => split,
            None => panic!("[Invalid argument] Operands list is empty."),
        };
        self.check_ciphertext(first);
        rest.iter().fold(first.clone(), |acc, c| self.add_new(&acc, c))
    }

    /// Position-wise ring sum of several parties' bit vectors, the encrypted
    /// XOR of all of them. Used to derive a shared random seed that no
    /// single party knows in advance.
    pub fn xor_columns(&self, rows: &[Vec<Ciphertext>]) -> Result<Vec<Ciphertext>> {
        let width = rows.first().map_or(0, |r| r.len());
        if let Some(row) = rows.iter().find(|r| r.len() != width) {
            return Err(HeError::WidthMismatch {left: width, right: row.len()});
        }
        Ok((0..width)
            .map(|i| {
                let column: Vec<Ciphertext> = rows.iter().map(|row| row[i].clone()).collect();
                self.add_many_new(&column)
            })
            .collect())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CombinedSecretKey, Decryptor, Encryptor, KeyGenerator, ParameterPreset, RetryPolicy};

    struct TwoParty {
        evaluator: Evaluator,
        encryptors: [Encryptor; 2],
        decryptor: Decryptor,
    }

    fn two_party(seed: u64) -> TwoParty {
        let context = HeContext::from_preset_with_seed(ParameterPreset::Headroom, seed).unwrap();
        let keygen = KeyGenerator::new(context.clone());
        let policy = RetryPolicy::default();
        let k1 = keygen.generate_keypair_with_retry(&policy).unwrap();
        let k2 = keygen.generate_keypair_with_retry(&policy).unwrap();
        let combined = CombinedSecretKey::combine([k1.private_key(), k2.private_key()]).unwrap();
        TwoParty {
            evaluator: Evaluator::new(context.clone()),
            encryptors: [
                Encryptor::new(context.clone(), k1.public_key().clone()),
                Encryptor::new(context.clone(), k2.public_key().clone()),
            ],
            decryptor: Decryptor::new(context, combined),
        }
    }

    #[test]
    fn test_two_party_xor_and() {
        let setup = two_party(31);
        for a in 0..2u8 {
            for b in 0..2u8 {
                let c1 = setup.encryptors[0].encrypt(a);
                let c2 = setup.encryptors[1].encrypt(b);
                let sum = setup.evaluator.add_new(&c1, &c2);
                let product = setup.evaluator.multiply_new(&c1, &c2);
                assert_eq!(a ^ b, setup.decryptor.decrypt(&sum));
                assert_eq!(a & b, setup.decryptor.decrypt(&product));
            }
        }
    }

    #[test]
    fn test_commutativity() {
        let setup = two_party(32);
        for (a, b) in [(0, 1), (1, 1), (1, 0)] {
            let c1 = setup.encryptors[0].encrypt(a);
            let c2 = setup.encryptors[1].encrypt(b);
            assert_eq!(
                setup.decryptor.decrypt(&setup.evaluator.add_new(&c1, &c2)),
                setup.decryptor.decrypt(&setup.evaluator.add_new(&c2, &c1)),
            );
            assert_eq!(
                setup.decryptor.decrypt(&setup.evaluator.multiply_new(&c1, &c2)),
                setup.decryptor.decrypt(&setup.evaluator.multiply_new(&c2, &c1)),
            );
            assert_eq!(setup.evaluator.add_new(&c1, &c2), setup.evaluator.add_new(&c2, &c1));
        }
    }

    #[test]
    fn test_inplace_matches_new() {
        let setup = two_party(33);
        let c1 = setup.encryptors[0].encrypt(1);
        let c2 = setup.encryptors[1].encrypt(1);
        let mut destination = c1.clone();
        setup.evaluator.add_inplace(&mut destination, &c2);
        assert_eq!(setup.evaluator.add_new(&c1, &c2), destination);
        let mut destination = c1.clone();
        setup.evaluator.multiply_inplace(&mut destination, &c2);
        assert_eq!(setup.evaluator.multiply_new(&c1, &c2), destination);
        assert_eq!(1, setup.decryptor.decrypt(&destination));
    }

    #[test]
    fn test_add_many() {
        let setup = two_party(34);
        let bits = [1u8, 0, 1, 1];
        let ciphers: Vec<Ciphertext> = bits.iter().enumerate()
            .map(|(i, &bit)| setup.encryptors[i % 2].encrypt(bit))
            .collect();
        let sum = setup.evaluator.add_many_new(&ciphers);
        assert_eq!(1, setup.decryptor.decrypt(&sum));
        assert_eq!(ciphers[0], setup.evaluator.add_many_new(&ciphers[..1]));
    }

    #[test]
    #[should_panic]
    fn test_add_many_empty() {
        let setup = two_party(35);
        setup.evaluator.add_many_new(&[]);
    }

    #[test]
    fn test_xor_columns_shared_seed() {
        use crate::{bits, MultipartySession};
        use rand::SeedableRng;

        let context = HeContext::from_preset_with_seed(ParameterPreset::Headroom, 67).unwrap();
        let session = MultipartySession::setup(context, 3, &RetryPolicy::default()).unwrap();
        let evaluator = session.evaluator();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(67);
        let plain: Vec<Vec<u8>> = (0..3).map(|_| bits::random_bits(&mut rng, 16)).collect();
        let encrypted: Vec<Vec<Ciphertext>> = plain.iter().enumerate()
            .map(|(id, row)| session.encryptor(id).unwrap().encrypt_bits(row))
            .collect();
        let seed = evaluator.xor_columns(&encrypted).unwrap();
        assert_eq!(
            bits::plain_xor_columns(&plain).unwrap(),
            session.decryptor().decrypt_bits(&seed)
        );

        assert!(evaluator.xor_columns(&[]).unwrap().is_empty());
        let ragged = vec![encrypted[0].clone(), encrypted[1][..4].to_vec()];
        assert!(matches!(evaluator.xor_columns(&ragged), Err(HeError::WidthMismatch {left: 16, right: 4})));
    }

    #[test]
    #[should_panic]
    fn test_mismatched_rings() {
        let setup = two_party(36);
        let other = HeContext::from_preset_with_seed(ParameterPreset::Demo, 36).unwrap();
        let keypair = KeyGenerator::new(other.clone()).generate_keypair_with_retry(&RetryPolicy::default()).unwrap();
        let foreign = Encryptor::new(other, keypair.public_key().clone()).encrypt(1);
        setup.evaluator.add_new(&setup.encryptors[0].encrypt(1), &foreign);
    }
}
