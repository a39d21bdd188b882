use std::sync::Arc;

use tracing::debug;

use crate::{
    CombinedSecretKey, Decryptor, Encryptor, Evaluator, HeContext, KeyGenerator, KeyPair,
    PrivateKey, PublicKey, Result, RetryPolicy,
};

/// One party of a multikey session: an id and the key pair it generated.
#[derive(Clone, Debug)]
pub struct Participant {
    participant_id: usize,
    keypair: KeyPair,
}

impl Participant {

    /// Run the party's own key generation loop under `policy`.
    pub fn generate(context: &Arc<HeContext>, participant_id: usize, policy: &RetryPolicy) -> Result<Self> {
        let keypair = KeyGenerator::new(context.clone()).generate_keypair_with_retry(policy)?;
        Ok(Self {participant_id, keypair})
    }

    pub fn id(&self) -> usize {self.participant_id}
    pub fn keypair(&self) -> &KeyPair {&self.keypair}
    pub fn public_key(&self) -> &PublicKey {self.keypair.public_key()}
    pub fn private_key(&self) -> &PrivateKey {self.keypair.private_key()}

    /// An [Encryptor] under this party's public key.
    pub fn encryptor(&self, context: &Arc<HeContext>) -> Encryptor {
        Encryptor::new(context.clone(), self.public_key().clone())
    }

}

/// A complete multikey setup.
///
/// Every party generates its key pair (each with its own bounded retry loop),
/// and only once all of them have succeeded are the private keys combined.
/// The combined key is fixed for the lifetime of the session.
///
/// ```rust
/// use mkfhe::*;
/// let context = HeContext::from_preset(ParameterPreset::Headroom).unwrap();
/// let session = MultipartySession::setup(context, 2, &RetryPolicy::default()).unwrap();
/// let c0 = session.encryptor(0).unwrap().encrypt(1);
/// let c1 = session.encryptor(1).unwrap().encrypt(1);
/// let sum = session.evaluator().add_new(&c0, &c1);
/// assert_eq!(0, session.decryptor().decrypt(&sum));
/// ```
pub struct MultipartySession {
    context: Arc<HeContext>,
    participants: Vec<Participant>,
    combined_secret_key: CombinedSecretKey,
}

impl MultipartySession {

    /// Generate keys for `party_count` parties and combine them.
    ///
    /// Fails with [HeError::EmptyKeySet](crate::HeError::EmptyKeySet) for zero
    /// parties, or with the first party's key generation error.
    pub fn setup(context: Arc<HeContext>, party_count: usize, policy: &RetryPolicy) -> Result<Self> {
        let participants = (0..party_count)
            .map(|id| Participant::generate(&context, id, policy))
            .collect::<Result<Vec<_>>>()?;
        let combined_secret_key = CombinedSecretKey::combine(participants.iter().map(|p| p.private_key()))?;
        debug!(party_count, "multiparty session ready");
        Ok(Self {context, participants, combined_secret_key})
    }

    pub fn context(&self) -> &Arc<HeContext> {&self.context}
    pub fn participants(&self) -> &[Participant] {&self.participants}
    pub fn participant_count(&self) -> usize {self.participants.len()}

    pub fn participant(&self, participant_id: usize) -> Option<&Participant> {
        self.participants.get(participant_id)
    }

    pub fn combined_secret_key(&self) -> &CombinedSecretKey {&self.combined_secret_key}

    /// An [Encryptor] under the public key of `participant_id`.
    pub fn encryptor(&self, participant_id: usize) -> Option<Encryptor> {
        self.participant(participant_id).map(|p| p.encryptor(&self.context))
    }

    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.context.clone())
    }

    /// A [Decryptor] holding the combined key.
    pub fn decryptor(&self) -> Decryptor {
        Decryptor::new(self.context.clone(), self.combined_secret_key.clone())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HeError, ParameterPreset, Ciphertext};

    #[test]
    fn test_session_setup() {
        let context = HeContext::from_preset_with_seed(ParameterPreset::Headroom, 51).unwrap();
        let session = MultipartySession::setup(context, 3, &RetryPolicy::default()).unwrap();
        assert_eq!(3, session.participant_count());
        assert_eq!(3, session.combined_secret_key().party_count());
        assert_eq!(Some(2), session.participant(2).map(|p| p.id()));
        assert!(session.participant(3).is_none());
        assert!(session.encryptor(3).is_none());
        assert_ne!(session.participants()[0].public_key(), session.participants()[1].public_key());
    }

    #[test]
    fn test_session_no_parties() {
        let context = HeContext::from_preset_with_seed(ParameterPreset::Demo, 52).unwrap();
        assert_eq!(
            Some(HeError::EmptyKeySet),
            MultipartySession::setup(context, 0, &RetryPolicy::default()).err()
        );
    }

    #[test]
    fn test_three_party_ring_sum() {
        let context = HeContext::from_preset_with_seed(ParameterPreset::Headroom, 53).unwrap();
        let session = MultipartySession::setup(context, 3, &RetryPolicy::default()).unwrap();
        let evaluator = session.evaluator();
        let decryptor = session.decryptor();
        for combination in 0..8u8 {
            let bits = [combination & 1, (combination >> 1) & 1, (combination >> 2) & 1];
            let ciphers: Vec<Ciphertext> = bits.iter().enumerate()
                .map(|(id, &bit)| session.encryptor(id).unwrap().encrypt(bit))
                .collect();
            let sum = evaluator.add_many_new(&ciphers);
            assert_eq!(bits[0] ^ bits[1] ^ bits[2], decryptor.decrypt(&sum));
        }
    }

    #[test]
    fn test_two_party_gates() {
        let context = HeContext::from_preset_with_seed(ParameterPreset::Headroom, 54).unwrap();
        let session = MultipartySession::setup(context, 2, &RetryPolicy::default()).unwrap();
        let evaluator = session.evaluator();
        let decryptor = session.decryptor();
        let (e0, e1) = (session.encryptor(0).unwrap(), session.encryptor(1).unwrap());
        for a in 0..2u8 {
            for b in 0..2u8 {
                let (c0, c1) = (e0.encrypt(a), e1.encrypt(b));
                assert_eq!(a ^ b, decryptor.decrypt(&evaluator.add_new(&c0, &c1)));
                assert_eq!(a & b, decryptor.decrypt(&evaluator.multiply_new(&c0, &c1)));
            }
        }
    }
}
