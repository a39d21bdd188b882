use std::sync::Arc;

use rand::Rng;
use tracing::{debug, warn};

use crate::{
    util,
    Coefficient, Evaluation, HeContext, HeError, ParmsID, Result, RingElement,
};

/// Struct to store a private key.
///
/// The private key is the ring element `f = 2f' + 1` with `f'` small, held in
/// the evaluation domain. A key is only ever built from an invertible `f`.
///
/// - See [KeyGenerator] for the class that generates the private key.
/// - See [PublicKey] for the class that stores the public key.
/// - See [CombinedSecretKey] for the key used for joint decryption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateKey {
    f: RingElement<Evaluation>,
}

impl PrivateKey {

    /// The [ParmsID] of the private key.
    pub fn parms_id(&self) -> &ParmsID {
        self.f.ring().parms_id()
    }

    /// The inner ring element.
    pub fn as_element(&self) -> &RingElement<Evaluation> {
        &self.f
    }

}

/// Struct to store a public key.
///
/// The public key is `h = 2 g f^-1` for the owner's private key `f` and a
/// second small element `g`, held in the evaluation domain.
///
/// - See [KeyGenerator] for the class that generates the public key.
/// - See [PrivateKey] for the class that stores the private key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    h: RingElement<Evaluation>,
}

impl PublicKey {

    /// The [ParmsID] of the public key.
    pub fn parms_id(&self) -> &ParmsID {
        self.h.ring().parms_id()
    }

    /// The inner ring element.
    pub fn as_element(&self) -> &RingElement<Evaluation> {
        &self.h
    }

}

/// A private key together with the public key derived from it.
#[derive(Clone, Debug)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    pub fn private_key(&self) -> &PrivateKey {&self.private_key}
    pub fn public_key(&self) -> &PublicKey {&self.public_key}
    pub fn into_parts(self) -> (PrivateKey, PublicKey) {
        (self.private_key, self.public_key)
    }
}

/// Product of the private keys of every party in a session.
///
/// A ciphertext built from encryptions under several parties' public keys
/// decrypts under this key. It is computed once, after every party holds a
/// key, and is read-only afterwards.
///
/// See [CombinedSecretKey::combine](crate::CombinedSecretKey::combine) and
/// [combine_secret_keys](crate::multiparty::combine_secret_keys).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombinedSecretKey {
    key: RingElement<Evaluation>,
    party_count: usize,
}

impl CombinedSecretKey {

    pub(crate) fn from_parts(key: RingElement<Evaluation>, party_count: usize) -> Self {
        Self {key, party_count}
    }

    /// How many private keys were multiplied together.
    pub fn party_count(&self) -> usize {self.party_count}

    /// The [ParmsID] of the combined key.
    pub fn parms_id(&self) -> &ParmsID {
        self.key.ring().parms_id()
    }

    /// The inner ring element.
    pub fn as_element(&self) -> &RingElement<Evaluation> {
        &self.key
    }

}

impl From<&PrivateKey> for CombinedSecretKey {
    fn from(key: &PrivateKey) -> Self {
        Self::from_parts(key.f.clone(), 1)
    }
}

/// Bound on the number of key generation attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
}

impl RetryPolicy {

    /// At least one attempt must be allowed.
    pub fn new(max_attempts: usize) -> Result<Self> {
        if max_attempts == 0 {
            return Err(HeError::InvalidParameters("retry policy must allow at least one attempt".to_string()));
        }
        Ok(Self {max_attempts})
    }

    pub fn max_attempts(&self) -> usize {self.max_attempts}

}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {max_attempts: util::HE_KEYGEN_ATTEMPTS_DEFAULT}
    }
}

/// Generates matching private and public keys.
///
/// A single attempt samples `f'` and `g`, sets `f = 2f' + 1` and fails with
/// [HeError::NotInvertible] if `f` has no inverse in the ring. The failure is
/// an ordinary result; whether and how often to try again is decided by the
/// caller, or by [KeyGenerator::generate_keypair_with_retry].
///
/// ```rust
/// use mkfhe::*;
/// let context = HeContext::from_preset(ParameterPreset::Demo).unwrap();
/// let keygen = KeyGenerator::new(context);
/// let keypair = keygen.generate_keypair_with_retry(&RetryPolicy::default()).unwrap();
/// assert_eq!(keypair.private_key().parms_id(), keypair.public_key().parms_id());
/// ```
pub struct KeyGenerator {
    context: Arc<HeContext>,
}

impl KeyGenerator {

    /// Create a new KeyGenerator.
    pub fn new(context: Arc<HeContext>) -> Self {
        Self {context}
    }

    /// The [HeContext] used by the KeyGenerator.
    pub fn context(&self) -> &Arc<HeContext> {
        &self.context
    }

    /// One key generation attempt with a fresh randomness stream.
    pub fn generate_keypair(&self) -> Result<KeyPair> {
        let mut rng = self.context.create_random_generator();
        self.generate_keypair_with_rng(&mut rng)
    }

    /// One key generation attempt drawing from `rng`.
    pub fn generate_keypair_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<KeyPair> {
        let ring = self.context.ring();
        let gaussian = self.context.gaussian();
        let f_prime = RingElement::<Coefficient>::sample_small(ring, gaussian, rng);
        let g = RingElement::<Coefficient>::sample_small(ring, gaussian, rng);

        let f = f_prime.scalar_mul(2).add_constant(1).to_evaluation();
        let f_inv = f.inverse().ok_or(HeError::NotInvertible)?;
        let h = (&g.to_evaluation() * &f_inv).scalar_mul(2);
        Ok(KeyPair {
            private_key: PrivateKey {f},
            public_key: PublicKey {h},
        })
    }

    /// Repeat [KeyGenerator::generate_keypair] until it succeeds or the
    /// policy's attempt budget runs out.
    pub fn generate_keypair_with_retry(&self, policy: &RetryPolicy) -> Result<KeyPair> {
        for attempt in 1..=policy.max_attempts() {
            match self.generate_keypair() {
                Ok(keypair) => {
                    debug!(attempt, "key generation succeeded");
                    return Ok(keypair);
                }
                Err(HeError::NotInvertible) => {
                    debug!(attempt, "sampled key is not invertible, resampling");
                }
                Err(e) => return Err(e),
            }
        }
        warn!(attempts = policy.max_attempts(), "key generation retry budget exhausted");
        Err(HeError::KeyGenerationExhausted {attempts: policy.max_attempts()})
    }

}
