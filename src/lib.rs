//! Multikey NTRU-style homomorphic encryption of bits.
//!
//! Every party generates its own key pair over the ring `Z_q[X]/(X^N + 1)`
//! and encrypts bits under its own public key. Ciphertexts of any parties
//! can be added (XOR) and multiplied (AND) together, and the result is
//! decrypted with the product of the contributing parties' private keys.
//! On top of the gates the crate provides a ripple-carry
//! [BinaryAdderCircuit] and the position-wise XOR used to agree on a shared
//! random seed.
//!
//! ```rust
//! use mkfhe::*;
//! let context = HeContext::from_preset(ParameterPreset::Toy).unwrap();
//! let session = MultipartySession::setup(context, 2, &RetryPolicy::default()).unwrap();
//! let evaluator = session.evaluator();
//! let (alice, bob) = (session.encryptor(0).unwrap(), session.encryptor(1).unwrap());
//!
//! let a = alice.encrypt_bits(&bits::parse_binary("101").unwrap());
//! let b = bob.encrypt_bits(&bits::parse_binary("011").unwrap());
//! let output = BinaryAdderCircuit::new(&evaluator).add(&a, &b, &alice.encrypt(0)).unwrap();
//! assert_eq!("1000", output.decrypt_to_string(&session.decryptor()));
//! ```

pub mod util;
pub mod ring;
pub mod multiparty;
pub mod bits;

mod circuit;
mod context;
mod encryptor;
mod error;
mod evaluator;
mod key;
mod modulus;
mod serialize_serde;
mod shortcut;
mod text;
mod valcheck;

pub use circuit::{AdderOutput, BinaryAdderCircuit};
pub use context::{HeContext, ParameterPreset};
pub use encryptor::{Decryptor, Encryptor};
pub use error::{HeError, Result};
pub use evaluator::Evaluator;
pub use key::{CombinedSecretKey, KeyGenerator, KeyPair, PrivateKey, PublicKey, RetryPolicy};
pub use modulus::Modulus;
pub use multiparty::{combine_secret_keys, MultipartySession, Participant};
pub use ring::{Coefficient, Domain, Evaluation, ParmsID, Representation, RingElement, RingParameters};
pub use shortcut::{create_multiparty_suite, create_single_party_suite};
pub use text::{Ciphertext, Plaintext};
pub use valcheck::ValCheck;
