//! Multikey HE
//!
//! Every party holds its own NTRU-style key pair and encrypts under its own
//! public key. Ciphertexts of different parties are combined freely by the
//! [Evaluator](crate::Evaluator); the result decrypts under the product of
//! the contributing private keys, computed once by [combine_secret_keys].

mod combiner;
pub mod participant;

pub use combiner::combine_secret_keys;
pub use participant::{MultipartySession, Participant};
