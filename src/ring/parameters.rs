use std::sync::Arc;

use crate::{
    util::{self, hash, NTTTables},
    HeError, Modulus, Result,
};

/// Identifier of a set of ring parameters: the SHA-256 digest of `(N, q, root)`.
pub type ParmsID = [u64; 4];

/// Parameters of the negacyclic ring `Z_q[X]/(X^N + 1)`.
///
/// The degree `N` is a power of two and the modulus `q` a prime with
/// `q = 1 (mod 2N)`, so that a primitive `2N`-th root of unity exists and
/// ring multiplication can be done pointwise after a negacyclic NTT.
/// Instances are immutable and shared between every element, key and
/// ciphertext of a session through an [Arc].
pub struct RingParameters {
    degree: usize,
    coeff_count_power: usize,
    modulus: Modulus,
    ntt_tables: NTTTables,
    parms_id: ParmsID,
}

impl RingParameters {

    /// Create ring parameters using the minimal primitive `2N`-th root of unity.
    pub fn new(degree: usize, modulus: u64) -> Result<Arc<Self>> {
        Self::build(degree, modulus, None).map(Arc::new)
    }

    /// Create ring parameters from a caller-chosen primitive `2N`-th root of unity.
    pub fn with_root(degree: usize, modulus: u64, root: u64) -> Result<Arc<Self>> {
        Self::build(degree, modulus, Some(root)).map(Arc::new)
    }

    pub(crate) fn build(degree: usize, modulus: u64, root: Option<u64>) -> Result<Self> {
        if !(util::HE_POLY_MOD_DEGREE_MIN..=util::HE_POLY_MOD_DEGREE_MAX).contains(&degree) {
            return Err(HeError::InvalidParameters(format!(
                "degree {} outside [{}, {}]", degree, util::HE_POLY_MOD_DEGREE_MIN, util::HE_POLY_MOD_DEGREE_MAX
            )));
        }
        let coeff_count_power = util::get_power_of_two(degree as u64);
        if coeff_count_power < 0 {
            return Err(HeError::InvalidParameters(format!("degree {} is not a power of two", degree)));
        }
        let coeff_count_power = coeff_count_power as usize;
        if modulus < 2 || util::get_significant_bit_count(modulus) > util::HE_MOD_BIT_COUNT_MAX {
            return Err(HeError::InvalidParameters(format!(
                "modulus {} must lie in [2, 2^{})", modulus, util::HE_MOD_BIT_COUNT_MAX
            )));
        }
        let modulus = Modulus::new(modulus);
        if !modulus.is_prime() {
            return Err(HeError::InvalidParameters(format!("modulus {} is not prime", modulus.value())));
        }
        let ntt_tables = match root {
            Some(root) => NTTTables::with_root(coeff_count_power, &modulus, root)?,
            None => NTTTables::new(coeff_count_power, &modulus)?,
        };
        let mut parms_id = hash::HASH_ZERO_BLOCK;
        hash::hash(&[degree as u64, modulus.value(), ntt_tables.root()], &mut parms_id);
        Ok(Self {
            degree,
            coeff_count_power,
            modulus,
            ntt_tables,
            parms_id,
        })
    }

    /// The ring degree `N`.
    pub fn degree(&self) -> usize {self.degree}
    /// `log2(N)`.
    pub fn coeff_count_power(&self) -> usize {self.coeff_count_power}
    /// The coefficient modulus `q`.
    pub fn modulus(&self) -> &Modulus {&self.modulus}
    /// The primitive `2N`-th root of unity the NTT is built on.
    pub fn root(&self) -> u64 {self.ntt_tables.root()}
    pub fn parms_id(&self) -> &ParmsID {&self.parms_id}
    pub fn ntt_tables(&self) -> &NTTTables {&self.ntt_tables}

    pub(crate) fn describe(&self) -> String {
        format!("N={}, q={}", self.degree, self.modulus.value())
    }

}

impl PartialEq for RingParameters {
    fn eq(&self, other: &Self) -> bool {
        self.parms_id == other.parms_id
    }
}

impl Eq for RingParameters {}

impl std::fmt::Debug for RingParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingParameters")
            .field("degree", &self.degree)
            .field("modulus", &self.modulus.value())
            .field("root", &self.root())
            .finish()
    }
}
