use std::{
    marker::PhantomData,
    ops::{Add, Index, Mul, Neg, Sub},
    sync::Arc,
};

use rand::{distributions::Distribution, Rng};

use crate::{
    util::{self, DiscreteGaussian},
    HeError, Result,
};
use super::RingParameters;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Coefficient {}
    impl Sealed for super::Evaluation {}
}

/// Runtime view of the representation an element is held in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Coefficients of the polynomial.
    Coefficient,
    /// Values of the polynomial at the odd powers of the root of unity.
    Evaluation,
}

/// Type-level tag for the representation of a [RingElement].
///
/// Only [Coefficient] and [Evaluation] implement it. Domain changes go
/// through [RingElement::to_evaluation] and [RingElement::to_coefficient],
/// so converting an element that is already in the target domain does not
/// type check.
pub trait Domain: sealed::Sealed + Clone + Copy + std::fmt::Debug + Send + Sync + 'static {
    const REPRESENTATION: Representation;

    #[doc(hidden)]
    fn multiply(ring: &RingParameters, a: &[u64], b: &[u64]) -> Vec<u64>;

    #[doc(hidden)]
    fn add_constant(ring: &RingParameters, values: &mut [u64], constant: u64);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Coefficient;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Evaluation;

impl Domain for Coefficient {
    const REPRESENTATION: Representation = Representation::Coefficient;

    // Schoolbook negacyclic convolution: X^N = -1.
    fn multiply(ring: &RingParameters, a: &[u64], b: &[u64]) -> Vec<u64> {
        let modulus = ring.modulus();
        let n = ring.degree();
        let mut result = vec![0; n];
        for (i, &x) in a.iter().enumerate() {
            if x == 0 {continue;}
            for (j, &y) in b.iter().enumerate() {
                let product = util::multiply_u64_mod(x, y, modulus);
                let k = i + j;
                if k < n {
                    result[k] = util::add_u64_mod(result[k], product, modulus);
                } else {
                    result[k - n] = util::sub_u64_mod(result[k - n], product, modulus);
                }
            }
        }
        result
    }

    fn add_constant(ring: &RingParameters, values: &mut [u64], constant: u64) {
        values[0] = util::add_u64_mod(values[0], constant, ring.modulus());
    }
}

impl Domain for Evaluation {
    const REPRESENTATION: Representation = Representation::Evaluation;

    fn multiply(ring: &RingParameters, a: &[u64], b: &[u64]) -> Vec<u64> {
        let modulus = ring.modulus();
        a.iter().zip(b.iter())
            .map(|(&x, &y)| util::multiply_u64_mod(x, y, modulus))
            .collect()
    }

    // A constant polynomial evaluates to itself everywhere.
    fn add_constant(ring: &RingParameters, values: &mut [u64], constant: u64) {
        let modulus = ring.modulus();
        values.iter_mut().for_each(|x| *x = util::add_u64_mod(*x, constant, modulus));
    }
}

/// An element of `Z_q[X]/(X^N + 1)` held in the representation `D`.
///
/// Every element carries the [RingParameters] it was created with. Binary
/// operations first check that both operands share them: the `try_*`
/// methods report a mismatch as [HeError::DimensionMismatch], the operator
/// impls panic with it.
#[derive(Clone)]
pub struct RingElement<D: Domain> {
    ring: Arc<RingParameters>,
    values: Vec<u64>,
    _domain: PhantomData<D>,
}

impl<D: Domain> RingElement<D> {

    fn from_raw(ring: Arc<RingParameters>, values: Vec<u64>) -> Self {
        Self {ring, values, _domain: PhantomData}
    }

    /// The zero element.
    pub fn zero(ring: &Arc<RingParameters>) -> Self {
        Self::from_raw(ring.clone(), vec![0; ring.degree()])
    }

    /// Wrap residues given in this representation. There must be exactly `N`
    /// of them, each below `q`.
    pub fn from_values(ring: &Arc<RingParameters>, values: Vec<u64>) -> Result<Self> {
        if values.len() != ring.degree() {
            return Err(HeError::InvalidParameters(format!(
                "expected {} values, got {}", ring.degree(), values.len()
            )));
        }
        let q = ring.modulus().value();
        if let Some(bad) = values.iter().find(|&&x| x >= q) {
            return Err(HeError::InvalidParameters(format!("value {} is not reduced modulo {}", bad, q)));
        }
        Ok(Self::from_raw(ring.clone(), values))
    }

    /// Uniformly random element.
    pub fn sample_uniform<R: Rng + ?Sized>(ring: &Arc<RingParameters>, rng: &mut R) -> Self {
        let q = ring.modulus().value();
        let values = (0..ring.degree()).map(|_| rng.gen_range(0..q)).collect();
        Self::from_raw(ring.clone(), values)
    }

    pub fn ring(&self) -> &Arc<RingParameters> {&self.ring}
    pub fn values(&self) -> &[u64] {&self.values}
    pub fn degree(&self) -> usize {self.values.len()}
    pub fn representation(&self) -> Representation {D::REPRESENTATION}

    /// Overwrite slot `index`; the value is reduced modulo `q`.
    pub fn set(&mut self, index: usize, value: u64) {
        self.values[index] = self.ring.modulus().reduce(value);
    }

    /// Fails unless `other` lives in the same ring.
    pub fn check_same_ring<E: Domain>(&self, other: &RingElement<E>) -> Result<()> {
        if Arc::ptr_eq(&self.ring, &other.ring) || self.ring.parms_id() == other.ring.parms_id() {
            Ok(())
        } else {
            Err(HeError::DimensionMismatch {
                expected: self.ring.describe(),
                found: other.ring.describe(),
            })
        }
    }

    fn zip_with(&self, other: &Self, op: impl Fn(u64, u64) -> u64) -> Result<Self> {
        self.check_same_ring(other)?;
        let values = self.values.iter().zip(other.values.iter())
            .map(|(&x, &y)| op(x, y))
            .collect();
        Ok(Self::from_raw(self.ring.clone(), values))
    }

    pub fn try_add(&self, other: &Self) -> Result<Self> {
        let modulus = *self.ring.modulus();
        self.zip_with(other, |x, y| util::add_u64_mod(x, y, &modulus))
    }

    pub fn try_sub(&self, other: &Self) -> Result<Self> {
        let modulus = *self.ring.modulus();
        self.zip_with(other, |x, y| util::sub_u64_mod(x, y, &modulus))
    }

    /// Ring product. Pointwise in the evaluation domain, negacyclic
    /// convolution in the coefficient domain.
    pub fn try_mul(&self, other: &Self) -> Result<Self> {
        self.check_same_ring(other)?;
        let values = D::multiply(&self.ring, &self.values, &other.values);
        Ok(Self::from_raw(self.ring.clone(), values))
    }

    /// Multiply by an integer constant.
    pub fn scalar_mul(&self, scalar: u64) -> Self {
        let modulus = self.ring.modulus();
        let operand = util::MultiplyU64ModOperand::new(modulus.reduce(scalar), modulus);
        let values = self.values.iter()
            .map(|&x| util::multiply_u64operand_mod(x, &operand, modulus))
            .collect();
        Self::from_raw(self.ring.clone(), values)
    }

    /// Add the constant polynomial `constant`.
    pub fn add_constant(&self, constant: u64) -> Self {
        let mut ret = self.clone();
        D::add_constant(&self.ring, &mut ret.values, self.ring.modulus().reduce(constant));
        ret
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&x| x == 0)
    }

}

impl RingElement<Coefficient> {

    /// Build an element from signed coefficients.
    pub fn from_signed(ring: &Arc<RingParameters>, coefficients: &[i64]) -> Result<Self> {
        if coefficients.len() != ring.degree() {
            return Err(HeError::InvalidParameters(format!(
                "expected {} coefficients, got {}", ring.degree(), coefficients.len()
            )));
        }
        let modulus = ring.modulus();
        let values = coefficients.iter().map(|&c| modulus.reduce_i64(c)).collect();
        Ok(Self::from_raw(ring.clone(), values))
    }

    /// Small-norm element with coefficients drawn from `gaussian`.
    pub fn sample_small<R: Rng + ?Sized>(ring: &Arc<RingParameters>, gaussian: &DiscreteGaussian, rng: &mut R) -> Self {
        let modulus = ring.modulus();
        let values = (0..ring.degree())
            .map(|_| modulus.reduce_i64(gaussian.sample(rng)))
            .collect();
        Self::from_raw(ring.clone(), values)
    }

    pub fn to_evaluation(&self) -> RingElement<Evaluation> {
        let mut values = self.values.clone();
        self.ring.ntt_tables().ntt_negacyclic_harvey(&mut values);
        RingElement::from_raw(self.ring.clone(), values)
    }

    /// Coefficient `index` lifted to `(-q/2, q/2]`.
    pub fn centered(&self, index: usize) -> i64 {
        self.ring.modulus().center(self.values[index])
    }

    /// Largest absolute value among the centered coefficients.
    pub fn infinity_norm(&self) -> u64 {
        let modulus = self.ring.modulus();
        self.values.iter()
            .map(|&x| modulus.center(x).unsigned_abs())
            .max()
            .unwrap_or(0)
    }

}

impl RingElement<Evaluation> {

    pub fn to_coefficient(&self) -> RingElement<Coefficient> {
        let mut values = self.values.clone();
        self.ring.ntt_tables().inverse_ntt_negacyclic_harvey(&mut values);
        RingElement::from_raw(self.ring.clone(), values)
    }

    /// With `q` prime the ring splits into `N` copies of `Z_q`, so an
    /// element is a unit exactly when none of its evaluations is zero.
    pub fn inverse_exists(&self) -> bool {
        self.values.iter().all(|&x| x != 0)
    }

    /// Multiplicative inverse, or `None` when some evaluation is zero.
    pub fn inverse(&self) -> Option<Self> {
        let modulus = self.ring.modulus();
        let values = self.values.iter()
            .map(|&x| util::try_invert_u64_mod(x, modulus))
            .collect::<Option<Vec<u64>>>()?;
        Some(Self::from_raw(self.ring.clone(), values))
    }

}

impl<D: Domain> Index<usize> for RingElement<D> {
    type Output = u64;
    fn index(&self, index: usize) -> &u64 {
        &self.values[index]
    }
}

impl<D: Domain> PartialEq for RingElement<D> {
    fn eq(&self, other: &Self) -> bool {
        self.check_same_ring(other).is_ok() && self.values == other.values
    }
}

impl<D: Domain> Eq for RingElement<D> {}

impl<D: Domain> std::fmt::Debug for RingElement<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingElement")
            .field("representation", &D::REPRESENTATION)
            .field("ring", &self.ring.describe())
            .field("values", &self.values)
            .finish()
    }
}

fn or_panic<T>(result: Result<T>) -> T {
    match result {
        Ok(x) => x,
        Err(e) => panic!("[Invalid argument] {}", e),
    }
}

impl<D: Domain> Add for &RingElement<D> {
    type Output = RingElement<D>;
    fn add(self, rhs: Self) -> RingElement<D> {
        or_panic(self.try_add(rhs))
    }
}

impl<D: Domain> Sub for &RingElement<D> {
    type Output = RingElement<D>;
    fn sub(self, rhs: Self) -> RingElement<D> {
        or_panic(self.try_sub(rhs))
    }
}

impl<D: Domain> Mul for &RingElement<D> {
    type Output = RingElement<D>;
    fn mul(self, rhs: Self) -> RingElement<D> {
        or_panic(self.try_mul(rhs))
    }
}

impl<D: Domain> Neg for &RingElement<D> {
    type Output = RingElement<D>;
    fn neg(self) -> RingElement<D> {
        let modulus = self.ring.modulus();
        let values = self.values.iter().map(|&x| util::negate_u64_mod(x, modulus)).collect();
        RingElement::from_raw(self.ring.clone(), values)
    }
}
