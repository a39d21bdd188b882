use super::dwthandler::{Arithmetic, DWTHandler};
use crate::{
    util, Modulus, HeError,
    util::MultiplyU64ModOperand,
};

#[derive(Clone, Copy, Default, Debug)]
struct ModArithLazy {
    modulus: Modulus,
    two_times_modulus: u64,
}
type NTTHandler = DWTHandler<ModArithLazy>;

impl Arithmetic for ModArithLazy {
    type Value = u64;
    type Root = MultiplyU64ModOperand;
    type Scalar = MultiplyU64ModOperand;

    #[inline]
    fn add(&self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        a + b
    }

    #[inline]
    fn sub(&self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        a + self.two_times_modulus - b
    }

    #[inline]
    fn mul_root(&self, a: &Self::Value, r: &Self::Root) -> Self::Value {
        util::multiply_u64operand_mod_lazy(*a, r, &self.modulus)
    }

    #[inline]
    fn mul_scalar(&self, a: &Self::Value, s: &Self::Scalar) -> Self::Value {
        util::multiply_u64operand_mod_lazy(*a, s, &self.modulus)
    }

    #[inline]
    fn guard(&self, a: &Self::Value) -> Self::Value {
        if *a >= self.two_times_modulus {*a - self.two_times_modulus}
        else {*a}
    }
}

impl ModArithLazy {

    fn new(modulus: &Modulus) -> Self {
        ModArithLazy {
            modulus: *modulus,
            two_times_modulus: modulus.value() << 1
        }
    }

}

/// Precomputed root powers for the negacyclic NTT over one prime modulus.
#[derive(Clone)]
pub struct NTTTables {
    root: u64,
    coeff_count_power: usize,
    coeff_count: usize,
    modulus: Modulus,
    inv_degree_modulo: MultiplyU64ModOperand,
    root_powers: Vec<MultiplyU64ModOperand>,
    inv_root_powers: Vec<MultiplyU64ModOperand>,
    ntt_handler: NTTHandler,
}

impl std::fmt::Debug for NTTTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NTTTables")
            .field("root", &self.root)
            .field("coeff_count", &self.coeff_count)
            .field("modulus", &self.modulus.value())
            .finish()
    }
}

impl NTTTables {

    /// Build tables with the minimal primitive 2N-th root of unity.
    pub fn new(coeff_count_power: usize, modulus: &Modulus) -> Result<Self, HeError> {
        let coeff_count = 1usize << coeff_count_power;
        let root = util::try_minimal_primitive_root(2 * coeff_count as u64, modulus)
            .ok_or_else(|| HeError::InvalidParameters(format!(
                "modulus {} has no primitive {}-th root of unity", modulus.value(), 2 * coeff_count
            )))?;
        Self::with_root(coeff_count_power, modulus, root)
    }

    /// Build tables from a caller-provided primitive 2N-th root of unity.
    pub fn with_root(coeff_count_power: usize, modulus: &Modulus, root: u64) -> Result<Self, HeError> {
        let coeff_count = 1usize << coeff_count_power;
        let modulus = *modulus;
        if !util::is_primitive_root(root, 2 * coeff_count as u64, &modulus) {
            return Err(HeError::InvalidParameters(format!(
                "{} is not a primitive {}-th root of unity modulo {}", root, 2 * coeff_count, modulus.value()
            )));
        }
        let inv_root = util::try_invert_u64_mod(root, &modulus)
            .ok_or_else(|| HeError::InvalidParameters("unable to invert root of unity".to_string()))?;

        // Populate tables with powers of root in specific orders.
        let mut root_powers = vec![MultiplyU64ModOperand::default(); coeff_count];
        let mut power = root;
        for i in 1..coeff_count {
            root_powers[util::reverse_bits_u64(i as u64, coeff_count_power) as usize] = MultiplyU64ModOperand::new(power, &modulus);
            power = util::multiply_u64_mod(power, root, &modulus);
        }
        root_powers[0] = MultiplyU64ModOperand::new(1, &modulus);

        let mut inv_root_powers = vec![MultiplyU64ModOperand::default(); coeff_count];
        let mut power = inv_root;
        for i in 1..coeff_count {
            inv_root_powers[util::reverse_bits_u64((i - 1) as u64, coeff_count_power) as usize + 1] = MultiplyU64ModOperand::new(power, &modulus);
            power = util::multiply_u64_mod(power, inv_root, &modulus);
        }
        inv_root_powers[0] = MultiplyU64ModOperand::new(1, &modulus);

        let inv_degree = util::try_invert_u64_mod(coeff_count as u64, &modulus)
            .ok_or_else(|| HeError::InvalidParameters("unable to invert degree".to_string()))?;
        let inv_degree_modulo = MultiplyU64ModOperand::new(inv_degree, &modulus);

        Ok(NTTTables {
            root,
            coeff_count_power,
            coeff_count,
            modulus,
            inv_degree_modulo,
            root_powers,
            inv_root_powers,
            ntt_handler: NTTHandler::new(&ModArithLazy::new(&modulus)),
        })
    }

    // get members
    pub fn root(&self) -> u64 {self.root}
    pub fn get_root_powers(&self) -> &[MultiplyU64ModOperand] {&self.root_powers}
    pub fn get_inv_root_powers(&self) -> &[MultiplyU64ModOperand] {&self.inv_root_powers}
    pub fn coeff_count_power(&self) -> usize {self.coeff_count_power}
    pub fn coeff_count(&self) -> usize {self.coeff_count}

    pub fn ntt_negacyclic_harvey_lazy(&self, operand: &mut [u64]) {
        self.ntt_handler.transform_to_rev(operand, self.coeff_count_power, &self.root_powers, None);
    }

    pub fn ntt_negacyclic_harvey(&self, operand: &mut [u64]) {
        self.ntt_negacyclic_harvey_lazy(operand);
        // Outputs of the lazy butterflies lie in [0, 4q).
        let modulus = self.modulus.value();
        let two_times_modulus = modulus << 1;
        operand.iter_mut().for_each(|x| {
            if *x >= two_times_modulus {*x -= two_times_modulus}
            if *x >= modulus {*x -= modulus}
        });
    }

    pub fn inverse_ntt_negacyclic_harvey_lazy(&self, operand: &mut [u64]) {
        self.ntt_handler.transform_from_rev(operand, self.coeff_count_power, &self.inv_root_powers,
            Some(&self.inv_degree_modulo));
    }

    pub fn inverse_ntt_negacyclic_harvey(&self, operand: &mut [u64]) {
        self.inverse_ntt_negacyclic_harvey_lazy(operand);
        // 1/N is merged into the last pass; only a conditional subtraction is left.
        let modulus = self.modulus.value();
        operand.iter_mut().for_each(|x| {
            if *x >= modulus {*x -= modulus}
        });
    }

}
