use crate::modulus::Modulus;
use crate::util;

use super::try_invert_u64_mod_u64;

/** `operand` must be at most modulus */
#[inline]
pub fn negate_u64_mod(operand: u64, modulus: &Modulus) -> u64 {
    if operand == 0 {0} else {modulus.value() - operand}
}

/** Both operands must be less than modulus. */
#[inline]
pub fn add_u64_mod(operand1: u64, operand2: u64, modulus: &Modulus) -> u64 {
    let sum = operand1 + operand2;
    if sum >= modulus.value() {sum - modulus.value()} else {sum}
}

/** Both operands must be less than modulus. */
#[inline]
pub fn sub_u64_mod(operand1: u64, operand2: u64, modulus: &Modulus) -> u64 {
    if operand1 >= operand2 {operand1 - operand2} else {operand1 + modulus.value() - operand2}
}

#[inline]
pub fn multiply_u64_mod(operand1: u64, operand2: u64, modulus: &Modulus) -> u64 {
    modulus.reduce_u128(operand1 as u128 * operand2 as u128)
}

/**
This struct contains a operand and a precomputed quotient: (operand << 64) / modulus, for a specific modulus.
When passed to multiply_u64operand_mod, a Shoup-style reduction is performed instead of a full division.
Operand must be less than modulus.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MultiplyU64ModOperand {
    pub operand: u64,
    pub quotient: u64,
}

impl MultiplyU64ModOperand {

    pub fn new(operand: u64, modulus: &Modulus) -> Self {
        let quotient = (((operand as u128) << 64) / modulus.value() as u128) as u64;
        MultiplyU64ModOperand { operand, quotient }
    }

}

impl std::fmt::Display for MultiplyU64ModOperand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.operand, self.quotient)
    }
}

/**
Returns x * y mod modulus.
Correctness: modulus should be at most 61-bit, and y must be less than modulus.
*/
#[inline]
pub fn multiply_u64operand_mod(x: u64, y: &MultiplyU64ModOperand, modulus: &Modulus) -> u64 {
    let tmp = multiply_u64operand_mod_lazy(x, y, modulus);
    let p = modulus.value();
    if tmp >= p {tmp - p} else {tmp}
}

/**
Returns x * y mod modulus or x * y mod modulus + modulus.
Correctness: modulus should be at most 61-bit, and y must be less than modulus.
*/
#[inline]
pub fn multiply_u64operand_mod_lazy(x: u64, y: &MultiplyU64ModOperand, modulus: &Modulus) -> u64 {
    let p = modulus.value();
    let tmp1 = util::multiply_u64_high_word(x, y.quotient);
    y.operand.wrapping_mul(x).wrapping_sub(tmp1.wrapping_mul(p))
}

#[inline]
pub fn try_invert_u64_mod(operand: u64, modulus: &Modulus) -> Option<u64> {
    try_invert_u64_mod_u64(operand, modulus.value())
}

/** Returns operand^exponent mod modulus. */
pub fn exponentiate_u64_mod(operand: u64, mut exponent: u64, modulus: &Modulus) -> u64 {
    if exponent == 0 {return 1;}
    let mut power = modulus.reduce(operand);
    let mut intermediate = 1;
    loop {
        if (exponent & 1) > 0 {
            intermediate = multiply_u64_mod(power, intermediate, modulus);
        }
        exponent >>= 1;
        if exponent == 0 {break;}
        power = multiply_u64_mod(power, power, modulus);
    }
    intermediate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sub_negate() {
        let modulus = Modulus::new(17);
        assert_eq!(0, add_u64_mod(8, 9, &modulus));
        assert_eq!(16, add_u64_mod(8, 8, &modulus));
        assert_eq!(16, sub_u64_mod(0, 1, &modulus));
        assert_eq!(3, sub_u64_mod(10, 7, &modulus));
        assert_eq!(0, negate_u64_mod(0, &modulus));
        assert_eq!(1, negate_u64_mod(16, &modulus));
    }

    #[test]
    fn test_multiply_mod() {
        let modulus = Modulus::new(1152921504606842753);
        let a = 1152921504606842752; // -1
        assert_eq!(1, multiply_u64_mod(a, a, &modulus));
        let operand = MultiplyU64ModOperand::new(a, &modulus);
        assert_eq!(1, multiply_u64operand_mod(a, &operand, &modulus));
        assert_eq!(a, multiply_u64operand_mod(1, &operand, &modulus));

        let modulus = Modulus::new(320417);
        let operand = MultiplyU64ModOperand::new(12345, &modulus);
        for x in [0, 1, 2, 320416, 99999] {
            assert_eq!(
                multiply_u64_mod(x, 12345, &modulus),
                multiply_u64operand_mod(x, &operand, &modulus)
            );
        }
    }

    #[test]
    fn test_exponentiate() {
        let modulus = Modulus::new(17);
        assert_eq!(1, exponentiate_u64_mod(3, 0, &modulus));
        assert_eq!(3, exponentiate_u64_mod(3, 1, &modulus));
        assert_eq!(16, exponentiate_u64_mod(3, 8, &modulus));
        assert_eq!(1, exponentiate_u64_mod(3, 16, &modulus));
    }

    #[test]
    fn test_invert() {
        let modulus = Modulus::new(19);
        assert_eq!(Some(4), try_invert_u64_mod(5, &modulus));
        assert_eq!(Some(5), try_invert_u64_mod(4, &modulus));
        assert_eq!(None, try_invert_u64_mod(0, &modulus));
    }
}
