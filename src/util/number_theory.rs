use crate::util;
use crate::modulus::Modulus;

// Deterministic Miller-Rabin witnesses; sufficient for every 64-bit input.
const IS_PRIME_WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

pub fn gcd(x: u64, y: u64) -> u64 {
    if x < y {
        gcd(y, x)
    } else if y == 0 {
        x
    } else {
        let f = x % y;
        if f == 0 { y } else { gcd(y, f) }
    }
}

/** Extended GCD:
Returns (gcd, x, y) where gcd is the greatest common divisor of a and b.
The numbers x, y are such that gcd = ax + by.
*/
pub fn xgcd(mut x: u64, mut y: u64) -> (u64, i128, i128) {
    let mut prev_a: i128 = 1; let mut a: i128 = 0;
    let mut prev_b: i128 = 0; let mut b: i128 = 1;
    while y != 0 {
        let q = (x / y) as i128;
        let temp = x % y;
        x = y;
        y = temp;
        let temp = a;
        a = prev_a - q * a;
        prev_a = temp;
        let temp = b;
        b = prev_b - q * b;
        prev_b = temp;
    }
    (x, prev_a, prev_b)
}

pub fn try_invert_u64_mod_u64(value: u64, modulus: u64) -> Option<u64> {
    if value == 0 {return None;}
    let (cd, a, _) = xgcd(value, modulus);
    if cd != 1 {
        None
    } else if a < 0 {
        Some((modulus as i128 + a) as u64)
    } else {
        Some(a as u64)
    }
}

pub fn is_prime(modulus: &Modulus) -> bool {
    let value = modulus.value();
    // First check the simplest cases.
    if value < 2 {return false;}
    for &p in IS_PRIME_WITNESSES.iter() {
        if value == p {return true;}
        if value % p == 0 {return false;}
    }
    // Second, Miller-Rabin test.
    // Find r and odd d that satisfy value = 2^r * d + 1.
    let mut d = value - 1;
    let mut r = 0;
    while (d & 1) == 0 {d >>= 1; r += 1;}
    'witness: for &a in IS_PRIME_WITNESSES.iter() {
        let mut x = util::exponentiate_u64_mod(a, d, modulus);
        if x == 1 || x == value - 1 {continue;}
        for _ in 1..r {
            x = util::multiply_u64_mod(x, x, modulus);
            if x == value - 1 {continue 'witness;}
        }
        return false;
    }
    true
}

/// Largest prime of `bit_size` bits congruent to 1 modulo `factor`.
pub fn get_prime(factor: u64, bit_size: usize) -> Option<Modulus> {
    // Start with (2^bit_size - 1) / factor * factor + 1
    let mut value = ((0x1u64 << bit_size) - 1) / factor * factor + 1;
    let lower_bound = 0x1 << (bit_size - 1);
    while value > lower_bound {
        let new_mod = Modulus::new(value);
        if new_mod.is_prime() {
            return Some(new_mod);
        }
        value -= factor;
    }
    None
}

pub fn is_primitive_root(root: u64, degree: u64, modulus: &Modulus) -> bool {
    if root == 0 {
        false
    } else {
        // We check if root is a degree-th root of unity in integers modulo modulus,
        // where degree is a power of two. It suffices to check that root^(degree/2)
        // is -1 modulo modulus.
        util::exponentiate_u64_mod(root, degree >> 1, modulus) == (modulus.value() - 1)
    }
}

/// Search for a primitive `degree`-th root of unity by walking candidate
/// generators in increasing order. Deterministic for a given modulus.
pub fn try_primitive_root(degree: u64, modulus: &Modulus) -> Option<u64> {
    // We need to divide modulus-1 by degree to get the size of the quotient group
    let size_entire_group = modulus.value() - 1;
    // Compute size of quotient group
    let size_quotient_group = size_entire_group / degree;
    // size_entire_group must be divisible by degree, or otherwise the primitive root does not
    // exist in integers modulo modulus
    if size_entire_group - size_quotient_group * degree != 0 {
        return None;
    }
    (2..modulus.value())
        .take(u16::MAX as usize)
        .map(|candidate| util::exponentiate_u64_mod(candidate, size_quotient_group, modulus))
        .find(|&root| is_primitive_root(root, degree, modulus))
}

pub fn try_minimal_primitive_root(degree: u64, modulus: &Modulus) -> Option<u64> {
    let mut root = try_primitive_root(degree, modulus)?;
    let generator_sq = util::multiply_u64_mod(root, root, modulus);
    let mut current_generator = root;
    // root is going to always contain the smallest generator found
    for _ in 0..((degree+1)/2) {
        if current_generator < root {root = current_generator;}
        current_generator = util::multiply_u64_mod(current_generator, generator_sq, modulus);
    }
    Some(root)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_gcd() {
        assert_eq!(1, gcd(1, 1));
        assert_eq!(1, gcd(2, 1));
        assert_eq!(2, gcd(2, 2));
        assert_eq!(3, gcd(6, 15));
        assert_eq!(1, gcd(7, 15));
        assert_eq!(3, gcd(11112, 44445));

        assert_eq!(xgcd(7, 7), (7, 0, 1));
        assert_eq!(xgcd(1, 2), (1, 1, 0));
        assert_eq!(xgcd(5, 6), (1, -1, 1));
        assert_eq!(xgcd(13, 19), (1, 3, -2));
        assert_eq!(xgcd(14, 21), (7, -1, 1));
        assert_eq!(xgcd(19, 13), (1, -2, 3));
    }

    #[test]
    fn test_try_invert_uint_mod() {
        assert_eq!(Some(1), try_invert_u64_mod_u64(1, 2));
        assert_eq!(None, try_invert_u64_mod_u64(2, 2));
        assert_eq!(Some(1), try_invert_u64_mod_u64(0xffffff, 2));
        assert_eq!(None, try_invert_u64_mod_u64(12345, 3));
        assert_eq!(Some(4), try_invert_u64_mod_u64(5, 19));
        assert_eq!(Some(5), try_invert_u64_mod_u64(4, 19));
        let q = 1152921504606842753;
        let inv = try_invert_u64_mod_u64(3, q).unwrap();
        assert_eq!(1, (inv as u128 * 3 % q as u128) as u64);
    }

    #[test]
    fn test_is_prime() {
        assert!(!is_prime(&Modulus::new(0)));
        assert!(is_prime(&Modulus::new(2)));
        assert!(is_prime(&Modulus::new(3)));
        assert!(!is_prime(&Modulus::new(4)));
        assert!(is_prime(&Modulus::new(17)));
        assert!(!is_prime(&Modulus::new(221)));
        assert!(is_prime(&Modulus::new(65537)));
        assert!(is_prime(&Modulus::new(320417)));
        assert!(!is_prime(&Modulus::new(72307 * 59399)));
        assert!(is_prime(&Modulus::new(36893488147419103)));
        assert!(!is_prime(&Modulus::new(36893488147419107)));
        assert!(is_prime(&Modulus::new(1099511627297)));
        assert!(is_prime(&Modulus::new(1152921504606842753)));
    }

    #[test]
    fn test_get_prime() {
        let modulus = get_prime(16, 40).unwrap();
        assert_eq!(1099511627297, modulus.value());
        assert_eq!(1, modulus.value() % 16);
    }

    #[test]
    fn test_primitive_root() {
        let modulus = Modulus::new(11);
        assert!(is_primitive_root(10, 2, &modulus));
        assert!(!is_primitive_root(9, 2, &modulus));
        assert!(!is_primitive_root(10, 4, &modulus));
        let modulus = Modulus::new(29);
        assert!(is_primitive_root(28, 2, &modulus));
        assert!(is_primitive_root(12, 4, &modulus));
        assert!(!is_primitive_root(12, 2, &modulus));
        assert!(!is_primitive_root(12, 8, &modulus));
        let modulus = Modulus::new(1234565441);
        assert!(is_primitive_root(960907033, 8, &modulus));
        assert!(is_primitive_root(1180581915, 16, &modulus));
        assert!(!is_primitive_root(1180581915, 32, &modulus));

        let root = try_primitive_root(4, &Modulus::new(29)).unwrap();
        assert!(root == 12 || root == 17);
        assert_eq!(None, try_primitive_root(8, &Modulus::new(29)));

        assert_eq!(Some(10), try_minimal_primitive_root(2, &Modulus::new(11)));
        assert_eq!(Some(12), try_minimal_primitive_root(4, &Modulus::new(29)));
        assert_eq!(Some(1234565440), try_minimal_primitive_root(2, &Modulus::new(1234565441)));
        assert_eq!(Some(249725733), try_minimal_primitive_root(8, &Modulus::new(1234565441)));
    }

}
