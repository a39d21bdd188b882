/**
Arithmetic of the values a [DWTHandler] butterflies over.
*/
pub trait Arithmetic: Clone {

    type Value;
    type Root;
    type Scalar;

    fn add(&self, a: &Self::Value, b: &Self::Value) -> Self::Value;
    fn sub(&self, a: &Self::Value, b: &Self::Value) -> Self::Value;
    fn mul_root(&self, a: &Self::Value, r: &Self::Root) -> Self::Value;
    fn mul_scalar(&self, a: &Self::Value, s: &Self::Scalar) -> Self::Value;
    fn guard(&self, a: &Self::Value) -> Self::Value;

}

/**
Discrete weighted transform used to move ring elements between the coefficient
and evaluation representations.

The forward transform is the Cooley-Tukey negacyclic NTT with the powers of the
primitive 2N-th root \psi stored in bit-reversed order; it evaluates the input
polynomial at the odd powers of \psi and leaves the output in bit-reversed order.
The backward transform is the Gentleman-Sande variant over the powers of \psi^{-1},
stored so that the i-th slot holds the (reverse_bits(i - 1, log_n) + 1)-th power,
and the final multiplication by 1/N is applied through `scalar`.
(Longa and Naehrig, <https://eprint.iacr.org/2016/504.pdf>, algorithms 1 and 2.)
*/
#[derive(Clone)]
pub struct DWTHandler<ArithmeticType: Arithmetic> {
    arithmetic: ArithmeticType
}

impl<ArithmeticType: Arithmetic> DWTHandler<ArithmeticType> {

    pub fn new(arithmetic: &ArithmeticType) -> Self {
        Self {arithmetic: arithmetic.clone()}
    }

    pub fn transform_to_rev(
        &self,
        values: &mut [ArithmeticType::Value],
        log_n: usize,
        roots: &[ArithmeticType::Root],
        scalar: Option<&ArithmeticType::Scalar>
    ) {
        let n = 1 << log_n;
        for layer in 0..log_n {
            let m = 1 << layer;
            let gap = n >> (1 + layer);
            for (chunk, r) in values.chunks_mut(2 * gap).zip(roots[m..2 * m].iter()) {
                let (left, right) = chunk.split_at_mut(gap);
                for (x, y) in left.iter_mut().zip(right.iter_mut()) {
                    let u = self.arithmetic.guard(x);
                    let v = self.arithmetic.mul_root(y, r);
                    *x = self.arithmetic.add(&u, &v);
                    *y = self.arithmetic.sub(&u, &v);
                }
            }
        }
        if let Some(scalar) = scalar {
            for value in values.iter_mut() {
                *value = self.arithmetic.mul_scalar(value, scalar);
            }
        }
    }

    pub fn transform_from_rev(
        &self,
        values: &mut [ArithmeticType::Value],
        log_n: usize,
        roots: &[ArithmeticType::Root],
        scalar: Option<&ArithmeticType::Scalar>
    ) {
        let n = 1 << log_n;
        for layer in 0..log_n {
            let gap = 1 << layer;
            let m = n >> (1 + layer);
            for (chunk, r) in values.chunks_mut(2 * gap).zip(roots[n - 2 * m + 1..n - m + 1].iter()) {
                let (left, right) = chunk.split_at_mut(gap);
                for (x, y) in left.iter_mut().zip(right.iter_mut()) {
                    let u = self.arithmetic.guard(&self.arithmetic.add(x, y));
                    let v = self.arithmetic.sub(x, y);
                    *x = u;
                    *y = self.arithmetic.mul_root(&v, r);
                }
            }
        }
        if let Some(scalar) = scalar {
            for value in values.iter_mut() {
                *value = self.arithmetic.mul_scalar(value, scalar);
            }
        }
    }

}
