use rand::{Rng, distributions::Distribution};

/// Discrete Gaussian over the integers, sampled by rejection from the
/// window `[-tailcut, tailcut]` with `tailcut = ceil(6 * std_dev)`.
///
/// A standard deviation of zero degenerates to the constant 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiscreteGaussian {
    std_dev: f64,
    tailcut: i64,
}

impl DiscreteGaussian {

    /// Returns `None` for a negative or non-finite deviation.
    pub fn new(std_dev: f64) -> Option<Self> {
        if !std_dev.is_finite() || std_dev < 0.0 {
            return None;
        }
        Some(Self {
            std_dev,
            tailcut: (std_dev * 6.0).ceil() as i64,
        })
    }

    pub fn std_dev(&self) -> f64 {self.std_dev}
    pub fn tailcut(&self) -> i64 {self.tailcut}

}

impl Distribution<i64> for DiscreteGaussian {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        if self.tailcut == 0 {
            return 0;
        }
        let sigma_sq_2 = 2.0 * self.std_dev * self.std_dev;
        loop {
            let x = rng.gen_range(-self.tailcut..=self.tailcut);
            let xf = x as f64;
            let prob = (-(xf * xf) / sigma_sq_2).exp();
            if rng.gen::<f64>() < prob {
                return x;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_gaussian_tail_and_moments() {
        let gaussian = DiscreteGaussian::new(3.2).unwrap();
        assert_eq!(20, gaussian.tailcut());
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
        let samples: Vec<i64> = (0..20000).map(|_| gaussian.sample(&mut rng)).collect();
        assert!(samples.iter().all(|x| x.abs() <= 20));
        let mean = samples.iter().sum::<i64>() as f64 / samples.len() as f64;
        let var = samples.iter().map(|&x| (x as f64 - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.2);
        assert!((var.sqrt() - 3.2).abs() < 0.2);
    }

    #[test]
    fn test_gaussian_degenerate() {
        let gaussian = DiscreteGaussian::new(0.0).unwrap();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
        assert!((0..100).all(|_| gaussian.sample(&mut rng) == 0));
        assert!(DiscreteGaussian::new(-1.0).is_none());
        assert!(DiscreteGaussian::new(f64::NAN).is_none());
    }

    #[test]
    fn test_gaussian_narrow() {
        // Almost every draw is zero at this width.
        let gaussian = DiscreteGaussian::new(0.3).unwrap();
        assert_eq!(2, gaussian.tailcut());
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);
        let zeros = (0..1000).filter(|_| gaussian.sample(&mut rng) == 0).count();
        assert!(zeros > 950);
    }

    #[test]
    fn test_gaussian_wide() {
        // The tailcut squared does not fit in an i64.
        let gaussian = DiscreteGaussian::new(1e9).unwrap();
        assert_eq!(6_000_000_000, gaussian.tailcut());
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(4);
        for _ in 0..100 {
            assert!(gaussian.sample(&mut rng).abs() <= gaussian.tailcut());
        }
    }
}
