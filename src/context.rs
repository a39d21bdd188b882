use std::sync::Arc;

use crate::{
    util::{BlakeRNG, BlakeRNGFactory, DiscreteGaussian, PRNGSeed},
    HeError, ParmsID, Result, RingParameters,
};

/// Named parameter sets used by the tests and the command line tool.
///
/// None of them offers any security; they are sized so that the circuits the
/// kernel runs decrypt correctly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterPreset {
    /// N = 2, 60-bit q, noise deviation 0.3. Keys are almost always `f = 1`,
    /// which keeps products of ciphertexts under one key decryptable; used
    /// for the adder.
    ///
    /// At this width `g`, `s` and `e` are nearly always zero and ciphertexts
    /// are close to the plain bits, so a correct adder run here says nothing
    /// about the encryption hiding them.
    Toy,
    /// N = 8, q = 320417, noise deviation 3.2.
    Demo,
    /// N = 8, 40-bit q, noise deviation 3.2. Two- and three-party single
    /// gate circuits stay far below `q / 4`.
    Headroom,
}

impl ParameterPreset {

    /// `(degree, modulus, noise standard deviation)`.
    pub fn values(&self) -> (usize, u64, f64) {
        match self {
            ParameterPreset::Toy => (2, 1152921504606842753, 0.3),
            ParameterPreset::Demo => (8, 320417, 3.2),
            ParameterPreset::Headroom => (8, 1099511627297, 3.2),
        }
    }

}

impl std::fmt::Display for ParameterPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ParameterPreset::Toy => "toy",
            ParameterPreset::Demo => "demo",
            ParameterPreset::Headroom => "headroom",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ParameterPreset {
    type Err = HeError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "toy" => Ok(ParameterPreset::Toy),
            "demo" => Ok(ParameterPreset::Demo),
            "headroom" => Ok(ParameterPreset::Headroom),
            other => Err(HeError::InvalidParameters(format!("unknown preset {:?}", other))),
        }
    }
}

/// Session state shared by every party: the ring, the noise distribution and
/// the source of randomness.
///
/// Each call to [HeContext::create_random_generator] hands out an independent
/// stream, so no two encryptions or key generation attempts share noise.
/// Contexts built with a seed are reproducible run to run.
#[derive(Debug)]
pub struct HeContext {
    ring: Arc<RingParameters>,
    gaussian: DiscreteGaussian,
    random_generator_factory: BlakeRNGFactory,
}

impl HeContext {

    /// Create a context drawing randomness from the operating system.
    pub fn new(ring: Arc<RingParameters>, noise_std_dev: f64) -> Result<Arc<Self>> {
        Self::build(ring, noise_std_dev, BlakeRNGFactory::new())
    }

    /// Create a context whose randomness is derived from `seed`.
    pub fn with_seed(ring: Arc<RingParameters>, noise_std_dev: f64, seed: PRNGSeed) -> Result<Arc<Self>> {
        Self::build(ring, noise_std_dev, BlakeRNGFactory::from_seed(seed))
    }

    pub fn from_preset(preset: ParameterPreset) -> Result<Arc<Self>> {
        let (degree, modulus, noise_std_dev) = preset.values();
        Self::new(RingParameters::new(degree, modulus)?, noise_std_dev)
    }

    pub fn from_preset_with_seed(preset: ParameterPreset, seed: u64) -> Result<Arc<Self>> {
        let (degree, modulus, noise_std_dev) = preset.values();
        Self::with_seed(RingParameters::new(degree, modulus)?, noise_std_dev, PRNGSeed::from_u64(seed))
    }

    fn build(ring: Arc<RingParameters>, noise_std_dev: f64, factory: BlakeRNGFactory) -> Result<Arc<Self>> {
        let gaussian = DiscreteGaussian::new(noise_std_dev).ok_or_else(|| HeError::InvalidParameters(
            format!("noise standard deviation {} must be finite and non-negative", noise_std_dev)
        ))?;
        let half_modulus = ring.modulus().value() / 2;
        if gaussian.tailcut() as u64 > half_modulus {
            return Err(HeError::InvalidParameters(format!(
                "noise tailcut {} exceeds q / 2 = {}", gaussian.tailcut(), half_modulus
            )));
        }
        Ok(Arc::new(HeContext {
            ring,
            gaussian,
            random_generator_factory: factory,
        }))
    }

    pub fn ring(&self) -> &Arc<RingParameters> {&self.ring}
    pub fn parms_id(&self) -> &ParmsID {self.ring.parms_id()}
    pub fn gaussian(&self) -> &DiscreteGaussian {&self.gaussian}
    pub fn noise_std_dev(&self) -> f64 {self.gaussian.std_dev()}

    /// Get a fresh [BlakeRNG] stream.
    pub fn create_random_generator(&self) -> BlakeRNG {
        self.random_generator_factory.get_rng()
    }

}
