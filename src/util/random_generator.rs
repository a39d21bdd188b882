use std::sync::atomic::{AtomicU64, Ordering};

use rand::{SeedableRng, RngCore};
use rand_chacha::ChaCha20Rng;
use crate::util::basic::HE_PRNG_SEED_BYTES;

#[derive(Copy, Clone, PartialEq, Eq)]
pub struct PRNGSeed(pub [u8; HE_PRNG_SEED_BYTES]);

impl Default for PRNGSeed {
    fn default() -> Self {
        PRNGSeed([0; HE_PRNG_SEED_BYTES])
    }
}

impl AsMut<[u8]> for PRNGSeed {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl AsRef<[u8]> for PRNGSeed {
    fn as_ref(&self) -> &[u8] {&self.0}
}

impl PRNGSeed {
    /// Expand a short seed into a full-width one.
    pub fn from_u64(seed: u64) -> Self {
        let mut ret = Self::default();
        let mut hasher = blake3::Hasher::new();
        hasher.update(&seed.to_le_bytes());
        hasher.finalize_xof().fill(&mut ret.0);
        ret
    }
}

/// Hands out one fresh [BlakeRNG] stream per call.
///
/// Unseeded factories draw every stream seed from the OS entropy source.
/// Seeded factories derive stream `k` as `BLAKE3(seed || k)`, so streams are
/// independent of each other and reproducible across runs.
pub struct BlakeRNGFactory {
    seed: Option<PRNGSeed>,
    counter: AtomicU64,
}

impl Default for BlakeRNGFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl BlakeRNGFactory {
    pub fn new() -> Self {
        Self {
            seed: None,
            counter: AtomicU64::new(0),
        }
    }

    pub fn from_seed(seed: PRNGSeed) -> Self {
        Self {
            seed: Some(seed),
            counter: AtomicU64::new(0),
        }
    }

    pub fn is_seeded(&self) -> bool {
        self.seed.is_some()
    }

    pub fn get_rng(&self) -> BlakeRNG {
        let stream = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut seed = PRNGSeed::default();
        match &self.seed {
            None => ChaCha20Rng::from_entropy().fill_bytes(&mut seed.0),
            Some(master) => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(master.as_ref());
                hasher.update(&stream.to_le_bytes());
                hasher.finalize_xof().fill(&mut seed.0);
            }
        }
        BlakeRNG::from_seed(seed)
    }
}

impl std::fmt::Debug for BlakeRNGFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlakeRNGFactory")
            .field("seeded", &self.is_seeded())
            .field("streams", &self.counter.load(Ordering::Relaxed))
            .finish()
    }
}

const BUFFER_SIZE: usize = 4096;

pub struct BlakeRNG {
    buffer: Box<[u8; BUFFER_SIZE]>,
    seed: PRNGSeed,
    counter: u64,
    buffer_current: usize,
}

impl SeedableRng for BlakeRNG {
    type Seed = PRNGSeed;

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            seed,
            counter: 0,
            buffer: Box::new([0; BUFFER_SIZE]),
            buffer_current: BUFFER_SIZE,
        }
    }

}

impl BlakeRNG {

    fn refill_buffer(&mut self) {
        let mut hash = blake3::Hasher::new();
        hash.update(self.seed.as_ref());
        hash.update(&self.counter.to_le_bytes());
        hash.finalize_xof().fill(self.buffer.as_mut_slice());
        self.buffer_current = 0;
        self.counter = self.counter.wrapping_add(1);
    }

    fn take<const W: usize>(&mut self) -> [u8; W] {
        if self.buffer_current + W > BUFFER_SIZE {
            self.refill_buffer();
        }
        let mut ret = [0; W];
        ret.copy_from_slice(&self.buffer[self.buffer_current..self.buffer_current + W]);
        self.buffer_current += W;
        ret
    }

}

impl RngCore for BlakeRNG {

    fn next_u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take::<4>())
    }

    fn next_u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take::<8>())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut i = 0;
        while i < dest.len() {
            if self.buffer_current >= BUFFER_SIZE {
                self.refill_buffer();
            }
            let len = std::cmp::min(dest.len() - i, BUFFER_SIZE - self.buffer_current);
            dest[i..i+len].copy_from_slice(&self.buffer[self.buffer_current..self.buffer_current+len]);
            i += len;
            self.buffer_current += len;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake_rng() {
        let mut rng = BlakeRNG::from_seed(PRNGSeed([1; 64]));
        let mut rng2 = BlakeRNG::from_seed(PRNGSeed([1; 64]));
        for _ in 0..1000 {
            assert_eq!(rng.next_u32(), rng2.next_u32());
            assert_eq!(rng.next_u64(), rng2.next_u64());
        }
        let mut rng3 = BlakeRNG::from_seed(PRNGSeed([2; 64]));
        assert_ne!(rng.next_u64(), rng3.next_u64());
    }

    #[test]
    fn test_blake_rng_factory_streams_differ() {
        let factory = BlakeRNGFactory::from_seed(PRNGSeed([1; 64]));
        let mut rng = factory.get_rng();
        let mut rng2 = factory.get_rng();
        let first: Vec<u64> = (0..16).map(|_| rng.next_u64()).collect();
        let second: Vec<u64> = (0..16).map(|_| rng2.next_u64()).collect();
        assert_ne!(first, second);
    }

    #[test]
    fn test_blake_rng_factory_reproducible() {
        let factory = BlakeRNGFactory::from_seed(PRNGSeed::from_u64(7));
        let factory2 = BlakeRNGFactory::from_seed(PRNGSeed::from_u64(7));
        for _ in 0..4 {
            let mut rng = factory.get_rng();
            let mut rng2 = factory2.get_rng();
            for _ in 0..100 {
                assert_eq!(rng.next_u64(), rng2.next_u64());
            }
        }
    }

    #[test]
    fn test_blake_rng_factory_randomized() {
        let factory = BlakeRNGFactory::new();
        assert!(!factory.is_seeded());
        let mut rng = factory.get_rng();
        let mut rng2 = factory.get_rng();
        let first: Vec<u64> = (0..16).map(|_| rng.next_u64()).collect();
        let second: Vec<u64> = (0..16).map(|_| rng2.next_u64()).collect();
        assert_ne!(first, second);
    }

}
