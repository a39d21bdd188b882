use sha2::Digest;

const HASH_BLOCK_U64_COUNT: usize = 4;

pub type HashBlock = [u64; HASH_BLOCK_U64_COUNT];

pub const HASH_ZERO_BLOCK: HashBlock = [0; HASH_BLOCK_U64_COUNT];

/// SHA-256 of the little-endian encoding of `input`, read back as four words.
#[inline]
pub fn hash(input: &[u64], destination: &mut HashBlock) {
    let mut hasher = sha2::Sha256::new();
    for word in input {
        hasher.update(word.to_le_bytes());
    }
    let out = hasher.finalize();
    for (dst, chunk) in destination.iter_mut().zip(out.chunks_exact(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        *dst = u64::from_le_bytes(word);
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn test_hash() {
        let data = [1u64, 2, 3, 4, 5, 6, 7, 8];
        let mut hashed = HASH_ZERO_BLOCK;
        hash(&data, &mut hashed);
        assert_eq!(
            hashed,
            [0xc91516ef25e48a80, 0x800f0651aad1f12c, 0x52396646e3748df1, 0xfa6485cfcd94ff4e],
        );
        let mut other = HASH_ZERO_BLOCK;
        hash(&[8, 320417, 3], &mut other);
        assert_ne!(hashed, other);
    }
}
