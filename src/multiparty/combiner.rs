use crate::{CombinedSecretKey, HeError, PrivateKey, Result};

impl CombinedSecretKey {

    /// Multiply every party's private key together.
    ///
    /// The product is independent of the order of the keys. Fails with
    /// [HeError::EmptyKeySet] when there is nothing to combine and with
    /// [HeError::DimensionMismatch] when keys come from different rings.
    pub fn combine<'a, I>(keys: I) -> Result<Self>
    where I: IntoIterator<Item = &'a PrivateKey>
    {
        let mut keys = keys.into_iter();
        let first = keys.next().ok_or(HeError::EmptyKeySet)?;
        let mut product = first.as_element().clone();
        let mut party_count = 1;
        for key in keys {
            product = product.try_mul(key.as_element())?;
            party_count += 1;
        }
        Ok(Self::from_parts(product, party_count))
    }

}

/// See [CombinedSecretKey::combine].
pub fn combine_secret_keys(keys: &[PrivateKey]) -> Result<CombinedSecretKey> {
    CombinedSecretKey::combine(keys)
}
