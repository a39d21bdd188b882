
use crate::{
    Plaintext, Ciphertext, PrivateKey, PublicKey, CombinedSecretKey,
    HeContext, Domain, RingElement,
};

/// Provide methods for checking the validity of HE objects against a context.
pub trait ValCheck {
    /// Check whether the object was created under the context's ring parameters.
    fn is_metadata_valid_for(&self, context: &HeContext) -> bool;
    /// Check whether the buffer has one value per ring slot.
    fn is_buffer_valid(&self) -> bool;
    /// Check whether every value is reduced modulo `q`.
    fn is_data_valid_for(&self, context: &HeContext) -> bool;
    /// Check whether the object is valid.
    /// Shortcut for [ValCheck::is_metadata_valid_for], [ValCheck::is_data_valid_for] and [ValCheck::is_buffer_valid].
    fn is_valid_for(&self, context: &HeContext) -> bool {
        self.is_metadata_valid_for(context) && self.is_buffer_valid() && self.is_data_valid_for(context)
    }
}

impl<D: Domain> ValCheck for RingElement<D> {

    fn is_metadata_valid_for(&self, context: &HeContext) -> bool {
        self.ring().parms_id() == context.parms_id()
    }

    fn is_buffer_valid(&self) -> bool {
        self.values().len() == self.ring().degree()
    }

    fn is_data_valid_for(&self, context: &HeContext) -> bool {
        let modulus = context.ring().modulus().value();
        self.values().iter().all(|&x| x < modulus)
    }

}

macro_rules! impl_valcheck_via_element {
    ($($t:ty),*) => {$(
        impl ValCheck for $t {
            fn is_metadata_valid_for(&self, context: &HeContext) -> bool {
                self.as_element().is_metadata_valid_for(context)
            }
            fn is_buffer_valid(&self) -> bool {
                self.as_element().is_buffer_valid()
            }
            fn is_data_valid_for(&self, context: &HeContext) -> bool {
                self.as_element().is_data_valid_for(context)
            }
        }
    )*};
}

impl_valcheck_via_element!(Plaintext, Ciphertext, PrivateKey, PublicKey, CombinedSecretKey);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParameterPreset, KeyGenerator, RetryPolicy, Encryptor};

    #[test]
    fn test_valcheck() {
        let context = HeContext::from_preset_with_seed(ParameterPreset::Demo, 9).unwrap();
        let other = HeContext::from_preset_with_seed(ParameterPreset::Headroom, 9).unwrap();
        let keypair = KeyGenerator::new(context.clone()).generate_keypair_with_retry(&RetryPolicy::default()).unwrap();
        assert!(keypair.private_key().is_valid_for(&context));
        assert!(keypair.public_key().is_valid_for(&context));
        assert!(!keypair.public_key().is_valid_for(&other));

        let encryptor = Encryptor::new(context.clone(), keypair.public_key().clone());
        let cipher = encryptor.encrypt(1);
        assert!(cipher.is_valid_for(&context));
        assert!(!cipher.is_metadata_valid_for(&other));
        assert!(Plaintext::from_bit(context.ring(), 1).is_valid_for(&context));
        assert!(CombinedSecretKey::from(keypair.private_key()).is_valid_for(&context));
    }
}
