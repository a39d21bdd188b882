use std::sync::Arc;

use crate::{
    Decryptor, Encryptor, Evaluator, HeContext, KeyGenerator, KeyPair,
    MultipartySession, ParameterPreset, Result, RetryPolicy,
};

/// Create the single-party suite: one key pair, with an encryptor and a
/// decryptor for it.
pub fn create_single_party_suite(preset: ParameterPreset, seed: Option<u64>)
    -> Result<(Arc<HeContext>, KeyPair, Encryptor, Decryptor, Evaluator)>
{
    let context = create_context(preset, seed)?;
    let keypair = KeyGenerator::new(context.clone()).generate_keypair_with_retry(&RetryPolicy::default())?;
    let encryptor = Encryptor::new(context.clone(), keypair.public_key().clone());
    let decryptor = Decryptor::new(context.clone(), keypair.private_key().into());
    let evaluator = Evaluator::new(context.clone());
    Ok((context, keypair, encryptor, decryptor, evaluator))
}

/// Create a multikey session of `party_count` parties with the default retry policy.
pub fn create_multiparty_suite(preset: ParameterPreset, party_count: usize, seed: Option<u64>)
    -> Result<(MultipartySession, Evaluator, Decryptor)>
{
    let context = create_context(preset, seed)?;
    let session = MultipartySession::setup(context, party_count, &RetryPolicy::default())?;
    let evaluator = session.evaluator();
    let decryptor = session.decryptor();
    Ok((session, evaluator, decryptor))
}

fn create_context(preset: ParameterPreset, seed: Option<u64>) -> Result<Arc<HeContext>> {
    match seed {
        Some(seed) => HeContext::from_preset_with_seed(preset, seed),
        None => HeContext::from_preset(preset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_party_suite() {
        let (context, _keypair, encryptor, decryptor, evaluator)
            = create_single_party_suite(ParameterPreset::Headroom, Some(71)).unwrap();
        assert_eq!(8, context.ring().degree());
        let sum = evaluator.add_new(&encryptor.encrypt(1), &encryptor.encrypt(0));
        assert_eq!(1, decryptor.decrypt(&sum));
    }

    #[test]
    fn test_multiparty_suite() {
        let (session, evaluator, decryptor) = create_multiparty_suite(ParameterPreset::Headroom, 2, Some(72)).unwrap();
        let c0 = session.encryptor(0).unwrap().encrypt(1);
        let c1 = session.encryptor(1).unwrap().encrypt(0);
        assert_eq!(0, decryptor.decrypt(&evaluator.multiply_new(&c0, &c1)));
        assert!(create_multiparty_suite(ParameterPreset::Demo, 0, None).is_err());
    }
}
