//! mkfhe: command line demos of the multikey homomorphic bit kernel.
//!
//! Every subcommand runs a small circuit under encryption and checks the
//! decrypted result against the same computation done in the clear.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use eyre::{bail, Result};
use rand::Rng;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use mkfhe::{bits, BinaryAdderCircuit, HeContext, MultipartySession, ParameterPreset, RetryPolicy};

#[derive(Parser)]
#[command(name = "mkfhe")]
#[command(about = "Multikey homomorphic encryption of bits")]
#[command(version)]
struct Args {
    /// Log every key generation attempt and adder position
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add two binary numbers under encryption
    Add {
        /// First operand, most significant digit first (random when omitted)
        #[arg(long)]
        a: Option<String>,
        /// Second operand, most significant digit first (random when omitted)
        #[arg(long)]
        b: Option<String>,
        #[arg(long, default_value_t = 2)]
        parties: usize,
        #[arg(long, default_value_t = ParameterPreset::Toy)]
        preset: ParameterPreset,
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Check XOR and AND of two bits encrypted by two parties
    Ops {
        #[arg(long, default_value_t = 1)]
        a: u8,
        #[arg(long, default_value_t = 1)]
        b: u8,
        #[arg(long, default_value_t = ParameterPreset::Headroom)]
        preset: ParameterPreset,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Agree on a random seed: every party contributes random bits and the
    /// encrypted contributions are XORed position by position
    Seed {
        #[arg(long, default_value_t = 3)]
        parties: usize,
        /// Seed length in bits
        #[arg(long, default_value_t = 32)]
        bits: usize,
        #[arg(long, default_value_t = ParameterPreset::Headroom)]
        preset: ParameterPreset,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn create_context(preset: ParameterPreset, seed: Option<u64>) -> Result<Arc<HeContext>> {
    let context = match seed {
        Some(seed) => HeContext::from_preset_with_seed(preset, seed)?,
        None => HeContext::from_preset(preset)?,
    };
    let (degree, modulus, std_dev) = preset.values();
    info!("Parameters: {} (N = {}, q = {}, sigma = {})", preset, degree, modulus, std_dev);
    Ok(context)
}

fn random_operand<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(1..=3);
    bits::to_binary_string(&bits::random_bits(rng, len))
}

fn run_add(a: Option<String>, b: Option<String>, parties: usize, preset: ParameterPreset, seed: Option<u64>) -> Result<bool> {
    if parties < 2 {
        bail!("the adder needs at least two parties, got {}", parties);
    }
    let context = create_context(preset, seed)?;
    let mut rng = context.create_random_generator();
    let a = a.unwrap_or_else(|| random_operand(&mut rng));
    let b = b.unwrap_or_else(|| random_operand(&mut rng));
    let mut a_bits = bits::parse_binary(&a)?;
    let mut b_bits = bits::parse_binary(&b)?;
    let width = a_bits.len().max(b_bits.len());
    bits::pad_to(&mut a_bits, width);
    bits::pad_to(&mut b_bits, width);
    info!("Adding {} + {}", bits::to_binary_string(&a_bits), bits::to_binary_string(&b_bits));

    let session = MultipartySession::setup(context, parties, &RetryPolicy::default())?;
    let evaluator = session.evaluator();
    let (first, second) = match (session.encryptor(0), session.encryptor(1)) {
        (Some(first), Some(second)) => (first, second),
        _ => bail!("session has fewer than two parties"),
    };
    let encrypted_a = first.encrypt_bits(&a_bits);
    let encrypted_b = second.encrypt_bits(&b_bits);
    let carry_in = first.encrypt(0);

    let output = BinaryAdderCircuit::new(&evaluator).add(&encrypted_a, &encrypted_b, &carry_in)?;
    let decrypted = output.decrypt_to_string(&session.decryptor());
    let expected = bits::to_binary_string(&bits::plain_add(&a_bits, &b_bits));
    info!("Homomorphic sum: {} (trimmed {})", decrypted, bits::trim_leading_zeros(&decrypted));
    info!("Plaintext sum:   {}", expected);
    Ok(decrypted == expected)
}

fn run_ops(a: u8, b: u8, preset: ParameterPreset, seed: Option<u64>) -> Result<bool> {
    if a > 1 || b > 1 {
        bail!("operands must be bits, got {} and {}", a, b);
    }
    let context = create_context(preset, seed)?;
    let session = MultipartySession::setup(context, 2, &RetryPolicy::default())?;
    let evaluator = session.evaluator();
    let decryptor = session.decryptor();
    let (first, second) = match (session.encryptor(0), session.encryptor(1)) {
        (Some(first), Some(second)) => (first, second),
        _ => bail!("session has fewer than two parties"),
    };
    let (c1, c2) = (first.encrypt(a), second.encrypt(b));

    let sum = evaluator.add_new(&c1, &c2);
    let product = evaluator.multiply_new(&c1, &c2);
    let xor = decryptor.decrypt(&sum);
    let and = decryptor.decrypt(&product);
    debug!(
        xor_noise = decryptor.noise_magnitude(&sum),
        and_noise = decryptor.noise_magnitude(&product),
        "noise after one gate"
    );
    info!("{} XOR {} = {} (expected {})", a, b, xor, a ^ b);
    info!("{} AND {} = {} (expected {})", a, b, and, a & b);
    Ok(xor == a ^ b && and == a & b)
}

fn run_seed(parties: usize, length: usize, preset: ParameterPreset, seed: Option<u64>) -> Result<bool> {
    let context = create_context(preset, seed)?;
    let session = MultipartySession::setup(context.clone(), parties, &RetryPolicy::default())?;
    let evaluator = session.evaluator();
    let mut contributions = Vec::with_capacity(parties);
    let mut encrypted = Vec::with_capacity(parties);
    for participant in session.participants() {
        let mut rng = context.create_random_generator();
        let contribution = bits::random_bits(&mut rng, length);
        debug!(party = participant.id(), bits = %bits::format_bits(&contribution), "contribution");
        encrypted.push(participant.encryptor(&context).encrypt_bits(&contribution));
        contributions.push(contribution);
    }
    let combined = evaluator.xor_columns(&encrypted)?;
    let decrypted = session.decryptor().decrypt_bits(&combined);
    let expected = bits::plain_xor_columns(&contributions)?;
    info!("Shared seed: {}", bits::to_binary_string(&decrypted));
    info!("Expected:    {}", bits::to_binary_string(&expected));
    Ok(decrypted == expected)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose {Level::DEBUG} else {Level::INFO};
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let success = match args.command {
        Command::Add {a, b, parties, preset, seed} => run_add(a, b, parties, preset, seed)?,
        Command::Ops {a, b, preset, seed} => run_ops(a, b, preset, seed)?,
        Command::Seed {parties, bits, preset, seed} => run_seed(parties, bits, preset, seed)?,
    };
    if !success {
        bail!("FAILURE: homomorphic result differs from the plaintext reference");
    }
    info!("SUCCESS");
    Ok(())
}
