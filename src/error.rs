use thiserror::Error;

/// Errors reported by the kernel.
///
/// Precondition violations (mixing ring parameters inside the [Evaluator](crate::Evaluator),
/// encrypting a value other than 0 or 1) panic instead; everything a caller is
/// expected to handle is returned as one of these variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeError {
    /// The sampled `f` has a zero evaluation and cannot serve as a private key.
    #[error("sampled key polynomial is not invertible")]
    NotInvertible,

    /// Every key generation attempt allowed by the retry policy failed.
    #[error("key generation failed after {attempts} attempts")]
    KeyGenerationExhausted { attempts: usize },

    /// Operands live in rings with different parameters.
    #[error("ring parameters mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: String, found: String },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Adder operands of different bit widths.
    #[error("operand widths differ: {left} vs {right}")]
    WidthMismatch { left: usize, right: usize },

    #[error("no secret keys to combine")]
    EmptyKeySet,

    #[error("invalid binary digit {0:?}")]
    InvalidBinaryDigit(char),
}

pub type Result<T> = std::result::Result<T, HeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            "key generation failed after 1000 attempts",
            HeError::KeyGenerationExhausted { attempts: 1000 }.to_string()
        );
        assert_eq!("invalid binary digit '2'", HeError::InvalidBinaryDigit('2').to_string());
        assert_eq!("operand widths differ: 3 vs 2", HeError::WidthMismatch { left: 3, right: 2 }.to_string());
    }
}
