//! Reading generator error types

use thiserror::Error;

/// Errors raised while constructing a generator
///
/// Producing a reading never fails; these are startup conditions.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Range bounds are not finite or `min > max`
    #[error("Invalid value range: [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    /// More decimal places than an `f64` can carry
    #[error("Invalid decimals: {decimals} (maximum {max})")]
    InvalidDecimals { decimals: u32, max: u32 },

    /// The operating system random source could not seed the generator
    #[error("Random source unavailable: {0}")]
    RandomSource(#[from] rand::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeneratorError::InvalidRange { min: 5.0, max: 0.0 };
        assert_eq!(err.to_string(), "Invalid value range: [5, 0]");

        let err = GeneratorError::InvalidDecimals { decimals: 400, max: 15 };
        assert_eq!(err.to_string(), "Invalid decimals: 400 (maximum 15)");
    }
}
