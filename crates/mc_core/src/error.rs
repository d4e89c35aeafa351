//! Engine-wide error taxonomy.
//!
//! Every fallible operation in the pricing engine reports one of the variants
//! below. The taxonomy is deliberately small: pricing calls either succeed
//! with a finite value or propagate a structured error through `Result`.
//! There are no panics and no sentinel return values in library code.

use thiserror::Error;

/// Errors reported by the pricing engine.
///
/// The `Display` implementation doubles as the error-string table: calling
/// `to_string()` on a variant yields the stable, human-readable description.
///
/// # Examples
///
/// ```
/// use mc_core::PricingError;
///
/// let err = PricingError::invalid("volatility", -0.2);
/// assert!(err.to_string().contains("volatility"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// An input failed validation (non-positive spot/strike, negative
    /// volatility or time, zero path count, and so on).
    #[error("invalid argument `{name}` = {value}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A scratch-buffer allocation failed.
    #[error("out of memory: could not reserve {bytes} bytes")]
    OutOfMemory {
        /// Requested allocation size.
        bytes: usize,
    },

    /// Worker threads could not be created or joined.
    #[error("threading failure: {0}")]
    ThreadFailure(String),
}

impl PricingError {
    /// Shorthand for [`PricingError::InvalidArgument`].
    #[inline]
    pub fn invalid(name: &'static str, value: f64) -> Self {
        Self::InvalidArgument { name, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_strings() {
        let err = PricingError::invalid("spot", -1.0);
        assert_eq!(err.to_string(), "invalid argument `spot` = -1");

        let err = PricingError::OutOfMemory { bytes: 1024 };
        assert!(err.to_string().contains("1024"));

        let err = PricingError::ThreadFailure("join failed".to_string());
        assert!(err.to_string().contains("join failed"));
    }
}
