//! Model parameter validation errors.

use mc_core::PricingError;
use thiserror::Error;

/// Rejected model parameters.
///
/// Each variant carries the offending value so callers can report exactly
/// what was passed in.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Spot or forward price must be strictly positive.
    #[error("invalid spot/forward price: {0} (must be > 0)")]
    InvalidSpot(f64),

    /// Strike must be strictly positive.
    #[error("invalid strike: {0} (must be > 0)")]
    InvalidStrike(f64),

    /// Volatility must be non-negative.
    #[error("invalid volatility: {0} (must be >= 0)")]
    InvalidVolatility(f64),

    /// Time to maturity must be non-negative.
    #[error("invalid maturity: {0} (must be >= 0)")]
    InvalidMaturity(f64),

    /// Initial variance must be non-negative.
    #[error("invalid variance: {0} (must be >= 0)")]
    InvalidVariance(f64),

    /// Mean-reversion speed must be strictly positive.
    #[error("invalid mean-reversion speed: {0} (must be > 0)")]
    InvalidMeanReversion(f64),

    /// Correlation must lie in [-1, 1].
    #[error("invalid correlation: {0} (must be in [-1, 1])")]
    InvalidCorrelation(f64),

    /// CEV exponent must lie in [0, 1].
    #[error("invalid beta: {0} (must be in [0, 1])")]
    InvalidBeta(f64),

    /// Jump intensity must be non-negative.
    #[error("invalid jump intensity: {0} (must be >= 0)")]
    InvalidIntensity(f64),

    /// Step count must be strictly positive.
    #[error("invalid step count: {0} (must be >= 1)")]
    InvalidSteps(usize),
}

impl From<ModelError> for PricingError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidSpot(v) => PricingError::invalid("spot", v),
            ModelError::InvalidStrike(v) => PricingError::invalid("strike", v),
            ModelError::InvalidVolatility(v) => PricingError::invalid("volatility", v),
            ModelError::InvalidMaturity(v) => PricingError::invalid("maturity", v),
            ModelError::InvalidVariance(v) => PricingError::invalid("variance", v),
            ModelError::InvalidMeanReversion(v) => PricingError::invalid("kappa", v),
            ModelError::InvalidCorrelation(v) => PricingError::invalid("correlation", v),
            ModelError::InvalidBeta(v) => PricingError::invalid("beta", v),
            ModelError::InvalidIntensity(v) => PricingError::invalid("intensity", v),
            ModelError::InvalidSteps(v) => PricingError::invalid("steps", v as f64),
        }
    }
}
