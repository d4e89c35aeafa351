//! Payoff drivers.
//!
//! One module per contract family. Each public pricing function follows the
//! same protocol: validate inputs, snapshot the context parameters, pick the
//! variant (plain / antithetic / parallel) and hand a worker closure to the
//! executor. Discounting happens once, on the reduced mean.

pub mod american;
pub mod asian;
pub mod barrier;
pub mod bermudan;
pub mod digital;
pub mod european;
pub mod lookback;

pub use asian::{AsianAveraging, AsianStrike};
pub use barrier::BarrierStyle;
pub use digital::DigitalStyle;
pub use lookback::LookbackStrike;

use mc_core::PricingError;

/// Call or put.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionType {
    /// Right to buy at the strike.
    Call,
    /// Right to sell at the strike.
    Put,
}

impl OptionType {
    /// Vanilla terminal payoff `max(±(S − K), 0)`.
    #[inline]
    pub fn payoff(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

/// Common validation for vanilla-style inputs.
///
/// Non-positive spot or strike, negative volatility or negative time are
/// rejected before any simulation starts.
pub(crate) fn validate_vanilla(
    spot: f64,
    strike: f64,
    volatility: f64,
    time: f64,
) -> Result<(), PricingError> {
    if spot <= 0.0 || !spot.is_finite() {
        return Err(PricingError::invalid("spot", spot));
    }
    if strike <= 0.0 || !strike.is_finite() {
        return Err(PricingError::invalid("strike", strike));
    }
    if volatility < 0.0 || !volatility.is_finite() {
        return Err(PricingError::invalid("volatility", volatility));
    }
    if time < 0.0 || !time.is_finite() {
        return Err(PricingError::invalid("time", time));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payoffs() {
        assert_eq!(OptionType::Call.payoff(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.payoff(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.payoff(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.payoff(110.0, 100.0), 0.0);
    }

    #[test]
    fn test_validation() {
        assert!(validate_vanilla(100.0, 100.0, 0.2, 1.0).is_ok());
        assert!(validate_vanilla(0.0, 100.0, 0.2, 1.0).is_err());
        assert!(validate_vanilla(100.0, -1.0, 0.2, 1.0).is_err());
        assert!(validate_vanilla(100.0, 100.0, -0.2, 1.0).is_err());
        assert!(validate_vanilla(100.0, 100.0, 0.2, -1.0).is_err());
        assert!(validate_vanilla(f64::NAN, 100.0, 0.2, 1.0).is_err());
    }
}
