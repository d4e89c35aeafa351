//! Bermudan option pricing via Least-Squares Monte Carlo.
//!
//! A Bermudan exercises only on a discrete, known set of dates. The public
//! entry points take a count of uniformly spaced dates (the common quoting
//! convention); the general form with explicit exercise-time fractions is
//! [`lsm_bermudan`](crate::lsm::lsm_bermudan).

use mc_core::PricingError;

use crate::context::SimulationContext;
use crate::instruments::{validate_vanilla, OptionType};
use crate::lsm::lsm_bermudan;

/// Bermudan call with `num_exercise` uniform exercise dates, the last at
/// maturity.
///
/// # Examples
///
/// ```
/// use mc_pricing::context::SimulationContext;
/// use mc_pricing::instruments::bermudan::bermudan_put;
///
/// let mut ctx = SimulationContext::new();
/// ctx.set_simulations(20_000);
/// ctx.set_seed(42);
///
/// // Quarterly exercise over one year.
/// let price = bermudan_put(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 4).unwrap();
/// assert!(price > 0.0);
/// ```
pub fn bermudan_call(
    ctx: &SimulationContext,
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    num_exercise: usize,
) -> Result<f64, PricingError> {
    price_bermudan_uniform(ctx, spot, strike, rate, volatility, time, num_exercise, OptionType::Call)
}

/// Bermudan put with `num_exercise` uniform exercise dates.
pub fn bermudan_put(
    ctx: &SimulationContext,
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    num_exercise: usize,
) -> Result<f64, PricingError> {
    price_bermudan_uniform(ctx, spot, strike, rate, volatility, time, num_exercise, OptionType::Put)
}

#[allow(clippy::too_many_arguments)]
fn price_bermudan_uniform(
    ctx: &SimulationContext,
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    num_exercise: usize,
    option_type: OptionType,
) -> Result<f64, PricingError> {
    validate_vanilla(spot, strike, volatility, time)?;
    if num_exercise == 0 {
        return Err(PricingError::invalid("exercise_dates", 0.0));
    }

    let fractions: Vec<f64> = (1..=num_exercise)
        .map(|i| i as f64 / num_exercise as f64)
        .collect();

    lsm_bermudan(ctx, spot, strike, rate, volatility, time, &fractions, option_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_models::analytical::black_scholes_put;

    fn test_ctx() -> SimulationContext {
        let mut ctx = SimulationContext::new();
        ctx.set_simulations(50_000);
        ctx.set_seed(42);
        ctx
    }

    #[test]
    fn test_put_at_least_european() {
        let ctx = test_ctx();

        let bermudan = bermudan_put(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 12).unwrap();
        let european = black_scholes_put(100.0, 100.0, 0.05, 0.2, 1.0);

        assert!(bermudan >= european - 0.15, "bermudan = {bermudan}");
    }

    #[test]
    fn test_more_dates_weakly_increase_value() {
        // Extra exercise rights cannot hurt (up to Monte Carlo noise).
        let ctx = test_ctx();

        let quarterly = bermudan_put(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 4).unwrap();
        let monthly = bermudan_put(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 12).unwrap();

        assert!(monthly >= quarterly - 0.15);
    }

    #[test]
    fn test_zero_dates_rejected() {
        let ctx = test_ctx();
        assert!(bermudan_put(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 0).is_err());
    }
}
