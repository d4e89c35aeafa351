//! American option pricing via Least-Squares Monte Carlo.
//!
//! An American contract may exercise at any time; on a simulation grid that
//! means every step is an exercise opportunity, which is exactly the
//! [`lsm`](crate::lsm) protocol with the step count as the opportunity
//! count.
//!
//! American calls on non-dividend underlyings carry no early-exercise
//! premium (they price at the European value up to Monte Carlo noise), so
//! the method earns its keep on puts.

use mc_core::PricingError;

use crate::context::SimulationContext;
use crate::instruments::{validate_vanilla, OptionType};
use crate::lsm::lsm_american;

/// Exercise opportunities used when the caller passes zero (weekly over a
/// typical one-year horizon).
const DEFAULT_AMERICAN_STEPS: usize = 52;

/// American call price. `num_steps` of zero selects the weekly default.
///
/// # Examples
///
/// ```
/// use mc_pricing::context::SimulationContext;
/// use mc_pricing::instruments::american::american_put;
///
/// let mut ctx = SimulationContext::new();
/// ctx.set_simulations(20_000);
/// ctx.set_seed(42);
///
/// let price = american_put(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 50).unwrap();
/// assert!(price > 5.0); // above the European put
/// ```
pub fn american_call(
    ctx: &SimulationContext,
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    num_steps: usize,
) -> Result<f64, PricingError> {
    price_american(ctx, spot, strike, rate, volatility, time, num_steps, OptionType::Call)
}

/// American put price. `num_steps` of zero selects the weekly default.
pub fn american_put(
    ctx: &SimulationContext,
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    num_steps: usize,
) -> Result<f64, PricingError> {
    price_american(ctx, spot, strike, rate, volatility, time, num_steps, OptionType::Put)
}

#[allow(clippy::too_many_arguments)]
fn price_american(
    ctx: &SimulationContext,
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    num_steps: usize,
    option_type: OptionType,
) -> Result<f64, PricingError> {
    validate_vanilla(spot, strike, volatility, time)?;

    let steps = if num_steps == 0 {
        DEFAULT_AMERICAN_STEPS
    } else {
        num_steps
    };

    lsm_american(ctx, spot, strike, rate, volatility, time, steps, option_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_models::analytical::black_scholes_put;

    #[test]
    fn test_default_steps_applied() {
        let mut ctx = SimulationContext::new();
        ctx.set_simulations(5_000);
        ctx.set_seed(42);

        let price = american_put(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 0).unwrap();
        assert!(price > 0.0);
    }

    #[test]
    fn test_put_premium_over_european() {
        let mut ctx = SimulationContext::new();
        ctx.set_simulations(50_000);
        ctx.set_seed(42);

        let american = american_put(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 50).unwrap();
        let european = black_scholes_put(100.0, 100.0, 0.05, 0.2, 1.0);

        assert!(american >= european - 0.10);
    }

    #[test]
    fn test_validation() {
        let ctx = SimulationContext::new();
        assert!(american_put(&ctx, -1.0, 100.0, 0.05, 0.2, 1.0, 50).is_err());
        assert!(american_put(&ctx, 100.0, 100.0, 0.05, -0.2, 1.0, 50).is_err());
    }
}
