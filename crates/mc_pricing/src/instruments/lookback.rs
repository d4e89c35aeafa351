//! Lookback option pricing.
//!
//! The payoff depends on the running extremum over the observation grid:
//!
//! - floating strike: call pays `S(T) − min S`, put pays `max S − S(T)`
//! - fixed strike:    call pays `max(max S − K, 0)`, put pays `max(K − min S, 0)`
//!
//! Discrete monitoring under-estimates the continuous extremes, so the
//! estimator sits slightly below the Goldman-Sosin-Gatto continuous values
//! and converges from below as the grid refines.

use mc_core::PricingError;
use mc_models::models::GbmPath;

use crate::context::SimulationContext;
use crate::executor::{run_mean, PartialSum};
use crate::instruments::{validate_vanilla, OptionType};

/// Whether the extremum replaces the strike or is struck against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookbackStrike {
    /// Strike is the realised extremum.
    Floating,
    /// Fixed strike against the realised extremum.
    Fixed,
}

/// Payoff for one trajectory.
fn lookback_path_payoff(
    path: &[f64],
    strike: f64,
    strike_style: LookbackStrike,
    option_type: OptionType,
) -> f64 {
    let mut path_min = path[0];
    let mut path_max = path[0];
    for &s in &path[1..] {
        path_min = path_min.min(s);
        path_max = path_max.max(s);
    }
    let terminal = path[path.len() - 1];

    match (strike_style, option_type) {
        // Buy at the minimum / sell at the maximum: never negative.
        (LookbackStrike::Floating, OptionType::Call) => terminal - path_min,
        (LookbackStrike::Floating, OptionType::Put) => path_max - terminal,
        (LookbackStrike::Fixed, OptionType::Call) => (path_max - strike).max(0.0),
        (LookbackStrike::Fixed, OptionType::Put) => (strike - path_min).max(0.0),
    }
}

/// Lookback call price.
///
/// For the floating style the `strike` argument is ignored by the payoff
/// (the realised minimum takes its place) but still validated.
///
/// # Examples
///
/// ```
/// use mc_pricing::context::SimulationContext;
/// use mc_pricing::instruments::lookback::{lookback_call, LookbackStrike};
///
/// let mut ctx = SimulationContext::new();
/// ctx.set_simulations(20_000);
/// ctx.set_seed(42);
///
/// let price = lookback_call(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 252,
///                           LookbackStrike::Floating).unwrap();
/// assert!(price > 0.0);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn lookback_call(
    ctx: &SimulationContext,
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    num_steps: usize,
    strike_style: LookbackStrike,
) -> Result<f64, PricingError> {
    price_lookback(
        ctx, spot, strike, rate, volatility, time, num_steps, strike_style, OptionType::Call,
    )
}

/// Lookback put price.
#[allow(clippy::too_many_arguments)]
pub fn lookback_put(
    ctx: &SimulationContext,
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    num_steps: usize,
    strike_style: LookbackStrike,
) -> Result<f64, PricingError> {
    price_lookback(
        ctx, spot, strike, rate, volatility, time, num_steps, strike_style, OptionType::Put,
    )
}

#[allow(clippy::too_many_arguments)]
fn price_lookback(
    ctx: &SimulationContext,
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    num_steps: usize,
    strike_style: LookbackStrike,
    option_type: OptionType,
) -> Result<f64, PricingError> {
    validate_vanilla(spot, strike, volatility, time)?;
    if num_steps == 0 {
        return Err(PricingError::invalid("steps", 0.0));
    }

    let model = GbmPath::new(spot, rate, volatility, time, num_steps)?;
    let antithetic = ctx.antithetic();

    let mean = run_mean(
        ctx.master_rng(),
        ctx.simulations(),
        ctx.threads(),
        move |rng, count| {
            let mut path = vec![0.0; num_steps + 1];

            if antithetic {
                let mut mirror = vec![0.0; num_steps + 1];
                let pairs = (count / 2).max(1);
                let mut sum = 0.0;
                for _ in 0..pairs {
                    model.simulate_antithetic_paths(rng, &mut path, &mut mirror);
                    sum += lookback_path_payoff(&path, strike, strike_style, option_type);
                    sum += lookback_path_payoff(&mirror, strike, strike_style, option_type);
                }
                PartialSum {
                    sum,
                    paths: 2 * pairs,
                }
            } else {
                let mut sum = 0.0;
                for _ in 0..count {
                    model.simulate_path(rng, &mut path);
                    sum += lookback_path_payoff(&path, strike, strike_style, option_type);
                }
                PartialSum { sum, paths: count }
            }
        },
    );

    Ok(model.discount() * mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mc_models::analytical::{lookback_floating_call, lookback_floating_put};

    fn test_ctx(simulations: u64) -> SimulationContext {
        let mut ctx = SimulationContext::new();
        ctx.set_simulations(simulations);
        ctx.set_seed(42);
        ctx
    }

    #[test]
    fn test_floating_call_approaches_gsg_from_below() {
        let ctx = test_ctx(50_000);

        let mc = lookback_call(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 252,
                               LookbackStrike::Floating)
            .unwrap();
        let analytic = lookback_floating_call(100.0, 0.05, 0.2, 1.0);

        // Discrete minimum ≥ continuous minimum: the estimator is biased low.
        assert!(mc < analytic + 0.3);
        assert!(mc > analytic - 2.5);
    }

    #[test]
    fn test_floating_put_approaches_gsg_from_below() {
        let ctx = test_ctx(50_000);

        let mc = lookback_put(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 252,
                              LookbackStrike::Floating)
            .unwrap();
        let analytic = lookback_floating_put(100.0, 0.05, 0.2, 1.0);

        assert!(mc < analytic + 0.3);
        assert!(mc > analytic - 2.5);
    }

    #[test]
    fn test_floating_payoffs_never_negative() {
        // Pathwise S(T) ≥ min and max ≥ S(T); prices must be comfortably
        // positive.
        let ctx = test_ctx(10_000);

        let call = lookback_call(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 64,
                                 LookbackStrike::Floating)
            .unwrap();
        let put = lookback_put(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 64,
                               LookbackStrike::Floating)
            .unwrap();

        assert!(call > 0.0);
        assert!(put > 0.0);
    }

    #[test]
    fn test_fixed_call_dominates_european() {
        use mc_models::analytical::black_scholes_call;

        // max S ≥ S(T) pathwise, so the fixed lookback dominates the vanilla.
        let ctx = test_ctx(20_000);
        let fixed = lookback_call(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 252,
                                  LookbackStrike::Fixed)
            .unwrap();
        let european = black_scholes_call(100.0, 100.0, 0.05, 0.2, 1.0);

        assert!(fixed > european);
    }

    #[test]
    fn test_more_steps_raise_extreme_value() {
        // Finer monitoring can only widen the observed extremes.
        let ctx = test_ctx(20_000);

        let coarse = lookback_call(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 12,
                                   LookbackStrike::Floating)
            .unwrap();
        let fine = lookback_call(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 252,
                                 LookbackStrike::Floating)
            .unwrap();

        assert!(fine > coarse);
    }

    #[test]
    fn test_antithetic_consistent() {
        let plain_ctx = test_ctx(100_000);
        let mut anti_ctx = test_ctx(100_000);
        anti_ctx.set_antithetic(true);

        let plain = lookback_call(&plain_ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 64,
                                  LookbackStrike::Floating)
            .unwrap();
        let anti = lookback_call(&anti_ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 64,
                                 LookbackStrike::Floating)
            .unwrap();

        assert_relative_eq!(plain, anti, epsilon = 0.5);
    }
}
