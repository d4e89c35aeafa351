//! Digital (binary) option pricing.
//!
//! Terminal-only payoffs: cash-or-nothing pays a fixed amount when the
//! option finishes in the money, asset-or-nothing delivers the underlying.
//! The GBM terminal kernel applies directly; antithetic pairing and the
//! parallel executor compose as for vanilla Europeans.

use mc_core::PricingError;
use mc_models::models::Gbm;

use crate::context::SimulationContext;
use crate::executor::{run_mean, PartialSum};
use crate::instruments::{validate_vanilla, OptionType};

/// Digital payoff style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigitalStyle {
    /// Pays a fixed cash amount when in the money.
    CashOrNothing,
    /// Delivers the underlying when in the money.
    AssetOrNothing,
}

#[inline]
fn digital_payoff(
    terminal: f64,
    strike: f64,
    payout: f64,
    style: DigitalStyle,
    option_type: OptionType,
) -> f64 {
    let in_the_money = match option_type {
        OptionType::Call => terminal > strike,
        OptionType::Put => terminal < strike,
    };

    if !in_the_money {
        return 0.0;
    }

    match style {
        DigitalStyle::CashOrNothing => payout,
        DigitalStyle::AssetOrNothing => terminal,
    }
}

/// Digital call price.
///
/// # Examples
///
/// ```
/// use mc_pricing::context::SimulationContext;
/// use mc_pricing::instruments::digital::{digital_call, digital_put};
/// use mc_pricing::instruments::DigitalStyle;
///
/// let mut ctx = SimulationContext::new();
/// ctx.set_seed(42);
///
/// // Cash digital call + put always pays out: e^{-rT} in present value.
/// let style = DigitalStyle::CashOrNothing;
/// let call = digital_call(&ctx, 100.0, 100.0, 1.0, 0.05, 0.2, 1.0, style).unwrap();
/// let put = digital_put(&ctx, 100.0, 100.0, 1.0, 0.05, 0.2, 1.0, style).unwrap();
/// assert!((call + put - (-0.05f64).exp()).abs() < 0.01);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn digital_call(
    ctx: &SimulationContext,
    spot: f64,
    strike: f64,
    payout: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    style: DigitalStyle,
) -> Result<f64, PricingError> {
    price_digital(ctx, spot, strike, payout, rate, volatility, time, style, OptionType::Call)
}

/// Digital put price.
#[allow(clippy::too_many_arguments)]
pub fn digital_put(
    ctx: &SimulationContext,
    spot: f64,
    strike: f64,
    payout: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    style: DigitalStyle,
) -> Result<f64, PricingError> {
    price_digital(ctx, spot, strike, payout, rate, volatility, time, style, OptionType::Put)
}

#[allow(clippy::too_many_arguments)]
fn price_digital(
    ctx: &SimulationContext,
    spot: f64,
    strike: f64,
    payout: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    style: DigitalStyle,
    option_type: OptionType,
) -> Result<f64, PricingError> {
    validate_vanilla(spot, strike, volatility, time)?;
    if payout < 0.0 || !payout.is_finite() {
        return Err(PricingError::invalid("payout", payout));
    }

    let model = Gbm::new(spot, rate, volatility, time)?;
    let antithetic = ctx.antithetic();

    let mean = run_mean(
        ctx.master_rng(),
        ctx.simulations(),
        ctx.threads(),
        move |rng, count| {
            if antithetic {
                let pairs = (count / 2).max(1);
                let mut sum = 0.0;
                for _ in 0..pairs {
                    let (plus, minus) = model.simulate_antithetic(rng);
                    sum += digital_payoff(plus, strike, payout, style, option_type);
                    sum += digital_payoff(minus, strike, payout, style, option_type);
                }
                PartialSum {
                    sum,
                    paths: 2 * pairs,
                }
            } else {
                let mut sum = 0.0;
                for _ in 0..count {
                    let terminal = model.simulate_terminal(rng);
                    sum += digital_payoff(terminal, strike, payout, style, option_type);
                }
                PartialSum { sum, paths: count }
            }
        },
    );

    Ok(model.discount() * mean)
}
