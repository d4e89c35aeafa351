//! Digital (binary) option closed forms.
//!
//! Cash-or-nothing pays a fixed amount when the option finishes in the
//! money; asset-or-nothing delivers the underlying itself:
//!
//! ```text
//! cash call  = Q·e^(−rT)·N(d₂)        asset call = S·N(d₁)
//! cash put   = Q·e^(−rT)·N(−d₂)       asset put  = S·N(−d₁)
//! ```

use mc_core::math::norm_cdf;

#[inline]
fn d1_d2(spot: f64, strike: f64, rate: f64, volatility: f64, time: f64) -> (f64, f64) {
    let sqrt_t = time.sqrt();
    let d1 =
        ((spot / strike).ln() + (rate + 0.5 * volatility * volatility) * time) / (volatility * sqrt_t);
    (d1, d1 - volatility * sqrt_t)
}

/// Cash-or-nothing call: pays `payout` when `S(T) > K`.
///
/// # Examples
///
/// ```
/// use mc_models::analytical::{digital_cash_call, digital_cash_put};
///
/// // Call + put always pays the payout: prices sum to its present value.
/// let call = digital_cash_call(100.0, 100.0, 1.0, 0.05, 0.2, 1.0);
/// let put = digital_cash_put(100.0, 100.0, 1.0, 0.05, 0.2, 1.0);
/// assert!((call + put - (-0.05f64).exp()).abs() < 1e-9);
/// ```
pub fn digital_cash_call(
    spot: f64,
    strike: f64,
    payout: f64,
    rate: f64,
    volatility: f64,
    time: f64,
) -> f64 {
    if time <= 0.0 {
        return if spot > strike { payout } else { 0.0 };
    }
    if volatility <= 0.0 {
        let df = (-rate * time).exp();
        return if spot > strike * df { payout * df } else { 0.0 };
    }

    let (_, d2) = d1_d2(spot, strike, rate, volatility, time);
    payout * (-rate * time).exp() * norm_cdf(d2)
}

/// Cash-or-nothing put: pays `payout` when `S(T) < K`.
pub fn digital_cash_put(
    spot: f64,
    strike: f64,
    payout: f64,
    rate: f64,
    volatility: f64,
    time: f64,
) -> f64 {
    if time <= 0.0 {
        return if spot < strike { payout } else { 0.0 };
    }
    if volatility <= 0.0 {
        let df = (-rate * time).exp();
        return if spot < strike * df { payout * df } else { 0.0 };
    }

    let (_, d2) = d1_d2(spot, strike, rate, volatility, time);
    payout * (-rate * time).exp() * norm_cdf(-d2)
}

/// Asset-or-nothing call: delivers `S(T)` when `S(T) > K`.
pub fn digital_asset_call(spot: f64, strike: f64, rate: f64, volatility: f64, time: f64) -> f64 {
    if time <= 0.0 {
        return if spot > strike { spot } else { 0.0 };
    }
    if volatility <= 0.0 {
        let df = (-rate * time).exp();
        return if spot > strike * df { spot } else { 0.0 };
    }

    let (d1, _) = d1_d2(spot, strike, rate, volatility, time);
    spot * norm_cdf(d1)
}

/// Asset-or-nothing put: delivers `S(T)` when `S(T) < K`.
pub fn digital_asset_put(spot: f64, strike: f64, rate: f64, volatility: f64, time: f64) -> f64 {
    if time <= 0.0 {
        return if spot < strike { spot } else { 0.0 };
    }
    if volatility <= 0.0 {
        let df = (-rate * time).exp();
        return if spot < strike * df { spot } else { 0.0 };
    }

    let (d1, _) = d1_d2(spot, strike, rate, volatility, time);
    spot * norm_cdf(-d1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cash_parity() {
        // S=K=100, payout 1: call + put = e^{-rT} = 0.9512...
        let call = digital_cash_call(100.0, 100.0, 1.0, 0.05, 0.2, 1.0);
        let put = digital_cash_put(100.0, 100.0, 1.0, 0.05, 0.2, 1.0);

        assert_relative_eq!(call + put, (-0.05_f64).exp(), epsilon = 1e-9);
    }

    #[test]
    fn test_asset_parity() {
        // Asset call + asset put delivers the stock: prices sum to S.
        let call = digital_asset_call(100.0, 100.0, 0.05, 0.2, 1.0);
        let put = digital_asset_put(100.0, 100.0, 0.05, 0.2, 1.0);

        assert_relative_eq!(call + put, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_vanilla_decomposition() {
        // Vanilla call = asset call − K · cash call (unit payout).
        use crate::analytical::black_scholes_call;

        let (s, k, r, v, t) = (105.0, 95.0, 0.03, 0.25, 0.5);
        let vanilla = black_scholes_call(s, k, r, v, t);
        let decomposed = digital_asset_call(s, k, r, v, t) - k * digital_cash_call(s, k, 1.0, r, v, t);

        assert_relative_eq!(vanilla, decomposed, epsilon = 1e-9);
    }

    #[test]
    fn test_expiry_branches() {
        assert_eq!(digital_cash_call(110.0, 100.0, 5.0, 0.05, 0.2, 0.0), 5.0);
        assert_eq!(digital_cash_call(90.0, 100.0, 5.0, 0.05, 0.2, 0.0), 0.0);
        assert_eq!(digital_asset_put(90.0, 100.0, 0.05, 0.2, 0.0), 90.0);
    }

    #[test]
    fn test_zero_vol_branches() {
        let df = (-0.05_f64).exp();
        assert_relative_eq!(
            digital_cash_call(110.0, 100.0, 1.0, 0.05, 0.0, 1.0),
            df,
            epsilon = 1e-12
        );
        assert_eq!(digital_cash_put(110.0, 100.0, 1.0, 0.05, 0.0, 1.0), 0.0);
    }
}
