//! Black-Scholes closed-form prices.
//!
//! ```text
//! C = S·N(d₁) − K·e^(−rT)·N(d₂)
//! P = K·e^(−rT)·N(−d₂) − S·N(−d₁)
//!
//! d₁ = (ln(S/K) + (r + σ²/2)·T) / (σ·√T)
//! d₂ = d₁ − σ·√T
//! ```

use mc_core::math::norm_cdf;

/// European call price.
///
/// Degenerate branches: intrinsic value at `time ≤ 0`, discounted intrinsic
/// at `volatility ≤ 0`, and the full spot for a free (`strike ≤ 0`) call.
///
/// # Examples
///
/// ```
/// use mc_models::analytical::black_scholes_call;
///
/// let price = black_scholes_call(100.0, 100.0, 0.05, 0.2, 1.0);
/// assert!((price - 10.4506).abs() < 1e-3);
/// ```
pub fn black_scholes_call(spot: f64, strike: f64, rate: f64, volatility: f64, time: f64) -> f64 {
    if time <= 0.0 {
        return (spot - strike).max(0.0);
    }
    if volatility <= 0.0 {
        let df = (-rate * time).exp();
        return (spot - strike * df).max(0.0);
    }
    if strike <= 0.0 {
        return spot;
    }

    let vol_sqrt_t = volatility * time.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * volatility * volatility) * time) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;
    let df = (-rate * time).exp();

    spot * norm_cdf(d1) - strike * df * norm_cdf(d2)
}

/// European put price.
pub fn black_scholes_put(spot: f64, strike: f64, rate: f64, volatility: f64, time: f64) -> f64 {
    if time <= 0.0 {
        return (strike - spot).max(0.0);
    }
    if volatility <= 0.0 {
        let df = (-rate * time).exp();
        return (strike * df - spot).max(0.0);
    }
    if strike <= 0.0 {
        return 0.0;
    }

    let vol_sqrt_t = volatility * time.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * volatility * volatility) * time) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;
    let df = (-rate * time).exp();

    strike * df * norm_cdf(-d2) - spot * norm_cdf(-d1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_atm_reference_values() {
        // The canonical textbook point: S=K=100, r=5%, sigma=20%, T=1.
        assert_relative_eq!(
            black_scholes_call(100.0, 100.0, 0.05, 0.2, 1.0),
            10.4506,
            epsilon = 1e-3
        );
        assert_relative_eq!(
            black_scholes_put(100.0, 100.0, 0.05, 0.2, 1.0),
            5.5735,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_expiry_returns_intrinsic() {
        assert_eq!(black_scholes_call(110.0, 100.0, 0.05, 0.2, 0.0), 10.0);
        assert_eq!(black_scholes_call(90.0, 100.0, 0.05, 0.2, 0.0), 0.0);
        assert_eq!(black_scholes_put(90.0, 100.0, 0.05, 0.2, 0.0), 10.0);
    }

    #[test]
    fn test_zero_vol_returns_discounted_intrinsic() {
        let df = (-0.05_f64).exp();
        assert_relative_eq!(
            black_scholes_call(110.0, 100.0, 0.05, 0.0, 1.0),
            110.0 - 100.0 * df,
            epsilon = 1e-12
        );
        assert_eq!(black_scholes_put(110.0, 100.0, 0.05, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_deep_moneyness_limits() {
        // Deep ITM call converges to the forward-minus-strike value.
        let call = black_scholes_call(300.0, 100.0, 0.05, 0.2, 1.0);
        assert_relative_eq!(call, 300.0 - 100.0 * (-0.05_f64).exp(), epsilon = 1e-4);

        // Deep OTM call is worthless.
        assert!(black_scholes_call(10.0, 100.0, 0.05, 0.2, 1.0) < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_put_call_parity(
            spot in 20.0..300.0f64,
            strike in 20.0..300.0f64,
            rate in 0.0..0.15f64,
            vol in 0.05..0.8f64,
            time in 0.05..3.0f64,
        ) {
            let call = black_scholes_call(spot, strike, rate, vol, time);
            let put = black_scholes_put(spot, strike, rate, vol, time);
            let parity = spot - strike * (-rate * time).exp();

            prop_assert!((call - put - parity).abs() < 1e-4);
        }

        #[test]
        fn prop_call_within_no_arbitrage_bounds(
            spot in 20.0..300.0f64,
            strike in 20.0..300.0f64,
            rate in 0.0..0.15f64,
            vol in 0.05..0.8f64,
            time in 0.05..3.0f64,
        ) {
            let call = black_scholes_call(spot, strike, rate, vol, time);
            let lower = (spot - strike * (-rate * time).exp()).max(0.0);

            prop_assert!(call >= lower - 1e-9);
            prop_assert!(call <= spot + 1e-9);
        }
    }
}
