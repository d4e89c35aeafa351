//! Black-76 closed-form prices, Greeks and implied volatility.
//!
//! Black-76 prices options on forwards and futures. The forward replaces the
//! spot in the lognormal formula and the discount factor multiplies both
//! legs:
//!
//! ```text
//! C = e^(−rT) · [F·N(d₁) − K·N(d₂)]
//! P = e^(−rT) · [K·N(−d₂) − F·N(−d₁)]
//!
//! d₁ = (ln(F/K) + σ²T/2) / (σ√T)
//! d₂ = d₁ − σ√T
//! ```

use mc_core::math::{norm_cdf, norm_pdf};

/// Newton-Raphson iteration cap for implied volatility.
const IMPLIED_VOL_MAX_ITER: usize = 50;

#[inline]
fn d1(forward: f64, strike: f64, volatility: f64, time: f64) -> f64 {
    ((forward / strike).ln() + 0.5 * volatility * volatility * time)
        / (volatility * time.sqrt())
}

/// Black-76 call price.
///
/// # Examples
///
/// ```
/// use mc_models::analytical::{black76_call, black76_put};
///
/// // ATM symmetry: call and put coincide on the forward.
/// let call = black76_call(100.0, 100.0, 0.05, 0.2, 1.0);
/// let put = black76_put(100.0, 100.0, 0.05, 0.2, 1.0);
/// assert!((call - put).abs() < 1e-12);
/// ```
pub fn black76_call(forward: f64, strike: f64, rate: f64, volatility: f64, time: f64) -> f64 {
    if time <= 0.0 {
        return (forward - strike).max(0.0);
    }
    if volatility <= 0.0 {
        return (-rate * time).exp() * (forward - strike).max(0.0);
    }
    if forward <= 0.0 || strike <= 0.0 {
        return 0.0;
    }

    let d1 = d1(forward, strike, volatility, time);
    let d2 = d1 - volatility * time.sqrt();
    let df = (-rate * time).exp();

    df * (forward * norm_cdf(d1) - strike * norm_cdf(d2))
}

/// Black-76 put price.
pub fn black76_put(forward: f64, strike: f64, rate: f64, volatility: f64, time: f64) -> f64 {
    if time <= 0.0 {
        return (strike - forward).max(0.0);
    }
    if volatility <= 0.0 {
        return (-rate * time).exp() * (strike - forward).max(0.0);
    }
    if forward <= 0.0 || strike <= 0.0 {
        return 0.0;
    }

    let d1 = d1(forward, strike, volatility, time);
    let d2 = d1 - volatility * time.sqrt();
    let df = (-rate * time).exp();

    df * (strike * norm_cdf(-d2) - forward * norm_cdf(-d1))
}

/// Black-76 delta: ∂V/∂F.
pub fn black76_delta(
    forward: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    is_call: bool,
) -> f64 {
    if time <= 0.0 || volatility <= 0.0 {
        let df = (-rate * time.max(0.0)).exp();
        return if is_call {
            if forward > strike { df } else { 0.0 }
        } else if forward < strike {
            -df
        } else {
            0.0
        };
    }

    let d1 = d1(forward, strike, volatility, time);
    let df = (-rate * time).exp();

    if is_call {
        df * norm_cdf(d1)
    } else {
        df * (norm_cdf(d1) - 1.0)
    }
}

/// Black-76 gamma: ∂²V/∂F² (identical for calls and puts).
pub fn black76_gamma(forward: f64, strike: f64, rate: f64, volatility: f64, time: f64) -> f64 {
    if time <= 0.0 || volatility <= 0.0 || forward <= 0.0 {
        return 0.0;
    }

    let d1 = d1(forward, strike, volatility, time);
    let df = (-rate * time).exp();

    df * norm_pdf(d1) / (forward * volatility * time.sqrt())
}

/// Black-76 vega: ∂V/∂σ (identical for calls and puts).
pub fn black76_vega(forward: f64, strike: f64, rate: f64, volatility: f64, time: f64) -> f64 {
    if time <= 0.0 || forward <= 0.0 || volatility <= 0.0 {
        return 0.0;
    }

    let d1 = d1(forward, strike, volatility, time);
    let df = (-rate * time).exp();

    df * forward * norm_pdf(d1) * time.sqrt()
}

/// Black-76 theta: ∂V/∂t.
pub fn black76_theta(
    forward: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    is_call: bool,
) -> f64 {
    if time <= 0.0 || volatility <= 0.0 {
        return 0.0;
    }

    let sqrt_t = time.sqrt();
    let d1 = d1(forward, strike, volatility, time);
    let d2 = d1 - volatility * sqrt_t;
    let df = (-rate * time).exp();

    let decay = -forward * norm_pdf(d1) * volatility / (2.0 * sqrt_t);

    if is_call {
        df * (decay + rate * forward * norm_cdf(d1) - rate * strike * norm_cdf(d2))
    } else {
        df * (decay - rate * forward * norm_cdf(-d1) + rate * strike * norm_cdf(-d2))
    }
}

/// Black-76 implied volatility by Newton-Raphson.
///
/// Starts from the Brenner-Subrahmanyam approximation
/// `σ₀ ≈ √(2π/T) · price / (e^(−rT)·F)` and iterates price/vega updates,
/// clamping σ to (0, 5]. Returns 0 for non-positive prices or expired
/// options.
pub fn black76_implied_vol(
    forward: f64,
    strike: f64,
    rate: f64,
    time: f64,
    price: f64,
    is_call: bool,
) -> f64 {
    if time <= 0.0 || price <= 0.0 {
        return 0.0;
    }

    let df = (-rate * time).exp();
    let mut sigma = (2.0 * std::f64::consts::PI / time).sqrt() * price / (df * forward);

    for _ in 0..IMPLIED_VOL_MAX_ITER {
        let model_price = if is_call {
            black76_call(forward, strike, rate, sigma, time)
        } else {
            black76_put(forward, strike, rate, sigma, time)
        };
        let vega = black76_vega(forward, strike, rate, sigma, time);

        if vega < 1e-12 {
            break;
        }

        let diff = model_price - price;
        if diff.abs() < 1e-10 {
            break;
        }

        sigma -= diff / vega;
        sigma = sigma.clamp(0.001, 5.0);
    }

    sigma
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_atm_reference_value() {
        // F=K=100, r=5%, sigma=20%, T=1: both legs price at 7.5771.
        let call = black76_call(100.0, 100.0, 0.05, 0.2, 1.0);
        let put = black76_put(100.0, 100.0, 0.05, 0.2, 1.0);

        assert_relative_eq!(call, 7.5771, epsilon = 1e-3);
        assert_relative_eq!(put, 7.5771, epsilon = 1e-3);
        assert_relative_eq!(call, put, epsilon = 1e-12);
    }

    #[test]
    fn test_expiry_and_zero_vol_branches() {
        assert_eq!(black76_call(110.0, 100.0, 0.05, 0.2, 0.0), 10.0);

        let df = (-0.05_f64).exp();
        assert_relative_eq!(
            black76_call(110.0, 100.0, 0.05, 0.0, 1.0),
            df * 10.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            black76_put(90.0, 100.0, 0.05, 0.0, 1.0),
            df * 10.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_put_call_parity_on_forward() {
        // C − P = e^(−rT)·(F − K)
        let (f, k, r, v, t) = (105.0, 95.0, 0.03, 0.25, 0.75);
        let call = black76_call(f, k, r, v, t);
        let put = black76_put(f, k, r, v, t);

        assert_relative_eq!(call - put, (-r * t).exp() * (f - k), epsilon = 1e-9);
    }

    #[test]
    fn test_delta_bounds_and_signs() {
        let delta_call = black76_delta(100.0, 100.0, 0.05, 0.2, 1.0, true);
        let delta_put = black76_delta(100.0, 100.0, 0.05, 0.2, 1.0, false);

        assert!(delta_call > 0.0 && delta_call < 1.0);
        assert!(delta_put < 0.0 && delta_put > -1.0);
        // Call minus put delta equals the discounted forward sensitivity.
        assert_relative_eq!(delta_call - delta_put, (-0.05_f64).exp(), epsilon = 1e-9);
    }

    #[test]
    fn test_gamma_and_vega_positive() {
        assert!(black76_gamma(100.0, 100.0, 0.05, 0.2, 1.0) > 0.0);
        assert!(black76_vega(100.0, 100.0, 0.05, 0.2, 1.0) > 0.0);
    }

    #[test]
    fn test_theta_is_decay_for_atm() {
        assert!(black76_theta(100.0, 100.0, 0.05, 0.2, 1.0, true) < 0.0);
    }

    #[test]
    fn test_implied_vol_round_trip() {
        for vol in [0.1, 0.2, 0.45] {
            let price = black76_call(100.0, 110.0, 0.05, vol, 1.0);
            let recovered = black76_implied_vol(100.0, 110.0, 0.05, 1.0, price, true);
            assert_relative_eq!(recovered, vol, epsilon = 1e-6);
        }

        let price = black76_put(100.0, 90.0, 0.05, 0.3, 0.5);
        let recovered = black76_implied_vol(100.0, 90.0, 0.05, 0.5, price, false);
        assert_relative_eq!(recovered, 0.3, epsilon = 1e-6);
    }
}
