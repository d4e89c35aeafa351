//! Geometric-Asian closed form.
//!
//! The geometric average of lognormal observations is itself lognormal, so a
//! fixed-strike geometric Asian prices as Black-Scholes with adjusted drift
//! and variance. For `n` uniform observations:
//!
//! ```text
//! adj_rate = (r − σ²/2)·(n+1)/(2n) + σ²·(n+1)(2n+1)/(6n²)
//! adj_vol² = σ²·(n+1)(2n+1)/(6n²)
//! ```
//!
//! Besides standalone pricing, this is the known expectation `E[Z]` behind
//! the arithmetic-Asian control variate.

use mc_core::math::norm_cdf;

fn adjusted_parameters(rate: f64, volatility: f64, num_obs: usize) -> (f64, f64) {
    let n = num_obs as f64;
    let sigma_sq = volatility * volatility;

    let adj_rate = (rate - 0.5 * sigma_sq) * (n + 1.0) / (2.0 * n)
        + sigma_sq * (n + 1.0) * (2.0 * n + 1.0) / (6.0 * n * n);
    let adj_vol_sq = sigma_sq * (n + 1.0) * (2.0 * n + 1.0) / (6.0 * n * n);

    (adj_rate, adj_vol_sq)
}

/// Fixed-strike geometric Asian call over `num_obs` uniform observations.
///
/// # Examples
///
/// ```
/// use mc_models::analytical::{black_scholes_call, geometric_asian_call};
///
/// // Averaging dampens volatility: the Asian is cheaper than the European.
/// let asian = geometric_asian_call(100.0, 100.0, 0.05, 0.2, 1.0, 252);
/// let european = black_scholes_call(100.0, 100.0, 0.05, 0.2, 1.0);
/// assert!(asian < european);
/// assert!(asian > 0.0);
/// ```
pub fn geometric_asian_call(
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    num_obs: usize,
) -> f64 {
    if spot <= 0.0 || strike <= 0.0 || num_obs == 0 {
        return 0.0;
    }
    if time <= 0.0 {
        return (spot - strike).max(0.0);
    }

    let (adj_rate, adj_vol_sq) = adjusted_parameters(rate, volatility, num_obs);
    let df = (-rate * time).exp();

    if volatility <= 0.0 {
        // Deterministic average of the drifted path.
        let avg = spot * (adj_rate * time).exp();
        return df * (avg - strike).max(0.0);
    }

    let adj_vol = adj_vol_sq.sqrt();
    let sqrt_t = time.sqrt();
    let d1 = ((spot / strike).ln() + (adj_rate + 0.5 * adj_vol_sq) * time) / (adj_vol * sqrt_t);
    let d2 = d1 - adj_vol * sqrt_t;

    spot * ((adj_rate - rate) * time).exp() * norm_cdf(d1) - strike * df * norm_cdf(d2)
}

/// Fixed-strike geometric Asian put over `num_obs` uniform observations.
pub fn geometric_asian_put(
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    num_obs: usize,
) -> f64 {
    if spot <= 0.0 || strike <= 0.0 || num_obs == 0 {
        return 0.0;
    }
    if time <= 0.0 {
        return (strike - spot).max(0.0);
    }

    let (adj_rate, adj_vol_sq) = adjusted_parameters(rate, volatility, num_obs);
    let df = (-rate * time).exp();

    if volatility <= 0.0 {
        let avg = spot * (adj_rate * time).exp();
        return df * (strike - avg).max(0.0);
    }

    let adj_vol = adj_vol_sq.sqrt();
    let sqrt_t = time.sqrt();
    let d1 = ((spot / strike).ln() + (adj_rate + 0.5 * adj_vol_sq) * time) / (adj_vol * sqrt_t);
    let d2 = d1 - adj_vol * sqrt_t;

    strike * df * norm_cdf(-d2) - spot * ((adj_rate - rate) * time).exp() * norm_cdf(-d1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytical::black_scholes_call;
    use approx::assert_relative_eq;

    #[test]
    fn test_cheaper_than_european() {
        let asian = geometric_asian_call(100.0, 100.0, 0.05, 0.2, 1.0, 252);
        let european = black_scholes_call(100.0, 100.0, 0.05, 0.2, 1.0);

        assert!(asian < european);
        assert!(asian > 0.0);
    }

    #[test]
    fn test_large_n_limit_parameters() {
        // For large n: adj_vol → σ/√3 and the drift adjustment approaches
        // (r − σ²/2)/2 + σ²/3.
        let (adj_rate, adj_vol_sq) = adjusted_parameters(0.05, 0.2, 100_000);

        assert_relative_eq!(adj_vol_sq.sqrt(), 0.2 / 3.0_f64.sqrt(), max_relative = 1e-4);
        assert_relative_eq!(
            adj_rate,
            (0.05 - 0.5 * 0.04) / 2.0 + 0.04 / 3.0,
            max_relative = 1e-4
        );
    }

    #[test]
    fn test_more_observations_dampen_volatility() {
        // The adjusted variance falls monotonically with the observation
        // count, from σ² towards σ²/3.
        let (_, var_1) = adjusted_parameters(0.05, 0.2, 1);
        let (_, var_12) = adjusted_parameters(0.05, 0.2, 12);
        let (_, var_252) = adjusted_parameters(0.05, 0.2, 252);

        assert_relative_eq!(var_1, 0.04, epsilon = 1e-12);
        assert!(var_12 > var_252);
        assert!(var_252 > 0.04 / 3.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(geometric_asian_call(100.0, 100.0, 0.05, 0.2, 1.0, 0), 0.0);
        assert_eq!(geometric_asian_call(-1.0, 100.0, 0.05, 0.2, 1.0, 10), 0.0);
        assert_eq!(geometric_asian_call(110.0, 100.0, 0.05, 0.2, 0.0, 10), 10.0);
    }

    #[test]
    fn test_put_call_relationship() {
        // Discounted forward parity in the adjusted measure:
        // C − P = S·e^{(adj−r)T} − K·e^{−rT}.
        let (s, k, r, v, t, n) = (100.0, 95.0, 0.05, 0.2, 1.0, 50);
        let call = geometric_asian_call(s, k, r, v, t, n);
        let put = geometric_asian_put(s, k, r, v, t, n);

        let (adj_rate, _) = adjusted_parameters(r, v, n);
        let parity = s * ((adj_rate - r) * t).exp() - k * (-r * t).exp();

        assert_relative_eq!(call - put, parity, epsilon = 1e-9);
    }
}
