//! Merton jump-diffusion series solution.
//!
//! Conditioning on the number of jumps turns the Merton price into a
//! Poisson-weighted sum of Black-Scholes prices with adjusted parameters:
//!
//! ```text
//! C = Σₙ [ e^(−λ'T)·(λ'T)ⁿ / n! ] · BS(S, K, rₙ, σₙ, T)
//!
//! λ'  = λ(1 + k)
//! rₙ  = r − λk + n·ln(1 + k)/T
//! σₙ² = σ² + n·σⱼ²/T
//! k   = exp(μⱼ + σⱼ²/2) − 1
//! ```
//!
//! The sum truncates once the Poisson weight drops below 1e-15 with at least
//! ten terms taken.

use super::black_scholes_call;

/// Hard cap on series terms; convergence normally stops the sum much earlier.
const MAX_TERMS: usize = 50;

/// Truncation threshold on the Poisson weight.
const WEIGHT_CUTOFF: f64 = 1e-15;

/// Merton jump-diffusion call price via the series expansion.
///
/// # Examples
///
/// ```
/// use mc_models::analytical::{black_scholes_call, merton_call};
///
/// // With no jumps the series collapses to its first Black-Scholes term.
/// let merton = merton_call(100.0, 100.0, 0.05, 1.0, 0.2, 0.0, -0.1, 0.15);
/// let bs = black_scholes_call(100.0, 100.0, 0.05, 0.2, 1.0);
/// assert!((merton - bs).abs() < 0.01);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn merton_call(
    spot: f64,
    strike: f64,
    rate: f64,
    time: f64,
    sigma: f64,
    lambda: f64,
    mu_j: f64,
    sigma_j: f64,
) -> f64 {
    if spot <= 0.0 || strike <= 0.0 || time <= 0.0 {
        return (spot - strike).max(0.0);
    }

    let k = (mu_j + 0.5 * sigma_j * sigma_j).exp() - 1.0;
    let lambda_prime = lambda * (1.0 + k);

    let mut price = 0.0;
    let mut poisson_weight = (-lambda_prime * time).exp();

    for n in 0..MAX_TERMS {
        if n > 0 {
            poisson_weight *= lambda_prime * time / n as f64;
        }

        let r_n = rate - lambda * k + n as f64 * (1.0 + k).ln() / time;
        let sigma_n = (sigma * sigma + n as f64 * sigma_j * sigma_j / time).sqrt();

        price += poisson_weight * black_scholes_call(spot, strike, r_n, sigma_n, time);

        if poisson_weight < WEIGHT_CUTOFF && n > 10 {
            break;
        }
    }

    price
}

/// Merton jump-diffusion put price via put-call parity.
#[allow(clippy::too_many_arguments)]
pub fn merton_put(
    spot: f64,
    strike: f64,
    rate: f64,
    time: f64,
    sigma: f64,
    lambda: f64,
    mu_j: f64,
    sigma_j: f64,
) -> f64 {
    if spot <= 0.0 || strike <= 0.0 || time <= 0.0 {
        return (strike - spot).max(0.0);
    }

    let call = merton_call(spot, strike, rate, time, sigma, lambda, mu_j, sigma_j);
    call - spot + strike * (-rate * time).exp()
}
