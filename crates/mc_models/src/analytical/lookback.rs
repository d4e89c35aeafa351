//! Goldman-Sosin-Gatto floating-strike lookback formulas.
//!
//! A floating-strike lookback call buys at the realised minimum
//! (`payoff = S(T) − min S`); the put sells at the realised maximum
//! (`payoff = max S − S(T)`). With continuous monitoring and the running
//! extremum seeded at the current spot, Goldman-Sosin-Gatto (1979) give:
//!
//! ```text
//! a₁ = (r + σ²/2)·√T / σ,   a₂ = a₁ − σ√T
//!
//! C  = S·N(a₁) − S·e^(−rT)·N(a₂)
//!    + S·e^(−rT)·(σ²/2r)·[ N(−a₁ + (2r/σ)·√T) − e^(rT)·N(−a₁) ]
//!
//! P  = S·e^(−rT)·N(−a₂) − S·N(−a₁)
//!    + S·e^(−rT)·(σ²/2r)·[ e^(rT)·N(a₁) − N(a₁ − (2r/σ)·√T) ]
//! ```
//!
//! The σ²/2r bracket diverges as `r → 0`; near-zero rates use the first-order
//! series limit of that bracket instead, which glues continuously onto the
//! general case.

use mc_core::math::{norm_cdf, norm_pdf};

/// Rates below this magnitude use the zero-rate limit of the formulas.
const ZERO_RATE_TOLERANCE: f64 = 1e-10;

/// Floating-strike lookback call: pays `S(T) − min S`.
///
/// # Examples
///
/// ```
/// use mc_models::analytical::{black_scholes_call, lookback_floating_call};
///
/// // The right to buy at the minimum dominates the ATM European call.
/// let lookback = lookback_floating_call(100.0, 0.05, 0.2, 1.0);
/// let european = black_scholes_call(100.0, 100.0, 0.05, 0.2, 1.0);
/// assert!(lookback > european);
/// ```
pub fn lookback_floating_call(spot: f64, rate: f64, vol: f64, time: f64) -> f64 {
    if spot <= 0.0 || time <= 0.0 || vol <= 0.0 {
        // The extremum starts at the spot, so the degenerate payoff is zero
        // (S(T) = min S on a deterministic non-decreasing path only when
        // σ = 0 and r ≥ 0 it is S(T) − S(0); keep the conservative intrinsic).
        if vol <= 0.0 && time > 0.0 && spot > 0.0 {
            // Deterministic path: min is the smaller of start and end.
            let terminal = spot * (rate * time).exp();
            return (-rate * time).exp() * (terminal - terminal.min(spot)).max(0.0);
        }
        return 0.0;
    }

    let sqrt_t = time.sqrt();
    let vol_sqrt_t = vol * sqrt_t;
    let df = (-rate * time).exp();

    let a1 = (rate / vol + 0.5 * vol) * sqrt_t;
    let a2 = a1 - vol_sqrt_t;

    if rate.abs() < ZERO_RATE_TOLERANCE {
        // r → 0 limit: the bracket tends to σ√T·n(a₁) − a₁·σ√T·N(−a₁).
        return spot * (norm_cdf(a1) - norm_cdf(a2))
            + spot * vol_sqrt_t * (a1 * norm_cdf(a1) + norm_pdf(a1) - a1);
    }

    let vol_sq_over_2r = vol * vol / (2.0 * rate);
    let two_r_term = (2.0 * rate / vol) * sqrt_t;

    spot * norm_cdf(a1) - spot * df * norm_cdf(a2)
        + spot * df * vol_sq_over_2r * (norm_cdf(-a1 + two_r_term) - (rate * time).exp() * norm_cdf(-a1))
}

/// Floating-strike lookback put: pays `max S − S(T)`.
pub fn lookback_floating_put(spot: f64, rate: f64, vol: f64, time: f64) -> f64 {
    if spot <= 0.0 || time <= 0.0 || vol <= 0.0 {
        if vol <= 0.0 && time > 0.0 && spot > 0.0 {
            let terminal = spot * (rate * time).exp();
            return (-rate * time).exp() * (terminal.max(spot) - terminal).max(0.0);
        }
        return 0.0;
    }

    let sqrt_t = time.sqrt();
    let vol_sqrt_t = vol * sqrt_t;
    let df = (-rate * time).exp();

    let a1 = (rate / vol + 0.5 * vol) * sqrt_t;
    let a2 = a1 - vol_sqrt_t;

    if rate.abs() < ZERO_RATE_TOLERANCE {
        // r → 0 limit: the bracket tends to σ√T·n(a₁) + a₁·σ√T·N(a₁).
        return spot * (norm_cdf(-a2) - norm_cdf(-a1))
            + spot * vol_sqrt_t * (a1 * norm_cdf(a1) + norm_pdf(a1));
    }

    let vol_sq_over_2r = vol * vol / (2.0 * rate);
    let two_r_term = (2.0 * rate / vol) * sqrt_t;

    spot * df * norm_cdf(-a2) - spot * norm_cdf(-a1)
        + spot * df * vol_sq_over_2r * ((rate * time).exp() * norm_cdf(a1) - norm_cdf(a1 - two_r_term))
}
