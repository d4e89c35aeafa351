//! Hagan SABR implied-volatility approximation.
//!
//! Hagan et al. (2002) give a closed-form Black implied volatility for SABR
//! dynamics, the industry-standard smile parameterisation. The formula is an
//! asymptotic expansion: an approximation for calibration and quoting, not
//! ground truth, and it degrades for extreme strikes or very short expiries.

/// SABR implied Black volatility for a general strike.
///
/// Falls back to `alpha` for degenerate inputs, handles the ATM point with
/// the reduced [`sabr_atm_vol`] formula, and applies the `z/χ(z)` correction
/// away from the money with its small-`z` and `ρ → 1` limits.
///
/// # Examples
///
/// ```
/// use mc_models::analytical::{sabr_atm_vol, sabr_implied_vol};
///
/// let atm = sabr_implied_vol(100.0, 100.0, 1.0, 0.2, 0.5, -0.3, 0.4);
/// assert!((atm - sabr_atm_vol(100.0, 1.0, 0.2, 0.5, -0.3, 0.4)).abs() < 1e-12);
/// ```
pub fn sabr_implied_vol(
    forward: f64,
    strike: f64,
    time: f64,
    alpha: f64,
    beta: f64,
    rho: f64,
    nu: f64,
) -> f64 {
    if alpha < 1e-10 || time < 1e-10 || forward <= 0.0 || strike <= 0.0 {
        return alpha;
    }

    // ATM collapses the expansion; use the reduced formula.
    if (forward - strike).abs() < 1e-7 * forward {
        return sabr_atm_vol(forward, time, alpha, beta, rho, nu);
    }

    let one_beta = 1.0 - beta;
    let fk = forward * strike;
    let log_fk = (forward / strike).ln();
    let log_fk2 = log_fk * log_fk;
    let log_fk4 = log_fk2 * log_fk2;

    // (FK)^((1-β)/2) and (FK)^(1-β)
    let fk_mid = fk.powf(0.5 * one_beta);
    let fk_full = fk.powf(one_beta);

    // z = (ν/α)·(FK)^((1-β)/2)·ln(F/K)
    let z = (nu / alpha) * fk_mid * log_fk;

    // z/χ(z) with χ(z) = ln[(√(1 − 2ρz + z²) + z − ρ)/(1 − ρ)]
    let z_over_chi = if z.abs() < 1e-6 {
        1.0
    } else {
        let sqrt_term = (1.0 - 2.0 * rho * z + z * z).sqrt();
        if (1.0 - rho).abs() < 1e-10 {
            // ρ → 1 limit of χ(z).
            z / (1.0 - 0.5 * z)
        } else {
            z / ((sqrt_term + z - rho) / (1.0 - rho)).ln()
        }
    };

    let denom = 1.0 + (one_beta * one_beta / 24.0) * log_fk2
        + (one_beta.powi(4) / 1920.0) * log_fk4;

    let eps1 = (one_beta * one_beta / 24.0) * (alpha * alpha / fk_full);
    let eps2 = (rho * beta * nu * alpha / 4.0) / fk_mid;
    let eps3 = ((2.0 - 3.0 * rho * rho) / 24.0) * nu * nu;
    let time_correction = 1.0 + (eps1 + eps2 + eps3) * time;

    (alpha / (fk_mid * denom)) * z_over_chi * time_correction
}

/// SABR implied volatility at the money (`F = K`).
///
/// ```text
/// σ_ATM = (α / F^(1−β)) · [1 + ((1−β)²α²/(24·F^(2−2β))
///        + ρβνα/(4·F^(1−β)) + (2−3ρ²)ν²/24)·T]
/// ```
pub fn sabr_atm_vol(forward: f64, time: f64, alpha: f64, beta: f64, rho: f64, nu: f64) -> f64 {
    if alpha < 1e-10 || forward <= 0.0 {
        return alpha;
    }

    let one_beta = 1.0 - beta;
    let alpha_adj = alpha / forward.powf(one_beta);

    let eps1 = (one_beta * one_beta / 24.0) * alpha_adj * alpha_adj;
    let eps2 = (rho * beta * nu / 4.0) * alpha_adj;
    let eps3 = ((2.0 - 3.0 * rho * rho) / 24.0) * nu * nu;

    alpha_adj * (1.0 + (eps1 + eps2 + eps3) * time)
}
