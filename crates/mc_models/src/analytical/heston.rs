//! Heston characteristic function.
//!
//! The Gatheral formulation of `φ(u) = E[exp(iu·ln S(T))]`, the building
//! block for Fourier pricing methods (Carr-Madan, COS). This branch of the
//! complex logarithm is the numerically stable "little trap" variant: `g` is
//! formed with `−d`, avoiding the discontinuities of the original 1993
//! rotation for long maturities.

use crate::models::HestonParams;
use num_complex::Complex64;

/// Heston characteristic function `φ(u) = E[exp(iu·ln S(T))]`.
///
/// # Examples
///
/// ```
/// use mc_models::analytical::heston_char_fn;
/// use mc_models::models::HestonParams;
///
/// let params = HestonParams::new(100.0, 0.04, 2.0, 0.04, 0.3, -0.7, 0.05, 1.0).unwrap();
///
/// // φ(0) = 1 for any distribution.
/// let phi0 = heston_char_fn(0.0, &params);
/// assert!((phi0.re - 1.0).abs() < 1e-12);
/// assert!(phi0.im.abs() < 1e-12);
/// ```
pub fn heston_char_fn(u: f64, params: &HestonParams) -> Complex64 {
    let p = params;
    let iu = Complex64::new(0.0, u);

    // d = √((ρσiu − κ)² + σ²(iu + u²))
    let a = p.rho * p.sigma * iu - p.kappa;
    let b = p.sigma * p.sigma * (iu + u * u);
    let d = (a * a + b).sqrt();

    // g = (κ − ρσiu − d) / (κ − ρσiu + d)
    let g_num = p.kappa - p.rho * p.sigma * iu - d;
    let g_den = p.kappa - p.rho * p.sigma * iu + d;
    let g = g_num / g_den;

    let exp_dt = (-d * p.maturity).exp();

    // C = rT·iu + (κθ/σ²)·[(κ − ρσiu − d)·T − 2·ln((1 − g·e^(−dT))/(1 − g))]
    let c_term1 = p.rate * p.maturity * iu;
    let c_inner = (1.0 - g * exp_dt) / (1.0 - g);
    let c_term2 = (p.kappa * p.theta / (p.sigma * p.sigma))
        * (g_num * p.maturity - 2.0 * c_inner.ln());

    // D = ((κ − ρσiu − d)/σ²)·((1 − e^(−dT))/(1 − g·e^(−dT)))
    let d_term = (g_num / (p.sigma * p.sigma)) * ((1.0 - exp_dt) / (1.0 - g * exp_dt));

    (c_term1 + c_term2 + d_term * p.v0 + iu * p.spot.ln()).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> HestonParams {
        HestonParams::new(100.0, 0.04, 2.0, 0.04, 0.3, -0.7, 0.05, 1.0).unwrap()
    }

    #[test]
    fn test_phi_at_zero_is_one() {
        let phi = heston_char_fn(0.0, &test_params());
        assert!((phi.re - 1.0).abs() < 1e-12);
        assert!(phi.im.abs() < 1e-12);
    }

    #[test]
    fn test_modulus_bounded_by_one() {
        // |E[exp(iu·X)]| ≤ 1 for every real u.
        let params = test_params();
        for u in [0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 25.0] {
            let phi = heston_char_fn(u, &params);
            assert!(phi.norm() <= 1.0 + 1e-10, "u = {u}: |phi| = {}", phi.norm());
        }
    }

    #[test]
    fn test_conjugate_symmetry() {
        // φ(−u) = conj(φ(u)) for a real-valued log-price.
        let params = test_params();
        for u in [0.3, 1.7, 4.0] {
            let plus = heston_char_fn(u, &params);
            let minus = heston_char_fn(-u, &params);
            assert!((minus - plus.conj()).norm() < 1e-9);
        }
    }

    #[test]
    fn test_martingale_identity() {
        // φ(−i) = E[S(T)] = S₀·e^{rT}; evaluated through the real part of
        // the exponent at u on the negative imaginary axis.
        //
        // A direct complex-u evaluation is not exposed, so probe the moment
        // numerically: d/du Im(ln φ(u)) at 0 approximates E[ln S(T)].
        let params = test_params();
        let h = 1e-5;
        let phi_h = heston_char_fn(h, &params);
        let mean_log = phi_h.im.atan2(phi_h.re) / h;

        // E[ln S(T)] = ln S₀ + rT − ½∫E[v]dt; with v₀ = θ the integral is θT.
        let expected = 100.0_f64.ln() + 0.05 - 0.5 * 0.04;
        assert!((mean_log - expected).abs() < 1e-3, "mean log = {mean_log}");
    }
}
