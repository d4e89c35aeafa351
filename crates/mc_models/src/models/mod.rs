//! Path-simulation kernels.
//!
//! Each kernel follows the same shape: a parameter struct validated up
//! front, a constructor that precomputes step-invariant constants
//! (`drift·dt`, `σ·√dt`, the discount factor), and `simulate_terminal` /
//! `simulate_path` entry points that consume a caller-supplied generator.

pub mod black76;
pub mod gbm;
pub mod heston;
pub mod merton;
pub mod sabr;

pub use black76::Black76;
pub use gbm::{Gbm, GbmPath};
pub use heston::{check_feller, HestonParams, HestonPath};
pub use merton::{MertonParams, MertonPath};
pub use sabr::{SabrParams, SabrPath};

use mc_core::Xoshiro256StarStar;

/// Draws a pair of standard normals with correlation `rho` via Cholesky:
/// `W₁ = Z₁`, `W₂ = ρ·Z₁ + √(1−ρ²)·Z₂`.
#[inline]
pub(crate) fn correlated_normals(
    rng: &mut Xoshiro256StarStar,
    rho: f64,
    sqrt_one_minus_rho_sq: f64,
) -> (f64, f64) {
    let z1 = rng.next_normal();
    let z2 = rng.next_normal();
    (z1, rho * z1 + sqrt_one_minus_rho_sq * z2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlated_normals_sample_correlation() {
        let mut rng = Xoshiro256StarStar::new(42);
        let rho: f64 = -0.7;
        let sqrt_term = (1.0 - rho * rho).sqrt();

        let n = 50_000;
        let mut sum_w1 = 0.0;
        let mut sum_w2 = 0.0;
        let mut sum_w1w2 = 0.0;
        let mut sum_w1_sq = 0.0;
        let mut sum_w2_sq = 0.0;

        for _ in 0..n {
            let (w1, w2) = correlated_normals(&mut rng, rho, sqrt_term);
            sum_w1 += w1;
            sum_w2 += w2;
            sum_w1w2 += w1 * w2;
            sum_w1_sq += w1 * w1;
            sum_w2_sq += w2 * w2;
        }

        let nf = n as f64;
        let cov = sum_w1w2 / nf - (sum_w1 / nf) * (sum_w2 / nf);
        let var1 = sum_w1_sq / nf - (sum_w1 / nf).powi(2);
        let var2 = sum_w2_sq / nf - (sum_w2 / nf).powi(2);
        let sample_rho = cov / (var1 * var2).sqrt();

        assert!((sample_rho - rho).abs() < 0.02, "sample rho = {sample_rho}");
    }
}
