//! SABR stochastic-volatility kernel.
//!
//! SABR (Hagan et al., 2002) drives the forward and its volatility by
//! correlated Brownian motions:
//!
//! ```text
//! dF = σ · F^β · dW₁
//! dσ = ν · σ · dW₂          dW₁·dW₂ = ρ·dt
//! ```
//!
//! The Euler-Maruyama discretisation absorbs the forward at zero (once a
//! path touches F = 0 it stays there) and floors the volatility at a tiny
//! positive value so the next step never divides by zero.

use super::correlated_normals;
use crate::error::ModelError;
use mc_core::Xoshiro256StarStar;

/// Volatility floor applied after each Euler step.
const SIGMA_FLOOR: f64 = 1e-10;

/// SABR model parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SabrParams {
    /// Initial forward price F(0).
    pub forward: f64,
    /// Initial volatility level α = σ(0).
    pub alpha: f64,
    /// CEV exponent β ∈ [0, 1] (0 normal, 1 lognormal).
    pub beta: f64,
    /// Correlation ρ ∈ [-1, 1] between forward and volatility.
    pub rho: f64,
    /// Volatility of volatility ν.
    pub nu: f64,
}

impl SabrParams {
    /// Creates validated SABR parameters.
    pub fn new(forward: f64, alpha: f64, beta: f64, rho: f64, nu: f64) -> Result<Self, ModelError> {
        if forward <= 0.0 || !forward.is_finite() {
            return Err(ModelError::InvalidSpot(forward));
        }
        if alpha < 0.0 || !alpha.is_finite() {
            return Err(ModelError::InvalidVolatility(alpha));
        }
        if !(0.0..=1.0).contains(&beta) {
            return Err(ModelError::InvalidBeta(beta));
        }
        if !(-1.0..=1.0).contains(&rho) {
            return Err(ModelError::InvalidCorrelation(rho));
        }
        if nu < 0.0 || !nu.is_finite() {
            return Err(ModelError::InvalidVolatility(nu));
        }
        Ok(Self {
            forward,
            alpha,
            beta,
            rho,
            nu,
        })
    }
}

/// Stepwise SABR kernel.
///
/// # Examples
///
/// ```
/// use mc_core::Xoshiro256StarStar;
/// use mc_models::models::{SabrParams, SabrPath};
///
/// let params = SabrParams::new(100.0, 0.2, 0.5, -0.3, 0.4).unwrap();
/// let model = SabrPath::new(params, 0.05, 1.0, 100).unwrap();
/// let mut rng = Xoshiro256StarStar::new(42);
///
/// let f_t = model.simulate_terminal(&mut rng);
/// assert!(f_t >= 0.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SabrPath {
    params: SabrParams,
    sqrt_dt: f64,
    sqrt_one_minus_rho_sq: f64,
    discount: f64,
    num_steps: usize,
}

impl SabrPath {
    /// Creates a SABR path kernel over `num_steps` uniform steps.
    pub fn new(
        params: SabrParams,
        rate: f64,
        maturity: f64,
        num_steps: usize,
    ) -> Result<Self, ModelError> {
        if maturity < 0.0 || !maturity.is_finite() {
            return Err(ModelError::InvalidMaturity(maturity));
        }
        if num_steps == 0 {
            return Err(ModelError::InvalidSteps(num_steps));
        }

        let dt = maturity / num_steps as f64;
        Ok(Self {
            params,
            sqrt_dt: dt.sqrt(),
            sqrt_one_minus_rho_sq: (1.0 - params.rho * params.rho).sqrt(),
            discount: (-rate * maturity).exp(),
            num_steps,
        })
    }

    /// Advances `(forward, sigma)` by one Euler step.
    ///
    /// Absorption: a forward at (or below) zero terminates the path at zero.
    #[inline]
    pub fn step(&self, forward: f64, sigma: f64, w1: f64, w2: f64) -> (f64, f64) {
        if forward <= 0.0 {
            return (0.0, sigma);
        }
        let sigma = sigma.max(SIGMA_FLOOR);

        let f_beta = forward.powf(self.params.beta);
        let df = sigma * f_beta * self.sqrt_dt * w1;
        let ds = self.params.nu * sigma * self.sqrt_dt * w2;

        ((forward + df).max(0.0), (sigma + ds).max(0.0))
    }

    /// Simulates a full forward trajectory; returns the terminal forward.
    ///
    /// # Panics
    ///
    /// Panics if `path.len() != num_steps + 1`.
    pub fn simulate_path(&self, rng: &mut Xoshiro256StarStar, path: &mut [f64]) -> f64 {
        assert_eq!(path.len(), self.num_steps + 1);

        let mut forward = self.params.forward;
        let mut sigma = self.params.alpha;
        path[0] = forward;

        for i in 0..self.num_steps {
            let (w1, w2) =
                correlated_normals(rng, self.params.rho, self.sqrt_one_minus_rho_sq);
            (forward, sigma) = self.step(forward, sigma, w1, w2);
            path[i + 1] = forward;
        }

        forward
    }

    /// Simulates the terminal forward without storing the trajectory.
    pub fn simulate_terminal(&self, rng: &mut Xoshiro256StarStar) -> f64 {
        let mut forward = self.params.forward;
        let mut sigma = self.params.alpha;

        for _ in 0..self.num_steps {
            let (w1, w2) =
                correlated_normals(rng, self.params.rho, self.sqrt_one_minus_rho_sq);
            (forward, sigma) = self.step(forward, sigma, w1, w2);
        }

        forward
    }

    /// Discount factor e^(−r·T).
    #[inline]
    pub fn discount(&self) -> f64 {
        self.discount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_params() -> SabrParams {
        SabrParams::new(100.0, 0.2, 0.5, -0.3, 0.4).unwrap()
    }

    #[test]
    fn test_param_validation() {
        assert!(SabrParams::new(-1.0, 0.2, 0.5, 0.0, 0.4).is_err());
        assert!(SabrParams::new(100.0, 0.2, 1.5, 0.0, 0.4).is_err());
        assert!(SabrParams::new(100.0, 0.2, 0.5, -1.5, 0.4).is_err());
        assert!(SabrParams::new(100.0, -0.2, 0.5, 0.0, 0.4).is_err());
    }

    #[test]
    fn test_absorption_at_zero() {
        let model = SabrPath::new(test_params(), 0.05, 1.0, 100).unwrap();

        // Once absorbed the forward never leaves zero.
        let (f, _) = model.step(0.0, 0.2, 3.0, 3.0);
        assert_eq!(f, 0.0);

        let (f, _) = model.step(-1e-9, 0.2, 3.0, 3.0);
        assert_eq!(f, 0.0);
    }

    #[test]
    fn test_forward_stays_non_negative() {
        let model = SabrPath::new(test_params(), 0.05, 1.0, 50).unwrap();
        let mut rng = Xoshiro256StarStar::new(42);
        let mut path = vec![0.0; 51];

        for _ in 0..500 {
            model.simulate_path(&mut rng, &mut path);
            assert!(path.iter().all(|&f| f >= 0.0));
        }
    }

    #[test]
    fn test_beta_one_approximates_lognormal_mean() {
        // β = 1, ν = 0 collapses to driftless lognormal dynamics, so the
        // terminal mean stays near the initial forward.
        let params = SabrParams::new(100.0, 0.2, 1.0, 0.0, 0.0).unwrap();
        let model = SabrPath::new(params, 0.0, 1.0, 100).unwrap();
        let mut rng = Xoshiro256StarStar::new(42);

        let n = 100_000;
        let mean: f64 =
            (0..n).map(|_| model.simulate_terminal(&mut rng)).sum::<f64>() / n as f64;

        assert_relative_eq!(mean, 100.0, max_relative = 0.02);
    }

    #[test]
    fn test_terminal_matches_path_endpoint() {
        let model = SabrPath::new(test_params(), 0.05, 1.0, 25).unwrap();
        let mut rng_a = Xoshiro256StarStar::new(9);
        let mut rng_b = Xoshiro256StarStar::new(9);
        let mut path = vec![0.0; 26];

        let terminal = model.simulate_terminal(&mut rng_a);
        let from_path = model.simulate_path(&mut rng_b, &mut path);

        assert_eq!(terminal, from_path);
        assert_eq!(from_path, path[25]);
    }
}
