//! Merton jump-diffusion kernel.
//!
//! Merton (1976) superimposes lognormal jumps on GBM:
//!
//! ```text
//! dS/S = (r − λk)·dt + σ·dW + (J − 1)·dN
//! ```
//!
//! where `N` is a Poisson process with intensity λ, `log J ~ N(μⱼ, σⱼ²)`,
//! and the compensator `k = E[J − 1] = exp(μⱼ + ½σⱼ²) − 1` keeps the
//! discounted spot a martingale.

use crate::error::ModelError;
use mc_core::Xoshiro256StarStar;

/// Below this jump intensity per step, a Bernoulli draw replaces the full
/// inverse-transform Poisson sample.
const BERNOULLI_THRESHOLD: f64 = 0.1;

/// Merton jump-diffusion parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MertonParams {
    /// Initial spot price S(0).
    pub spot: f64,
    /// Risk-free rate r.
    pub rate: f64,
    /// Diffusion volatility σ.
    pub sigma: f64,
    /// Jump intensity λ (expected jumps per year).
    pub lambda: f64,
    /// Mean log-jump size μⱼ.
    pub mu_j: f64,
    /// Volatility of log-jump size σⱼ.
    pub sigma_j: f64,
    /// Time to maturity T.
    pub maturity: f64,
}

impl MertonParams {
    /// Creates validated Merton parameters.
    pub fn new(
        spot: f64,
        rate: f64,
        sigma: f64,
        lambda: f64,
        mu_j: f64,
        sigma_j: f64,
        maturity: f64,
    ) -> Result<Self, ModelError> {
        if spot <= 0.0 || !spot.is_finite() {
            return Err(ModelError::InvalidSpot(spot));
        }
        if sigma < 0.0 || !sigma.is_finite() {
            return Err(ModelError::InvalidVolatility(sigma));
        }
        if lambda < 0.0 || !lambda.is_finite() {
            return Err(ModelError::InvalidIntensity(lambda));
        }
        if sigma_j < 0.0 || !sigma_j.is_finite() {
            return Err(ModelError::InvalidVolatility(sigma_j));
        }
        if maturity < 0.0 || !maturity.is_finite() {
            return Err(ModelError::InvalidMaturity(maturity));
        }
        Ok(Self {
            spot,
            rate,
            sigma,
            lambda,
            mu_j,
            sigma_j,
            maturity,
        })
    }

    /// Jump compensator `k = exp(μⱼ + ½σⱼ²) − 1`.
    #[inline]
    pub fn compensator(&self) -> f64 {
        (self.mu_j + 0.5 * self.sigma_j * self.sigma_j).exp() - 1.0
    }
}

/// Stepwise Merton kernel.
///
/// # Examples
///
/// ```
/// use mc_core::Xoshiro256StarStar;
/// use mc_models::models::{MertonParams, MertonPath};
///
/// let params = MertonParams::new(100.0, 0.05, 0.2, 1.0, -0.1, 0.15, 1.0).unwrap();
/// let model = MertonPath::new(params, 252).unwrap();
/// let mut rng = Xoshiro256StarStar::new(42);
///
/// assert!(model.simulate_terminal(&mut rng) > 0.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MertonPath {
    params: MertonParams,
    dt: f64,
    sqrt_dt: f64,
    /// Compensated drift (r − λk − ½σ²)·dt.
    drift_dt: f64,
    lambda_dt: f64,
    discount: f64,
    num_steps: usize,
}

impl MertonPath {
    /// Creates a Merton path kernel over `num_steps` uniform steps.
    pub fn new(params: MertonParams, num_steps: usize) -> Result<Self, ModelError> {
        if num_steps == 0 {
            return Err(ModelError::InvalidSteps(num_steps));
        }

        let dt = params.maturity / num_steps as f64;
        let k = params.compensator();
        Ok(Self {
            params,
            dt,
            sqrt_dt: dt.sqrt(),
            drift_dt: (params.rate - params.lambda * k - 0.5 * params.sigma * params.sigma) * dt,
            lambda_dt: params.lambda * dt,
            discount: (-params.rate * params.maturity).exp(),
            num_steps,
        })
    }

    /// Samples a Poisson jump count for one step.
    ///
    /// Small intensities (λ·dt < 0.1) use a single Bernoulli draw; larger
    /// intensities fall back to inverse-transform sampling against e^(−λ·dt).
    #[inline]
    pub fn sample_jump_count(&self, rng: &mut Xoshiro256StarStar) -> u32 {
        if self.lambda_dt <= 0.0 {
            return 0;
        }

        if self.lambda_dt < BERNOULLI_THRESHOLD {
            return u32::from(rng.next_uniform() < self.lambda_dt);
        }

        let limit = (-self.lambda_dt).exp();
        let mut product = 1.0;
        let mut count = 0u32;
        loop {
            count += 1;
            product *= rng.next_uniform();
            if product <= limit {
                return count - 1;
            }
        }
    }

    /// Advances one step: diffusion, then the sum of `K` lognormal jumps.
    #[inline]
    pub fn step(&self, spot: f64, rng: &mut Xoshiro256StarStar) -> f64 {
        let z = rng.next_normal();
        let diffusion = self.params.sigma * self.sqrt_dt * z;

        let jumps = self.sample_jump_count(rng);
        let mut jump_sum = 0.0;
        for _ in 0..jumps {
            let zj = rng.next_normal();
            jump_sum += self.params.mu_j + self.params.sigma_j * zj;
        }

        spot * (self.drift_dt + diffusion + jump_sum).exp()
    }

    /// Fills `path` with a full trajectory; returns the terminal spot.
    ///
    /// # Panics
    ///
    /// Panics if `path.len() != num_steps + 1`.
    pub fn simulate_path(&self, rng: &mut Xoshiro256StarStar, path: &mut [f64]) -> f64 {
        assert_eq!(path.len(), self.num_steps + 1);

        path[0] = self.params.spot;
        for i in 0..self.num_steps {
            path[i + 1] = self.step(path[i], rng);
        }

        path[self.num_steps]
    }

    /// Simulates the terminal spot without storing the trajectory.
    pub fn simulate_terminal(&self, rng: &mut Xoshiro256StarStar) -> f64 {
        let mut spot = self.params.spot;
        for _ in 0..self.num_steps {
            spot = self.step(spot, rng);
        }
        spot
    }

    /// Discount factor e^(−r·T).
    #[inline]
    pub fn discount(&self) -> f64 {
        self.discount
    }
}
