//! Heston stochastic-variance kernel.
//!
//! The Heston model (1993) drives instantaneous variance as a mean-reverting
//! CIR process correlated with the spot:
//!
//! ```text
//! dS = r·S·dt + √v·S·dW₁
//! dv = κ(θ − v)·dt + σ·√v·dW₂       dW₁·dW₂ = ρ·dt
//! ```
//!
//! The default discretisation is full-truncation Euler: the variance state is
//! carried untruncated and `max(v, 0)` is taken only where the variance is
//! consumed (drift and diffusion terms). Truncating the state in place would
//! break the Markov property of the discretised chain and add bias.
//!
//! An Andersen (2008) quadratic-exponential step is supplied as an
//! alternative for variance-sensitive work; the default dispatch does not use
//! it.

use super::correlated_normals;
use crate::error::ModelError;
use mc_core::Xoshiro256StarStar;

/// Switch point between the quadratic and exponential QE branches.
const QE_PSI_CRITICAL: f64 = 1.5;

/// Heston model parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HestonParams {
    /// Initial spot price S(0).
    pub spot: f64,
    /// Initial variance v(0).
    pub v0: f64,
    /// Mean-reversion speed κ.
    pub kappa: f64,
    /// Long-run variance θ.
    pub theta: f64,
    /// Volatility of variance σ.
    pub sigma: f64,
    /// Spot/variance correlation ρ.
    pub rho: f64,
    /// Risk-free rate r.
    pub rate: f64,
    /// Time to maturity T.
    pub maturity: f64,
}

impl HestonParams {
    /// Creates validated Heston parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        spot: f64,
        v0: f64,
        kappa: f64,
        theta: f64,
        sigma: f64,
        rho: f64,
        rate: f64,
        maturity: f64,
    ) -> Result<Self, ModelError> {
        if spot <= 0.0 || !spot.is_finite() {
            return Err(ModelError::InvalidSpot(spot));
        }
        if v0 < 0.0 || !v0.is_finite() {
            return Err(ModelError::InvalidVariance(v0));
        }
        if kappa <= 0.0 || !kappa.is_finite() {
            return Err(ModelError::InvalidMeanReversion(kappa));
        }
        if theta < 0.0 || !theta.is_finite() {
            return Err(ModelError::InvalidVariance(theta));
        }
        if sigma < 0.0 || !sigma.is_finite() {
            return Err(ModelError::InvalidVolatility(sigma));
        }
        if !(-1.0..=1.0).contains(&rho) {
            return Err(ModelError::InvalidCorrelation(rho));
        }
        if maturity < 0.0 || !maturity.is_finite() {
            return Err(ModelError::InvalidMaturity(maturity));
        }
        Ok(Self {
            spot,
            v0,
            kappa,
            theta,
            sigma,
            rho,
            rate,
            maturity,
        })
    }

    /// Feller condition `2κθ > σ²`.
    ///
    /// When satisfied the continuous-time variance stays strictly positive
    /// almost surely. Violation does not prevent pricing (full truncation
    /// tolerates it at the cost of some bias) but callers can surface it.
    #[inline]
    pub fn satisfies_feller(&self) -> bool {
        check_feller(self.kappa, self.theta, self.sigma)
    }
}

/// Feller condition check on raw parameters: `2κθ > σ²`.
#[inline]
pub fn check_feller(kappa: f64, theta: f64, sigma: f64) -> bool {
    2.0 * kappa * theta > sigma * sigma
}

/// Stepwise Heston kernel.
///
/// # Examples
///
/// ```
/// use mc_core::Xoshiro256StarStar;
/// use mc_models::models::{HestonParams, HestonPath};
///
/// let params = HestonParams::new(100.0, 0.04, 2.0, 0.04, 0.3, -0.7, 0.05, 1.0).unwrap();
/// let model = HestonPath::new(params, 100).unwrap();
/// let mut rng = Xoshiro256StarStar::new(42);
///
/// let s_t = model.simulate_terminal(&mut rng);
/// assert!(s_t > 0.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct HestonPath {
    params: HestonParams,
    dt: f64,
    sqrt_dt: f64,
    sqrt_one_minus_rho_sq: f64,
    discount: f64,
    num_steps: usize,
}

impl HestonPath {
    /// Creates a Heston path kernel over `num_steps` uniform steps.
    pub fn new(params: HestonParams, num_steps: usize) -> Result<Self, ModelError> {
        if num_steps == 0 {
            return Err(ModelError::InvalidSteps(num_steps));
        }

        let dt = params.maturity / num_steps as f64;
        Ok(Self {
            params,
            dt,
            sqrt_dt: dt.sqrt(),
            sqrt_one_minus_rho_sq: (1.0 - params.rho * params.rho).sqrt(),
            discount: (-params.rate * params.maturity).exp(),
            num_steps,
        })
    }

    /// Full-truncation Euler step.
    ///
    /// `v⁺ = max(v, 0)` feeds the drift and both diffusion terms; the carried
    /// variance state itself is updated without truncation.
    #[inline]
    pub fn step_euler(&self, spot: f64, var: f64, w1: f64, w2: f64) -> (f64, f64) {
        let p = &self.params;

        let v_plus = var.max(0.0);
        let sqrt_v = v_plus.sqrt();

        let ds = p.rate * spot * self.dt + sqrt_v * spot * self.sqrt_dt * w1;
        let dv = p.kappa * (p.theta - v_plus) * self.dt + p.sigma * sqrt_v * self.sqrt_dt * w2;

        (spot + ds, var + dv)
    }

    /// Andersen quadratic-exponential step.
    ///
    /// Samples the next variance from a moment-matched quadratic or
    /// exponential law depending on `ψ = s²/m²`, then advances the log-spot
    /// with the trapezoidal variance average.
    pub fn step_qe(&self, spot: f64, var: f64, rng: &mut Xoshiro256StarStar) -> (f64, f64) {
        let p = &self.params;
        let dt = self.dt;
        let v = var.max(0.0);

        let exp_kdt = (-p.kappa * dt).exp();
        let m = p.theta + (v - p.theta) * exp_kdt;
        let s2 = v * p.sigma * p.sigma * exp_kdt * (1.0 - exp_kdt) / p.kappa
            + p.theta * p.sigma * p.sigma * (1.0 - exp_kdt) * (1.0 - exp_kdt) / (2.0 * p.kappa);

        let psi = s2 / (m * m);

        let v_next = if psi <= QE_PSI_CRITICAL {
            let b2 = 2.0 / psi - 1.0 + (2.0 / psi).sqrt() * (2.0 / psi - 1.0).sqrt();
            let a = m / (1.0 + b2);
            let b = b2.sqrt();
            let z = rng.next_normal();
            a * (b + z) * (b + z)
        } else {
            let prob_zero = (psi - 1.0) / (psi + 1.0);
            let beta = (1.0 - prob_zero) / m;
            let u = rng.next_uniform();
            if u <= prob_zero {
                0.0
            } else {
                ((1.0 - prob_zero) / (1.0 - u)).ln() / beta
            }
        };

        let v_avg = 0.5 * (v + v_next);
        let sqrt_v_avg = v_avg.max(0.0).sqrt();
        let z1 = rng.next_normal();

        let drift = (p.rate - 0.5 * v_avg) * dt;
        let diffusion = sqrt_v_avg * self.sqrt_dt * z1;

        ((spot.ln() + drift + diffusion).exp(), v_next)
    }

    /// Simulates spot and variance trajectories with the Euler scheme.
    ///
    /// # Panics
    ///
    /// Panics if either buffer is not `num_steps + 1` long.
    pub fn simulate_path(
        &self,
        rng: &mut Xoshiro256StarStar,
        spot_path: &mut [f64],
        var_path: &mut [f64],
    ) -> f64 {
        assert_eq!(spot_path.len(), self.num_steps + 1);
        assert_eq!(var_path.len(), self.num_steps + 1);

        let mut spot = self.params.spot;
        let mut var = self.params.v0;
        spot_path[0] = spot;
        var_path[0] = var;

        for i in 0..self.num_steps {
            let (w1, w2) =
                correlated_normals(rng, self.params.rho, self.sqrt_one_minus_rho_sq);
            (spot, var) = self.step_euler(spot, var, w1, w2);
            spot_path[i + 1] = spot;
            var_path[i + 1] = var;
        }

        spot
    }

    /// Simulates the terminal spot with the Euler scheme, no path storage.
    pub fn simulate_terminal(&self, rng: &mut Xoshiro256StarStar) -> f64 {
        let mut spot = self.params.spot;
        let mut var = self.params.v0;

        for _ in 0..self.num_steps {
            let (w1, w2) =
                correlated_normals(rng, self.params.rho, self.sqrt_one_minus_rho_sq);
            (spot, var) = self.step_euler(spot, var, w1, w2);
        }

        spot
    }

    /// Simulates the terminal spot with the QE scheme.
    pub fn simulate_terminal_qe(&self, rng: &mut Xoshiro256StarStar) -> f64 {
        let mut spot = self.params.spot;
        let mut var = self.params.v0;

        for _ in 0..self.num_steps {
            (spot, var) = self.step_qe(spot, var, rng);
        }

        spot
    }

    /// Discount factor e^(−r·T).
    #[inline]
    pub fn discount(&self) -> f64 {
        self.discount
    }
}
