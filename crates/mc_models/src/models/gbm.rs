//! Geometric Brownian motion kernels.
//!
//! GBM has an exact solution in log space, so both kernels here are free of
//! discretisation error:
//!
//! ```text
//! S(T)    = S(0) · exp((r − ½σ²)·T  + σ·√T  · Z)        terminal
//! S(t+dt) = S(t) · exp((r − ½σ²)·dt + σ·√dt · Z)        per step
//! ```
//!
//! The terminal kernel serves Europeans and digitals; the path kernel serves
//! every path-dependent contract and the LSM spot matrix.

use crate::error::ModelError;
use mc_core::Xoshiro256StarStar;

/// Terminal-only GBM kernel.
///
/// # Examples
///
/// ```
/// use mc_core::Xoshiro256StarStar;
/// use mc_models::models::Gbm;
///
/// let gbm = Gbm::new(100.0, 0.05, 0.2, 1.0).unwrap();
/// let mut rng = Xoshiro256StarStar::new(42);
///
/// let s_t = gbm.simulate_terminal(&mut rng);
/// assert!(s_t > 0.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Gbm {
    spot: f64,
    /// (r − ½σ²)·T
    drift: f64,
    /// σ·√T
    diffusion: f64,
    /// e^(−r·T)
    discount: f64,
}

impl Gbm {
    /// Creates a terminal kernel with precomputed constants.
    ///
    /// # Errors
    ///
    /// Rejects non-positive spot, negative volatility or negative maturity.
    pub fn new(spot: f64, rate: f64, volatility: f64, maturity: f64) -> Result<Self, ModelError> {
        validate_gbm_inputs(spot, volatility, maturity)?;
        Ok(Self {
            spot,
            drift: (rate - 0.5 * volatility * volatility) * maturity,
            diffusion: volatility * maturity.sqrt(),
            discount: (-rate * maturity).exp(),
        })
    }

    /// Maps a standard normal draw to a terminal spot.
    #[inline]
    pub fn terminal_from_normal(&self, z: f64) -> f64 {
        self.spot * (self.drift + self.diffusion * z).exp()
    }

    /// Simulates one terminal spot price.
    #[inline]
    pub fn simulate_terminal(&self, rng: &mut Xoshiro256StarStar) -> f64 {
        self.terminal_from_normal(rng.next_normal())
    }

    /// Simulates an antithetic pair `(S₊, S₋)` from one normal draw.
    ///
    /// Both legs share the draw; the `−Z` leg cancels first-order sampling
    /// error against the `+Z` leg.
    #[inline]
    pub fn simulate_antithetic(&self, rng: &mut Xoshiro256StarStar) -> (f64, f64) {
        let z = rng.next_normal();
        (self.terminal_from_normal(z), self.terminal_from_normal(-z))
    }

    /// Discount factor e^(−r·T).
    #[inline]
    pub fn discount(&self) -> f64 {
        self.discount
    }
}

/// Stepwise GBM kernel for path-dependent contracts.
#[derive(Clone, Copy, Debug)]
pub struct GbmPath {
    spot: f64,
    /// T / num_steps
    dt: f64,
    /// (r − ½σ²)·dt
    drift_dt: f64,
    /// σ·√dt
    diffusion_dt: f64,
    /// e^(−r·T)
    discount: f64,
    num_steps: usize,
}

impl GbmPath {
    /// Creates a path kernel over `num_steps` uniform steps.
    pub fn new(
        spot: f64,
        rate: f64,
        volatility: f64,
        maturity: f64,
        num_steps: usize,
    ) -> Result<Self, ModelError> {
        validate_gbm_inputs(spot, volatility, maturity)?;
        if num_steps == 0 {
            return Err(ModelError::InvalidSteps(num_steps));
        }

        let dt = maturity / num_steps as f64;
        Ok(Self {
            spot,
            dt,
            drift_dt: (rate - 0.5 * volatility * volatility) * dt,
            diffusion_dt: volatility * dt.sqrt(),
            discount: (-rate * maturity).exp(),
            num_steps,
        })
    }

    /// Advances one step: `S(t+dt) = S(t)·exp(drift·dt + σ√dt·Z)`.
    #[inline]
    pub fn step(&self, current: f64, z: f64) -> f64 {
        current * (self.drift_dt + self.diffusion_dt * z).exp()
    }

    /// Fills `path` with a full trajectory; `path[0]` is the initial spot.
    ///
    /// # Panics
    ///
    /// Panics if `path.len() != num_steps + 1`.
    pub fn simulate_path(&self, rng: &mut Xoshiro256StarStar, path: &mut [f64]) {
        assert_eq!(path.len(), self.num_steps + 1);

        path[0] = self.spot;
        for i in 0..self.num_steps {
            let z = rng.next_normal();
            path[i + 1] = self.step(path[i], z);
        }
    }

    /// Walks an antithetic pair of trajectories in lockstep, using `+Z` for
    /// `path_plus` and `−Z` for `path_minus` at every step.
    pub fn simulate_antithetic_paths(
        &self,
        rng: &mut Xoshiro256StarStar,
        path_plus: &mut [f64],
        path_minus: &mut [f64],
    ) {
        assert_eq!(path_plus.len(), self.num_steps + 1);
        assert_eq!(path_minus.len(), self.num_steps + 1);

        path_plus[0] = self.spot;
        path_minus[0] = self.spot;
        for i in 0..self.num_steps {
            let z = rng.next_normal();
            path_plus[i + 1] = self.step(path_plus[i], z);
            path_minus[i + 1] = self.step(path_minus[i], -z);
        }
    }

    /// Discount factor e^(−r·T).
    #[inline]
    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// Step size T / num_steps.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of uniform steps.
    #[inline]
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }
}

fn validate_gbm_inputs(spot: f64, volatility: f64, maturity: f64) -> Result<(), ModelError> {
    if spot <= 0.0 || !spot.is_finite() {
        return Err(ModelError::InvalidSpot(spot));
    }
    if volatility < 0.0 || !volatility.is_finite() {
        return Err(ModelError::InvalidVolatility(volatility));
    }
    if maturity < 0.0 || !maturity.is_finite() {
        return Err(ModelError::InvalidMaturity(maturity));
    }
    Ok(())
}
