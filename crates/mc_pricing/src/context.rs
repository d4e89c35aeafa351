//! Simulation context.
//!
//! The context is an inert parameter carrier: simulation count, step count,
//! seed, thread count, variance-reduction flags, model selection and the
//! master generator. Pricing calls read it immutably: worker threads get a
//! snapshot of the parameters plus a jump-derived clone of the master
//! generator, never shared mutable access.

use mc_core::Xoshiro256StarStar;

/// Default number of Monte Carlo paths.
pub const DEFAULT_SIMULATIONS: u64 = 100_000;
/// Default number of time steps per path.
pub const DEFAULT_STEPS: usize = 252;
/// Default master seed.
pub const DEFAULT_SEED: u64 = 0xDEADBEEF;
/// Default worker thread count.
pub const DEFAULT_THREADS: u32 = 1;

/// Underlying dynamics selected on the context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModelKind {
    /// Geometric Brownian motion (default).
    #[default]
    Gbm,
    /// Heston stochastic variance.
    Heston,
    /// SABR stochastic volatility.
    Sabr,
}

/// SABR parameter quadruple stored on the context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SabrConfig {
    /// Initial volatility α.
    pub alpha: f64,
    /// CEV exponent β.
    pub beta: f64,
    /// Correlation ρ.
    pub rho: f64,
    /// Volatility of volatility ν.
    pub nu: f64,
}

/// Heston parameter quintuple stored on the context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HestonConfig {
    /// Initial variance v₀.
    pub v0: f64,
    /// Mean-reversion speed κ.
    pub kappa: f64,
    /// Long-run variance θ.
    pub theta: f64,
    /// Volatility of variance σ.
    pub sigma: f64,
    /// Spot/variance correlation ρ.
    pub rho: f64,
}

/// Carrier for all simulation state.
///
/// # Examples
///
/// ```
/// use mc_pricing::context::SimulationContext;
///
/// let mut ctx = SimulationContext::new();
/// assert_eq!(ctx.simulations(), 100_000);
/// assert_eq!(ctx.steps(), 252);
/// assert_eq!(ctx.seed(), 0xDEADBEEF);
///
/// ctx.set_threads(0); // coerced to the minimum of one worker
/// assert_eq!(ctx.threads(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct SimulationContext {
    num_simulations: u64,
    num_steps: usize,
    seed: u64,
    num_threads: u32,
    antithetic: bool,
    model: ModelKind,
    sabr: Option<SabrConfig>,
    heston: Option<HestonConfig>,
    master_rng: Xoshiro256StarStar,
}

impl SimulationContext {
    /// Creates a context with the library defaults.
    pub fn new() -> Self {
        Self {
            num_simulations: DEFAULT_SIMULATIONS,
            num_steps: DEFAULT_STEPS,
            seed: DEFAULT_SEED,
            num_threads: DEFAULT_THREADS,
            antithetic: false,
            model: ModelKind::Gbm,
            sabr: None,
            heston: None,
            master_rng: Xoshiro256StarStar::new(DEFAULT_SEED),
        }
    }

    /// Number of Monte Carlo paths.
    #[inline]
    pub fn simulations(&self) -> u64 {
        self.num_simulations
    }

    /// Sets the path count, clamped to at least one.
    pub fn set_simulations(&mut self, n: u64) {
        self.num_simulations = n.max(1);
    }

    /// Number of time steps per path.
    #[inline]
    pub fn steps(&self) -> usize {
        self.num_steps
    }

    /// Sets the step count, clamped to at least one.
    pub fn set_steps(&mut self, n: usize) {
        self.num_steps = n.max(1);
    }

    /// Master seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sets the master seed and re-seeds the master generator.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.master_rng = Xoshiro256StarStar::new(seed);
    }

    /// Worker thread count.
    #[inline]
    pub fn threads(&self) -> u32 {
        self.num_threads
    }

    /// Sets the worker thread count; zero is coerced to one.
    pub fn set_threads(&mut self, n: u32) {
        self.num_threads = n.max(1);
    }

    /// Sets the worker count to the number of available hardware threads.
    pub fn use_hardware_threads(&mut self) {
        self.num_threads = num_cpus::get().max(1) as u32;
    }

    /// Whether antithetic variates are enabled.
    #[inline]
    pub fn antithetic(&self) -> bool {
        self.antithetic
    }

    /// Enables or disables antithetic variates.
    pub fn set_antithetic(&mut self, enabled: bool) {
        self.antithetic = enabled;
    }

    /// Selected underlying dynamics.
    #[inline]
    pub fn model(&self) -> ModelKind {
        self.model
    }

    /// Selects the underlying dynamics.
    pub fn set_model(&mut self, model: ModelKind) {
        self.model = model;
    }

    /// Stores SABR parameters and selects the SABR model.
    pub fn set_sabr_params(&mut self, alpha: f64, beta: f64, rho: f64, nu: f64) {
        self.sabr = Some(SabrConfig {
            alpha,
            beta,
            rho,
            nu,
        });
        self.model = ModelKind::Sabr;
    }

    /// SABR parameters, when configured.
    #[inline]
    pub fn sabr_params(&self) -> Option<SabrConfig> {
        self.sabr
    }

    /// Stores Heston parameters and selects the Heston model.
    pub fn set_heston_params(&mut self, v0: f64, kappa: f64, theta: f64, sigma: f64, rho: f64) {
        self.heston = Some(HestonConfig {
            v0,
            kappa,
            theta,
            sigma,
            rho,
        });
        self.model = ModelKind::Heston;
    }

    /// Heston parameters, when configured.
    #[inline]
    pub fn heston_params(&self) -> Option<HestonConfig> {
        self.heston
    }

    /// The master generator. Pricing calls clone it; only `set_seed` mutates
    /// it, so repeated identical calls see identical streams.
    #[inline]
    pub fn master_rng(&self) -> &Xoshiro256StarStar {
        &self.master_rng
    }
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new()
    }
}
