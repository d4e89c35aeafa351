//! Black-76 forward dynamics kernel.
//!
//! Under the forward measure the forward price is a driftless martingale, so
//! the log-space drift is `−½σ²` with no cost of carry; discounting applies
//! only to the terminal payoff:
//!
//! ```text
//! F(T) = F(0) · exp(−½σ²·T + σ·√T · Z)
//! ```

use crate::error::ModelError;
use mc_core::Xoshiro256StarStar;

/// Terminal kernel for futures/forward options.
///
/// # Examples
///
/// ```
/// use mc_core::Xoshiro256StarStar;
/// use mc_models::models::Black76;
///
/// let model = Black76::new(100.0, 0.05, 0.2, 1.0).unwrap();
/// let mut rng = Xoshiro256StarStar::new(42);
/// assert!(model.simulate_terminal(&mut rng) > 0.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Black76 {
    forward: f64,
    /// −½σ²·T
    drift: f64,
    /// σ·√T
    diffusion: f64,
    /// e^(−r·T)
    discount: f64,
}

impl Black76 {
    /// Creates a forward kernel with precomputed constants.
    pub fn new(
        forward: f64,
        rate: f64,
        volatility: f64,
        maturity: f64,
    ) -> Result<Self, ModelError> {
        if forward <= 0.0 || !forward.is_finite() {
            return Err(ModelError::InvalidSpot(forward));
        }
        if volatility < 0.0 || !volatility.is_finite() {
            return Err(ModelError::InvalidVolatility(volatility));
        }
        if maturity < 0.0 || !maturity.is_finite() {
            return Err(ModelError::InvalidMaturity(maturity));
        }

        Ok(Self {
            forward,
            drift: -0.5 * volatility * volatility * maturity,
            diffusion: volatility * maturity.sqrt(),
            discount: (-rate * maturity).exp(),
        })
    }

    /// Maps a standard normal draw to a terminal forward.
    #[inline]
    pub fn terminal_from_normal(&self, z: f64) -> f64 {
        self.forward * (self.drift + self.diffusion * z).exp()
    }

    /// Simulates one terminal forward price.
    #[inline]
    pub fn simulate_terminal(&self, rng: &mut Xoshiro256StarStar) -> f64 {
        self.terminal_from_normal(rng.next_normal())
    }

    /// Simulates an antithetic pair `(F₊, F₋)` from one normal draw.
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
