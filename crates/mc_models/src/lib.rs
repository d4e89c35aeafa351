//! # Monte Carlo Models (Layer 2)
//!
//! Stochastic dynamics and their closed-form companions:
//!
//! - [`models`]: path-simulation kernels for geometric Brownian motion,
//!   Black-76 forward dynamics, SABR, Heston and Merton jump-diffusion.
//!   Every kernel precomputes its step-invariant constants once so the
//!   per-path loop stays free of `exp`/`sqrt` on parameters.
//! - [`analytical`]: closed-form prices used for validation and as
//!   control-variate targets. Black-Scholes, Black-76 (with Greeks and
//!   implied volatility), Reiner-Rubinstein barriers, Goldman-Sosin-Gatto
//!   lookbacks, digitals, the geometric-Asian formula, the Merton series and
//!   the Heston characteristic function.
//!
//! Kernels draw their randomness from [`mc_core::Xoshiro256StarStar`] passed
//! in by the caller; models own no generator state, which keeps every worker
//! thread's stream under the executor's control.

pub mod analytical;
pub mod error;
pub mod models;

pub use error::ModelError;
