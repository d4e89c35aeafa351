//! Closed-form pricers and identities.
//!
//! These serve three roles: standalone pricing where an exact formula exists,
//! validation references for the Monte Carlo estimators, and known
//! expectations for the control-variate machinery.
//!
//! Every pricer implements the same three branches: `time ≤ 0` returns the
//! intrinsic value, `volatility ≤ 0` returns the discounted intrinsic value,
//! and only the general case evaluates the formula. The degenerate branches
//! are part of the contract, not defensive extras.

pub mod asian;
pub mod barrier;
pub mod black76;
pub mod black_scholes;
pub mod digital;
pub mod heston;
pub mod lookback;
pub mod merton;
pub mod sabr;

pub use asian::{geometric_asian_call, geometric_asian_put};
pub use barrier::{
    barrier_down_in_call, barrier_down_in_put, barrier_down_out_call, barrier_down_out_put,
    barrier_up_in_call, barrier_up_in_put, barrier_up_out_call, barrier_up_out_put,
};
pub use black76::{
    black76_call, black76_delta, black76_gamma, black76_implied_vol, black76_put, black76_theta,
    black76_vega,
};
pub use black_scholes::{black_scholes_call, black_scholes_put};
pub use digital::{digital_asset_call, digital_asset_put, digital_cash_call, digital_cash_put};
pub use heston::heston_char_fn;
pub use lookback::{lookback_floating_call, lookback_floating_put};
pub use merton::{merton_call, merton_put};
pub use sabr::{sabr_atm_vol, sabr_implied_vol};
