//! # Monte Carlo Core (Layer 1)
//!
//! Foundation crate for the Monte Carlo option-pricing engine:
//!
//! - [`rng`]: reproducible, jumpable xoshiro256** generator and the Sobol
//!   low-discrepancy sequence
//! - [`math`]: normal-distribution functions and the small dense least-squares
//!   solver used by the regression stages
//! - [`error`]: the engine-wide error taxonomy
//! - [`version`]: runtime version query
//!
//! This crate has no knowledge of models or instruments; it only provides the
//! numerical primitives the upper layers are built on. Nothing here performs
//! I/O or allocates behind the caller's back.

pub mod error;
pub mod math;
pub mod rng;
pub mod version;

pub use error::PricingError;
pub use rng::{LowDiscrepancySequence, SobolSequence, Xoshiro256StarStar};
