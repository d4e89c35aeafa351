//! # Monte Carlo Pricing Engine (Layer 3)
//!
//! The orchestration layer: a [`SimulationContext`] carries the simulation
//! configuration and the master generator, the [`executor`] partitions work
//! across jump-derived substreams, and the [`instruments`] modules drive the
//! payoffs: Europeans, digitals, Asians, barriers with Brownian-bridge
//! correction, lookbacks, and LSM-based American/Bermudan contracts.
//!
//! ## Determinism
//!
//! Every pricing call derives its randomness from a clone of the context's
//! master generator; the context itself is never mutated by pricing. The
//! same `(seed, simulations, threads)` configuration therefore produces
//! bit-identical results, run after run, regardless of thread scheduling:
//! worker `i` always owns the substream `master.jumped(i)` and partial sums
//! are reduced in worker order.
//!
//! ## Usage
//!
//! ```
//! use mc_pricing::context::SimulationContext;
//! use mc_pricing::instruments::european::european_call;
//!
//! let mut ctx = SimulationContext::new();
//! ctx.set_simulations(50_000);
//! ctx.set_seed(42);
//!
//! let price = european_call(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
//! assert!(price > 0.0);
//! ```

pub mod context;
pub mod executor;
pub mod instruments;
pub mod lsm;
pub mod variance;

pub use context::{ModelKind, SimulationContext};
pub use instruments::OptionType;
pub use mc_core::{version, PricingError};
