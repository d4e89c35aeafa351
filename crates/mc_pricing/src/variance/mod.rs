//! Variance-reduction machinery.
//!
//! Two techniques, composable with the parallel executor:
//!
//! - **Antithetic variates** ([`antithetic`]): pair each draw `Z` with `−Z`
//!   so first-order sampling error cancels. Nearly free and almost always
//!   worth enabling for monotone payoffs.
//! - **Control variates** ([`control_variate`]): subtract a correlated
//!   quantity with known expectation, scaled by the estimated optimal
//!   coefficient. The engine ships two concrete controls: the terminal spot
//!   for Europeans and the geometric Asian for arithmetic Asians.

pub mod antithetic;
pub mod control_variate;

pub use antithetic::antithetic_terminal_sum;
pub use control_variate::CvAccumulator;
