//! Least-Squares Monte Carlo (Longstaff-Schwartz 2001).
//!
//! Early-exercise contracts are priced by backward induction over a set of
//! exercise dates:
//!
//! 1. Simulate all paths forward and seed each path's cashflow with the
//!    terminal payoff.
//! 2. Walking backwards, discount every cashflow one period, regress the
//!    discounted continuation values of the in-the-money paths on basis
//!    functions of moneyness, and exercise wherever the immediate payoff
//!    beats the fitted continuation value.
//! 3. Discount the opening period and average.
//!
//! The regression target is the *current* cashflow: the realised value of
//! continuing under the optimal strategy from the next date onwards. That,
//! not the full remaining pathwise payoff, is what makes the conditional
//! expectation estimate unbiased.
//!
//! # Basis
//!
//! Three unweighted Laguerre polynomials of moneyness `x = S/K`:
//!
//! ```text
//! L₀(x) = 1,  L₁(x) = 1 − x,  L₂(x) = 1 − 2x + x²/2
//! ```
//!
//! The textbook weighting `e^(−x/2)·Lₙ(x)` loses precision catastrophically
//! for moderate `x`; the unweighted form spans the same space. Three basis
//! functions suffice; more inflate the coefficient variance without
//! reducing bias.
//!
//! # Degenerate regressions
//!
//! Fewer than three in-the-money paths, or a pivot below 1e-12 in the normal
//! equations, skips the exercise decision at that date and leaves the
//! cashflows carried backwards unchanged. Forcing exercise on a degenerate
//! fit would bias prices upward.

use mc_core::math::solve_least_squares;
use mc_core::PricingError;
use mc_models::models::GbmPath;
use tracing::debug;

use crate::context::SimulationContext;
use crate::instruments::OptionType;

/// Number of regression basis functions.
pub const NUM_BASIS: usize = 3;

/// Bermudan simulation grids put at least this many steps between inception
/// and maturity.
const MIN_BERMUDAN_STEPS: usize = 50;

/// Fine-grid steps per Bermudan exercise date.
const STEPS_PER_EXERCISE: usize = 10;

/// Unweighted Laguerre basis evaluated at moneyness `x = S/K`.
#[inline]
pub fn basis(x: f64) -> [f64; NUM_BASIS] {
    [1.0, 1.0 - x, 1.0 - 2.0 * x + 0.5 * x * x]
}

/// Allocates a zeroed `f64` buffer, mapping allocation failure into the
/// error taxonomy instead of aborting.
fn try_buffer(len: usize) -> Result<Vec<f64>, PricingError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| PricingError::OutOfMemory {
        bytes: len * std::mem::size_of::<f64>(),
    })?;
    buf.resize(len, 0.0);
    Ok(buf)
}

/// Prices an American option by LSM with `num_steps` exercise opportunities.
///
/// The exercise grid is the simulation grid: one opportunity per step.
pub fn lsm_american(
    ctx: &SimulationContext,
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    num_steps: usize,
    option_type: OptionType,
) -> Result<f64, PricingError> {
    if num_steps == 0 {
        return Err(PricingError::invalid("steps", 0.0));
    }

    let n_paths = ctx.simulations() as usize;
    let model = GbmPath::new(spot, rate, volatility, time, num_steps)?;
    let df_step = (-rate * model.dt()).exp();

    // Working set: spot matrix, per-path cashflow, per-path exercise step.
    let mut paths = try_buffer(n_paths * (num_steps + 1))?;
    let mut cashflow = try_buffer(n_paths)?;
    let mut exercise_step = vec![num_steps; n_paths];

    // Forward pass: simulate every path from one stream.
    let mut rng = ctx.master_rng().clone();
    for row in paths.chunks_exact_mut(num_steps + 1) {
        model.simulate_path(&mut rng, row);
    }

    // Terminal payoffs seed the cashflows.
    for (i, row) in paths.chunks_exact(num_steps + 1).enumerate() {
        cashflow[i] = option_type.payoff(row[num_steps], strike);
    }

    // Regression scratch, sized once for the worst case.
    let mut design = try_buffer(n_paths * NUM_BASIS)?;
    let mut targets = try_buffer(n_paths)?;
    let mut itm_indices: Vec<usize> = Vec::with_capacity(n_paths);

    // Backward induction from the penultimate step down to step 1.
    for step in (1..num_steps).rev() {
        // Bring every cashflow back one period first; the regression targets
        // must be present values as seen from this date.
        for value in cashflow.iter_mut() {
            *value *= df_step;
        }

        itm_indices.clear();
        let mut n_itm = 0;
        for (i, row) in paths.chunks_exact(num_steps + 1).enumerate() {
            let exercise_value = option_type.payoff(row[step], strike);
            if exercise_value > 0.0 {
                let b = basis(row[step] / strike);
                design[n_itm * NUM_BASIS..(n_itm + 1) * NUM_BASIS].copy_from_slice(&b);
                targets[n_itm] = cashflow[i];
                itm_indices.push(i);
                n_itm += 1;
            }
        }

        if n_itm < NUM_BASIS {
            continue;
        }

        let Some(coeffs) =
            solve_least_squares(&design[..n_itm * NUM_BASIS], &targets[..n_itm], NUM_BASIS)
        else {
            continue;
        };

        for &i in &itm_indices {
            let s_t = paths[i * (num_steps + 1) + step];
            let exercise_value = option_type.payoff(s_t, strike);

            let b = basis(s_t / strike);
            let continuation: f64 = coeffs.iter().zip(b).map(|(c, f)| c * f).sum();

            // Overwriting the carried value cancels all later cashflow on
            // this path implicitly.
            if exercise_value > continuation {
                cashflow[i] = exercise_value;
                exercise_step[i] = step;
            }
        }
    }

    // One more period from step 1 back to inception.
    let mut sum = 0.0;
    for value in cashflow.iter_mut() {
        *value *= df_step;
        sum += *value;
    }

    let early = exercise_step.iter().filter(|&&s| s < num_steps).count();
    debug!(
        early_fraction = early as f64 / n_paths as f64,
        num_steps, "LSM backward induction complete"
    );

    Ok(sum / n_paths as f64)
}

/// Prices a Bermudan option by LSM over explicit exercise dates.
///
/// `exercise_fractions` are fractions of the maturity, strictly increasing
/// and ending at 1.0 for a final exercise at expiry. Simulation runs on a
/// fine uniform grid (at least ten steps per exercise date and never fewer
/// than fifty) and spots are recorded at the nearest grid point to each
/// date.
pub fn lsm_bermudan(
    ctx: &SimulationContext,
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    time: f64,
    exercise_fractions: &[f64],
    option_type: OptionType,
) -> Result<f64, PricingError> {
    let num_exercise = exercise_fractions.len();
    if num_exercise == 0 {
        return Err(PricingError::invalid("exercise_dates", 0.0));
    }

    let n_paths = ctx.simulations() as usize;
    let sim_steps = (num_exercise * STEPS_PER_EXERCISE).max(MIN_BERMUDAN_STEPS);
    let model = GbmPath::new(spot, rate, volatility, time, sim_steps)?;

    // Map each exercise date onto the fine grid.
    let ex_steps: Vec<usize> = exercise_fractions
        .iter()
        .map(|&frac| {
            let clamped = frac.clamp(0.0, 1.0);
            ((clamped * sim_steps as f64 + 0.5) as usize).min(sim_steps)
        })
        .collect();

    // Only the spots at exercise dates are retained.
    let mut spot_at_exercise = try_buffer(n_paths * num_exercise)?;
    let mut cashflow = try_buffer(n_paths)?;
    let mut path = try_buffer(sim_steps + 1)?;

    let mut rng = ctx.master_rng().clone();
    for i in 0..n_paths {
        model.simulate_path(&mut rng, &mut path);
        for (j, &step) in ex_steps.iter().enumerate() {
            spot_at_exercise[i * num_exercise + j] = path[step];
        }
    }

    // Seed with the payoff at the final exercise date.
    for i in 0..n_paths {
        let s_last = spot_at_exercise[i * num_exercise + num_exercise - 1];
        cashflow[i] = option_type.payoff(s_last, strike);
    }

    let mut design = try_buffer(n_paths * NUM_BASIS)?;
    let mut targets = try_buffer(n_paths)?;
    let mut itm_indices: Vec<usize> = Vec::with_capacity(n_paths);

    // Backward over exercise dates only.
    for ex_idx in (0..num_exercise.saturating_sub(1)).rev() {
        let t_this = exercise_fractions[ex_idx] * time;
        let t_next = exercise_fractions[ex_idx + 1] * time;
        let df = (-rate * (t_next - t_this)).exp();

        for value in cashflow.iter_mut() {
            *value *= df;
        }

        itm_indices.clear();
        let mut n_itm = 0;
        for i in 0..n_paths {
            let s_t = spot_at_exercise[i * num_exercise + ex_idx];
            let exercise_value = option_type.payoff(s_t, strike);
            if exercise_value > 0.0 {
                let b = basis(s_t / strike);
                design[n_itm * NUM_BASIS..(n_itm + 1) * NUM_BASIS].copy_from_slice(&b);
                targets[n_itm] = cashflow[i];
                itm_indices.push(i);
                n_itm += 1;
            }
        }

        if n_itm < NUM_BASIS {
            continue;
        }

        let Some(coeffs) =
            solve_least_squares(&design[..n_itm * NUM_BASIS], &targets[..n_itm], NUM_BASIS)
        else {
            continue;
        };

        for &i in &itm_indices {
            let s_t = spot_at_exercise[i * num_exercise + ex_idx];
            let exercise_value = option_type.payoff(s_t, strike);

            let b = basis(s_t / strike);
            let continuation: f64 = coeffs.iter().zip(b).map(|(c, f)| c * f).sum();

            if exercise_value > continuation {
                cashflow[i] = exercise_value;
            }
        }
    }

    // Discount from the first exercise date to inception.
    let df_first = (-rate * exercise_fractions[0] * time).exp();
    let sum: f64 = cashflow.iter().sum();

    Ok(df_first * sum / n_paths as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mc_models::analytical::{black_scholes_call, black_scholes_put};

    fn test_ctx(simulations: u64) -> SimulationContext {
        let mut ctx = SimulationContext::new();
        ctx.set_simulations(simulations);
        ctx.set_seed(42);
        ctx
    }

    #[test]
    fn test_basis_values() {
        let b = basis(1.0);
        assert_eq!(b[0], 1.0);
        assert_eq!(b[1], 0.0);
        assert_relative_eq!(b[2], -0.5, epsilon = 1e-15);

        let b = basis(0.0);
        assert_eq!(b, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_american_put_above_european() {
        // Early exercise has strictly positive value for puts.
        let ctx = test_ctx(50_000);

        let american =
            lsm_american(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 50, OptionType::Put).unwrap();
        let european = black_scholes_put(100.0, 100.0, 0.05, 0.2, 1.0);

        assert!(american >= european - 0.10, "american = {american}");
        // Reference value for this configuration is about 6.08.
        assert_relative_eq!(american, 6.08, epsilon = 0.5);
    }

    #[test]
    fn test_american_call_matches_european_without_dividends() {
        // Early exercise of a call on a non-dividend underlying is never
        // optimal; LSM should stay within noise of Black-Scholes.
        let ctx = test_ctx(50_000);

        let american =
            lsm_american(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 50, OptionType::Call).unwrap();
        let european = black_scholes_call(100.0, 100.0, 0.05, 0.2, 1.0);

        assert_relative_eq!(american, european, epsilon = 1.0);
    }

    #[test]
    fn test_deep_itm_put_exercises_immediately() {
        // With S = 50 against K = 100 the put should be worth close to its
        // intrinsic value; continuation can never beat immediate exercise by
        // much.
        let ctx = test_ctx(20_000);

        let price = lsm_american(&ctx, 50.0, 100.0, 0.05, 0.2, 1.0, 50, OptionType::Put).unwrap();
        assert!(price >= 49.0, "price = {price}");
    }

    #[test]
    fn test_bermudan_between_european_and_american() {
        let ctx = test_ctx(50_000);

        let european = black_scholes_put(100.0, 100.0, 0.05, 0.2, 1.0);
        let fractions: Vec<f64> = (1..=4).map(|i| i as f64 / 4.0).collect();
        let bermudan =
            lsm_bermudan(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, &fractions, OptionType::Put)
                .unwrap();
        let american =
            lsm_american(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 50, OptionType::Put).unwrap();

        // Ordering within Monte Carlo noise.
        assert!(bermudan >= european - 0.15, "bermudan = {bermudan}");
        assert!(bermudan <= american + 0.15, "bermudan = {bermudan}");
    }

    #[test]
    fn test_single_exercise_date_is_european() {
        // One exercise opportunity at maturity: no early-exercise premium.
        let ctx = test_ctx(50_000);

        let bermudan =
            lsm_bermudan(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, &[1.0], OptionType::Put).unwrap();
        let european = black_scholes_put(100.0, 100.0, 0.05, 0.2, 1.0);

        assert_relative_eq!(bermudan, european, epsilon = 0.5);
    }

    #[test]
    fn test_reproducible() {
        let ctx = test_ctx(10_000);
        let a = lsm_american(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 25, OptionType::Put).unwrap();
        let b = lsm_american(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 25, OptionType::Put).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_invalid_inputs() {
        let ctx = test_ctx(1_000);
        assert!(lsm_american(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, 0, OptionType::Put).is_err());
        assert!(lsm_bermudan(&ctx, 100.0, 100.0, 0.05, 0.2, 1.0, &[], OptionType::Put).is_err());
    }
}
