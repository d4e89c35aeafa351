//! Antithetic pairing for terminal-value kernels.
//!
//! Each pair consumes a single normal draw `Z` and evaluates the payoff at
//! both `f(+Z)` and `f(−Z)`. When the payoff is monotone in `Z` the two legs
//! are negatively correlated and their average has lower variance than two
//! independent samples.
//!
//! Path-dependent contracts pair whole trajectories instead (see
//! `GbmPath::simulate_antithetic_paths`), walking the `+Z` and `−Z` paths in
//! lockstep at every step.

use mc_core::Xoshiro256StarStar;
use mc_models::models::Gbm;

use crate::executor::PartialSum;
use crate::instruments::OptionType;

/// Sums `num_pairs` antithetic payoff pairs for a terminal GBM kernel.
///
/// Returns the raw sum over `2·num_pairs` paths; the caller divides and
/// discounts once at the end.
pub fn antithetic_terminal_sum(
    model: &Gbm,
    rng: &mut Xoshiro256StarStar,
    strike: f64,
    option_type: OptionType,
    num_pairs: u64,
) -> PartialSum {
    let mut sum = 0.0;

    for _ in 0..num_pairs {
        let (plus, minus) = model.simulate_antithetic(rng);
        sum += option_type.payoff(plus, strike);
        sum += option_type.payoff(minus, strike);
    }

    PartialSum {
        sum,
        paths: 2 * num_pairs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pair_count_doubles_paths() {
        let model = Gbm::new(100.0, 0.05, 0.2, 1.0).unwrap();
        let mut rng = Xoshiro256StarStar::new(42);

        let partial = antithetic_terminal_sum(&model, &mut rng, 100.0, OptionType::Call, 500);
        assert_eq!(partial.paths, 1000);
        assert!(partial.sum > 0.0);
    }

    #[test]
    fn test_antithetic_reduces_variance_for_calls() {
        // Compare the batch-to-batch variance of plain and antithetic means
        // over the same total path budget.
        let model = Gbm::new(100.0, 0.05, 0.2, 1.0).unwrap();
        let batches = 30;
        let paths_per_batch = 2_000u64;

        let mut plain_means = Vec::new();
        let mut anti_means = Vec::new();

        for batch in 0..batches {
            let mut rng = Xoshiro256StarStar::new(1000 + batch);
            let sum: f64 = (0..paths_per_batch)
                .map(|_| OptionType::Call.payoff(model.simulate_terminal(&mut rng), 100.0))
                .sum();
            plain_means.push(sum / paths_per_batch as f64);

            let mut rng = Xoshiro256StarStar::new(1000 + batch);
            let partial = antithetic_terminal_sum(
                &model,
                &mut rng,
                100.0,
                OptionType::Call,
                paths_per_batch / 2,
            );
            anti_means.push(partial.sum / partial.paths as f64);
        }

        let var = |xs: &[f64]| {
            let mean = xs.iter().sum::<f64>() / xs.len() as f64;
            xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (xs.len() - 1) as f64
        };

        assert!(
            var(&anti_means) < var(&plain_means),
            "antithetic variance {} should be below plain {}",
            var(&anti_means),
            var(&plain_means)
        );
    }
}
