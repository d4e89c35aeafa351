//! Parallel executor.
//!
//! Partitions `N` simulations across `T` work items: each item takes
//! `⌊N/T⌋` paths, the first `N mod T` items one extra. Item `i` owns a clone
//! of the master generator advanced by `i` jumps, so the substreams sit
//! `2^128` draws apart and cannot overlap. Workers accumulate locally,
//! without locks or atomics, and the partial sums are reduced in item order after
//! the single join point, which keeps the result bit-identical for a fixed
//! `(seed, N, T)` no matter how rayon schedules the items.
//!
//! Runs with different `T` jump the master differently and may legitimately
//! differ within Monte Carlo error; the determinism contract is per thread
//! count.

use mc_core::Xoshiro256StarStar;
use rayon::prelude::*;
use tracing::debug;

/// One worker's accumulated result.
#[derive(Clone, Copy, Debug, Default)]
pub struct PartialSum {
    /// Sum of (undiscounted) payoffs.
    pub sum: f64,
    /// Number of paths actually simulated.
    pub paths: u64,
}

/// One worker's slice of the simulation budget.
#[derive(Clone, Debug)]
pub struct WorkItem {
    /// Jump-derived generator owned by this worker.
    pub rng: Xoshiro256StarStar,
    /// Number of paths assigned to this worker.
    pub count: u64,
}

/// Splits `total` simulations into `threads` work items with jump-spaced
/// generators.
pub fn partition(master: &Xoshiro256StarStar, total: u64, threads: u32) -> Vec<WorkItem> {
    let threads = threads.max(1) as u64;
    let base = total / threads;
    let remainder = total % threads;

    let mut rng = master.clone();
    let mut items = Vec::with_capacity(threads as usize);

    for i in 0..threads {
        let count = base + u64::from(i < remainder);
        items.push(WorkItem {
            rng: rng.clone(),
            count,
        });
        rng.jump();
    }

    items
}

/// Runs `worker` over the partitioned simulation budget and returns the mean
/// payoff (total sum over total paths), undiscounted.
///
/// The worker receives its own generator and path budget and returns its
/// local [`PartialSum`]. With one thread everything runs inline on the
/// calling thread; with more, items execute on the rayon pool and results
/// are collected back in item order before the sequential reduction.
pub fn run_mean<F>(master: &Xoshiro256StarStar, total: u64, threads: u32, worker: F) -> f64
where
    F: Fn(&mut Xoshiro256StarStar, u64) -> PartialSum + Send + Sync,
{
    let items = partition(master, total, threads);

    let partials: Vec<PartialSum> = if threads <= 1 {
        items
            .into_iter()
            .map(|mut item| worker(&mut item.rng, item.count))
            .collect()
    } else {
        debug!(
            threads,
            total, "dispatching simulations across jump-derived substreams"
        );
        items
            .into_par_iter()
            .map(|mut item| worker(&mut item.rng, item.count))
            .collect()
    };

    let (sum, paths) = partials
        .iter()
        .fold((0.0, 0u64), |(s, p), part| (s + part.sum, p + part.paths));

    sum / paths.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_partition_counts() {
        let master = Xoshiro256StarStar::new(1);

        // 10 = 3 + 3 + 2 + 2
        let items = partition(&master, 10, 4);
        let counts: Vec<u64> = items.iter().map(|w| w.count).collect();
        assert_eq!(counts, vec![3, 3, 2, 2]);
        assert_eq!(counts.iter().sum::<u64>(), 10);

        // Even split leaves no remainder.
        let items = partition(&master, 12, 4);
        assert!(items.iter().all(|w| w.count == 3));
    }

    #[test]
    fn test_partition_zero_threads_coerced() {
        let master = Xoshiro256StarStar::new(1);
        let items = partition(&master, 5, 0);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].count, 5);
    }

    #[test]
    fn test_items_use_jump_spaced_streams() {
        let master = Xoshiro256StarStar::new(42);
        let items = partition(&master, 100, 3);

        // Item 0 is the master stream itself, item 1 one jump ahead.
        let mut expected = master.clone();
        assert_eq!(items[0].rng, expected);
        expected.jump();
        assert_eq!(items[1].rng, expected);
        expected.jump();
        assert_eq!(items[2].rng, expected);
    }

    #[test]
    fn test_run_mean_counts_paths() {
        // A worker that returns each path's index-free constant payoff.
        let master = Xoshiro256StarStar::new(7);
        let mean = run_mean(&master, 1000, 4, |_rng, count| PartialSum {
            sum: 2.5 * count as f64,
            paths: count,
        });

        assert_relative_eq!(mean, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_run_mean_deterministic_across_runs() {
        let master = Xoshiro256StarStar::new(9);
        let worker = |rng: &mut Xoshiro256StarStar, count: u64| {
            let sum: f64 = (0..count).map(|_| rng.next_uniform()).sum();
            PartialSum { sum, paths: count }
        };

        let first = run_mean(&master, 10_000, 4, worker);
        let second = run_mean(&master, 10_000, 4, worker);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    proptest::proptest! {
        #[test]
        fn prop_partition_conserves_paths(total in 0u64..1_000_000, threads in 0u32..64) {
            let master = Xoshiro256StarStar::new(3);
            let items = partition(&master, total, threads);

            proptest::prop_assert_eq!(items.len() as u32, threads.max(1));
            proptest::prop_assert_eq!(items.iter().map(|w| w.count).sum::<u64>(), total);

            // No item exceeds its neighbour by more than one path.
            let max = items.iter().map(|w| w.count).max().unwrap();
            let min = items.iter().map(|w| w.count).min().unwrap();
            proptest::prop_assert!(max - min <= 1);
        }
    }

    #[test]
    fn test_thread_counts_converge_to_same_limit() {
        let master = Xoshiro256StarStar::new(11);
        let worker = |rng: &mut Xoshiro256StarStar, count: u64| {
            let sum: f64 = (0..count).map(|_| rng.next_uniform()).sum();
            PartialSum { sum, paths: count }
        };

        let single = run_mean(&master, 200_000, 1, worker);
        let quad = run_mean(&master, 200_000, 4, worker);

        // Different substream layouts, same distribution.
        assert_relative_eq!(single, 0.5, epsilon = 0.005);
        assert_relative_eq!(quad, 0.5, epsilon = 0.005);
    }
}
