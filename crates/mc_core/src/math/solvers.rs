//! Dense least-squares solver for small regression systems.
//!
//! The LSM backward induction fits a handful of basis coefficients against
//! thousands of samples. Forming the normal equations and eliminating the
//! tiny square system directly beats pulling in a general-purpose linear
//! algebra stack for a 3×3 solve in a hot loop.

/// Pivots below this magnitude mark the system as singular.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Solves `min ‖A·β − y‖²` through the normal equations `(AᵀA)·β = Aᵀy`.
///
/// `design` is row-major with `n_basis` columns and `targets.len()` rows.
/// The square system is eliminated with partial pivoting.
///
/// Returns `None` when the design matrix is rank-deficient (any pivot below
/// `1e-12`); callers are expected to skip the regression step in that case
/// rather than force a fit.
///
/// # Panics
///
/// Panics if `design.len() != targets.len() * n_basis` (an internal sizing
/// bug, not an input condition).
pub fn solve_least_squares(design: &[f64], targets: &[f64], n_basis: usize) -> Option<Vec<f64>> {
    let n_samples = targets.len();
    assert_eq!(design.len(), n_samples * n_basis);

    if n_samples < n_basis {
        return None;
    }

    // Accumulate AᵀA and Aᵀy.
    let mut ata = vec![0.0; n_basis * n_basis];
    let mut atb = vec![0.0; n_basis];

    for (row, &y) in design.chunks_exact(n_basis).zip(targets) {
        for j in 0..n_basis {
            atb[j] += row[j] * y;
            for k in 0..n_basis {
                ata[j * n_basis + k] += row[j] * row[k];
            }
        }
    }

    // Augmented matrix [AᵀA | Aᵀy].
    let cols = n_basis + 1;
    let mut aug = vec![0.0; n_basis * cols];
    for i in 0..n_basis {
        aug[i * cols..i * cols + n_basis].copy_from_slice(&ata[i * n_basis..(i + 1) * n_basis]);
        aug[i * cols + n_basis] = atb[i];
    }

    // Forward elimination with partial pivoting.
    for col in 0..n_basis {
        let mut max_row = col;
        let mut max_val = aug[col * cols + col].abs();
        for row in col + 1..n_basis {
            let candidate = aug[row * cols + col].abs();
            if candidate > max_val {
                max_val = candidate;
                max_row = row;
            }
        }

        if max_row != col {
            for j in 0..cols {
                aug.swap(col * cols + j, max_row * cols + j);
            }
        }

        if aug[col * cols + col].abs() < PIVOT_TOLERANCE {
            return None;
        }

        for row in col + 1..n_basis {
            let factor = aug[row * cols + col] / aug[col * cols + col];
            for j in col..cols {
                aug[row * cols + j] -= factor * aug[col * cols + j];
            }
        }
    }

    // Back substitution.
    let mut coeffs = vec![0.0; n_basis];
    for i in (0..n_basis).rev() {
        let mut value = aug[i * cols + n_basis];
        for j in i + 1..n_basis {
            value -= aug[i * cols + j] * coeffs[j];
        }
        coeffs[i] = value / aug[i * cols + i];
    }

    Some(coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_fit_line() {
        // y = 2 + 3x sampled without noise; basis {1, x}.
        let xs = [0.0, 1.0, 2.0, 3.0];
        let mut design = Vec::new();
        let mut targets = Vec::new();
        for &x in &xs {
            design.extend_from_slice(&[1.0, x]);
            targets.push(2.0 + 3.0 * x);
        }

        let beta = solve_least_squares(&design, &targets, 2).unwrap();
        assert_relative_eq!(beta[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(beta[1], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_quadratic_fit() {
        // y = 1 - x + 0.5x² with basis {1, x, x²}.
        let mut design = Vec::new();
        let mut targets = Vec::new();
        for i in 0..20 {
            let x = i as f64 * 0.25;
            design.extend_from_slice(&[1.0, x, x * x]);
            targets.push(1.0 - x + 0.5 * x * x);
        }

        let beta = solve_least_squares(&design, &targets, 3).unwrap();
        assert_relative_eq!(beta[0], 1.0, epsilon = 1e-8);
        assert_relative_eq!(beta[1], -1.0, epsilon = 1e-8);
        assert_relative_eq!(beta[2], 0.5, epsilon = 1e-8);
    }

    #[test]
    fn test_singular_design_rejected() {
        // Two identical columns make AᵀA rank 1.
        let design = [1.0, 1.0, 2.0, 2.0, 3.0, 3.0];
        let targets = [1.0, 2.0, 3.0];

        assert!(solve_least_squares(&design, &targets, 2).is_none());
    }

    #[test]
    fn test_underdetermined_rejected() {
        let design = [1.0, 0.5, 0.25, 1.0, 0.7, 0.49];
        let targets = [1.0, 2.0];

        assert!(solve_least_squares(&design, &targets, 3).is_none());
    }

    #[test]
    fn test_overdetermined_noisy_average() {
        // Constant basis: the fit is the sample mean.
        let design = [1.0, 1.0, 1.0, 1.0];
        let targets = [2.0, 4.0, 6.0, 8.0];

        let beta = solve_least_squares(&design, &targets, 1).unwrap();
        assert_relative_eq!(beta[0], 5.0, epsilon = 1e-10);
    }
}
