//! Standard normal distribution functions.
//!
//! Closed-form pricers and the quasi-Monte Carlo normal mapping are built on
//! three primitives: the CDF, the PDF, and the inverse CDF.

/// 1 / sqrt(2π)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Complementary error function via the Abramowitz & Stegun 7.1.26
/// approximation (maximum absolute error 1.5e-7), evaluated with Horner's
/// method.
#[inline]
fn erfc_approx(x: f64) -> f64 {
    let abs_x = x.abs();

    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let t = 1.0 / (1.0 + p * abs_x);
    let poly = t * (a1 + t * (a2 + t * (a3 + t * (a4 + t * a5))));
    let erfc_abs = poly * (-abs_x * abs_x).exp();

    if x < 0.0 {
        2.0 - erfc_abs
    } else {
        erfc_abs
    }
}

/// Standard normal cumulative distribution function.
///
/// `Φ(x) = erfc(-x / √2) / 2`, using `erfc` for stability in the tails.
///
/// # Examples
///
/// ```
/// use mc_core::math::norm_cdf;
///
/// assert!((norm_cdf(0.0) - 0.5).abs() < 1e-7);
/// assert!(norm_cdf(-4.0) < 1e-4);
/// assert!(norm_cdf(4.0) > 0.9999);
/// ```
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc_approx(-x * std::f64::consts::FRAC_1_SQRT_2)
}

/// Standard normal probability density function.
#[inline]
pub fn norm_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Inverse standard normal CDF via Moro's algorithm.
///
/// Beasley-Springer rational approximation in the central region, Moro's
/// Chebyshev fit in the tails. Accurate to roughly 3e-9 over (0, 1).
///
/// # Examples
///
/// ```
/// use mc_core::math::{inv_norm_cdf, norm_cdf};
///
/// let z = inv_norm_cdf(0.975);
/// assert!((z - 1.959964).abs() < 1e-4);
/// assert!((norm_cdf(z) - 0.975).abs() < 1e-6);
/// ```
pub fn inv_norm_cdf(u: f64) -> f64 {
    const A: [f64; 4] = [2.50662823884, -18.61500062529, 41.39119773534, -25.44106049637];
    const B: [f64; 4] = [-8.47351093090, 23.08336743743, -21.06224101826, 3.13082909833];
    const C: [f64; 9] = [
        0.3374754822726147,
        0.9761690190917186,
        0.1607979714918209,
        0.0276438810333863,
        0.0038405729373609,
        0.0003951896511919,
        0.0000321767881768,
        0.0000002888167364,
        0.0000003960315187,
    ];

    let x = u - 0.5;

    if x.abs() < 0.42 {
        let r = x * x;
        x * (((A[3] * r + A[2]) * r + A[1]) * r + A[0])
            / ((((B[3] * r + B[2]) * r + B[1]) * r + B[0]) * r + 1.0)
    } else {
        let mut r = if x > 0.0 { 1.0 - u } else { u };
        r = (-r.ln()).ln();
        let mut z = C[0]
            + r * (C[1]
                + r * (C[2]
                    + r * (C[3] + r * (C[4] + r * (C[5] + r * (C[6] + r * (C[7] + r * C[8])))))));
        if x < 0.0 {
            z = -z;
        }
        z
    }
}
