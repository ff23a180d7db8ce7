//! Special mathematical functions.
//!
//! Log-gamma and the regularized incomplete beta function, the two
//! building blocks of the Student's t quantile in [`crate::student_t`].

use crate::error::{check_shape, DomainError};

/// Lanczos coefficients for [`ln_gamma`] (γ = 5, six terms).
#[allow(clippy::excessive_precision)]
const LANCZOS_COEFFICIENTS: [f64; 6] = [
    76.18009172947146,
    -86.50532032941677,
    24.01409824083091,
    -1.231739572450155,
    0.1208650973866179e-2,
    -0.5395239384953e-5,
];

/// Leading term of the Lanczos series.
#[allow(clippy::excessive_precision)]
const LANCZOS_SERIES_SEED: f64 = 1.000000000190015;

/// √(2π)
const SQRT_2PI: f64 = 2.5066282746310005;

/// Maximum number of (even, odd) step pairs in [`beta_cf`].
const CF_MAX_ITER: usize = 100;

/// Lentz stops once a step changes the fraction by less than this.
const CF_EPS: f64 = 3e-7;

/// Floor for recurrence terms, keeps `1/d` and `aa/c` finite.
const CF_TINY: f64 = 1e-30;

/// Lanczos approximation of ln Γ(x).
///
/// Reference: Lanczos (1964), "A Precision Approximation of the Gamma
/// Function", *SIAM Journal on Numerical Analysis* 1(1); coefficient set
/// from Press et al., *Numerical Recipes*, §6.1.
///
/// # Accuracy
/// Relative error around 2 × 10⁻¹⁰ for `x ∈ [0.5, 200]`.
///
/// # Domain
/// Defined for `x > 0`. The series is not reflected for small or negative
/// arguments: `ln_gamma(0.0)` is `+∞` and negative inputs give NaN or a
/// meaningless finite value.
///
/// # Examples
/// ```
/// use tdelta::special::ln_gamma;
/// // Γ(5) = 24
/// assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-9);
/// ```
pub fn ln_gamma(x: f64) -> f64 {
    let mut tmp = x + 5.5;
    tmp -= (x + 0.5) * tmp.ln();

    let mut ser = LANCZOS_SERIES_SEED;
    let mut y = x;
    for &c in &LANCZOS_COEFFICIENTS {
        y += 1.0;
        ser += c / y;
    }
    (SQRT_2PI * ser / x).ln() - tmp
}

/// Log of the Beta function: `ln B(a, b) = ln Γ(a) + ln Γ(b) − ln Γ(a+b)`.
///
/// Same domain caveats as [`ln_gamma`].
///
/// # Examples
/// ```
/// use tdelta::special::ln_beta;
/// // B(1,1) = 1, so ln B(1,1) = 0
/// assert!(ln_beta(1.0, 1.0).abs() < 1e-9);
/// ```
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

// ============================================================================
// Regularized Incomplete Beta Function
// ============================================================================

/// Regularized incomplete beta function I_x(a, b).
///
/// # Definition
/// ```text
/// I_x(a, b) = B(x; a, b) / B(a, b)
/// ```
///
/// # Algorithm
/// Continued fraction evaluated with the modified Lentz method. The
/// fraction only converges quickly for `x < (a+1)/(a+b+2)`; above that
/// point the symmetric problem `1 − I_{1−x}(b, a)` is evaluated instead.
///
/// Reference: Press et al. (2007), *Numerical Recipes*, 3rd ed., §6.4.
///
/// # Errors
/// [`DomainError`] if `x` is NaN or outside `[0, 1]`, or if `a` or `b` is
/// not finite and positive.
///
/// # Examples
/// ```
/// use tdelta::special::regularized_incomplete_beta;
/// // I_0(a,b) = 0, I_1(a,b) = 1
/// assert_eq!(regularized_incomplete_beta(0.0, 2.0, 3.0).unwrap(), 0.0);
/// assert_eq!(regularized_incomplete_beta(1.0, 2.0, 3.0).unwrap(), 1.0);
/// // I_0.5(1,1) = 0.5 (uniform)
/// let half = regularized_incomplete_beta(0.5, 1.0, 1.0).unwrap();
/// assert!((half - 0.5).abs() < 1e-6);
/// // Out of domain
/// assert!(regularized_incomplete_beta(1.5, 2.0, 3.0).is_err());
/// ```
pub fn regularized_incomplete_beta(x: f64, a: f64, b: f64) -> Result<f64, DomainError> {
    check_shape("a", a)?;
    check_shape("b", b)?;
    if x.is_nan() || !(0.0..=1.0).contains(&x) {
        return Err(DomainError::ArgumentOutOfUnitInterval { value: x });
    }
    Ok(incomplete_beta_unchecked(x, a, b))
}

/// [`regularized_incomplete_beta`] without argument validation.
///
/// Callers guarantee `x ∈ [0, 1]` and `a, b > 0`.
pub(crate) fn incomplete_beta_unchecked(x: f64, a: f64, b: f64) -> f64 {
    if x == 0.0 {
        return 0.0;
    }
    if x == 1.0 {
        return 1.0;
    }

    // Prefactor x^a (1−x)^b / B(a,b), shared by both branches.
    let bt = (a * x.ln() + b * (1.0 - x).ln() - ln_beta(a, b)).exp();

    if x < (a + 1.0) / (a + b + 2.0) {
        bt * beta_cf(x, a, b) / a
    } else {
        // I_x(a,b) = 1 − I_{1−x}(b,a)
        1.0 - bt * beta_cf(1.0 - x, b, a) / b
    }
}

/// Continued fraction for the incomplete beta function (modified Lentz).
fn beta_cf(x: f64, a: f64, b: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 / floor_tiny(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=CF_MAX_ITER {
        let m_f = m as f64;
        let m2 = 2.0 * m_f;

        // Even step
        let aa = m_f * (b - m_f) * x / ((qam + m2) * (a + m2));
        d = 1.0 / floor_tiny(1.0 + aa * d);
        c = floor_tiny(1.0 + aa / c);
        h *= d * c;

        // Odd step
        let aa = -(a + m_f) * (qab + m_f) * x / ((a + m2) * (qap + m2));
        d = 1.0 / floor_tiny(1.0 + aa * d);
        c = floor_tiny(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < CF_EPS {
            break;
        }
    }
    h
}

/// Replaces a recurrence term of magnitude below [`CF_TINY`] with `CF_TINY`.
#[inline]
fn floor_tiny(v: f64) -> f64 {
    if v.abs() < CF_TINY {
        CF_TINY
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn ibeta(x: f64, a: f64, b: f64) -> f64 {
        regularized_incomplete_beta(x, a, b).unwrap()
    }

    // --- ln_gamma ---

    #[test]
    fn test_ln_gamma_integers() {
        // Γ(n) = (n-1)! for positive integers
        assert!(ln_gamma(1.0).abs() < 1e-9); // Γ(1) = 1
        assert!(ln_gamma(2.0).abs() < 1e-9); // Γ(2) = 1
        assert!((ln_gamma(3.0) - 2.0_f64.ln()).abs() < 1e-9);
        assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-9);
        assert!((ln_gamma(7.0) - 720.0_f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_ln_gamma_half_integers() {
        // Γ(0.5) = √π, Γ(1.5) = √π/2
        let ln_sqrt_pi = 0.5 * PI.ln();
        assert!((ln_gamma(0.5) - ln_sqrt_pi).abs() < 1e-9);
        assert!((ln_gamma(1.5) - (ln_sqrt_pi - 2.0_f64.ln())).abs() < 1e-9);
    }

    #[test]
    fn test_ln_gamma_large_arguments() {
        // Reference values: ln Γ(100) = ln(99!), ln Γ(200) = ln(199!)
        let rel = |got: f64, want: f64| ((got - want) / want).abs();
        assert!(rel(ln_gamma(100.0), 359.134_205_369_575_4) < 1e-10);
        assert!(rel(ln_gamma(200.0), 857.933_669_825_857_5) < 1e-10);
    }

    #[test]
    fn test_ln_gamma_recurrence() {
        // Γ(x+1) = x·Γ(x)
        for &x in &[0.7, 1.3, 4.5, 25.0, 60.25] {
            let diff = ln_gamma(x + 1.0) - ln_gamma(x) - f64::ln(x);
            assert!(diff.abs() < 1e-9, "recurrence broken at x={x}: {diff}");
        }
    }

    #[test]
    fn test_ln_gamma_outside_domain() {
        assert_eq!(ln_gamma(0.0), f64::INFINITY);
        assert!(ln_gamma(f64::NAN).is_nan());
    }

    // --- ln_beta ---

    #[test]
    fn test_ln_beta_known() {
        assert!(ln_beta(1.0, 1.0).abs() < 1e-9);
        // B(1,2) = 1/2
        assert!((ln_beta(1.0, 2.0) + 2.0_f64.ln()).abs() < 1e-9);
        // B(½,½) = π
        assert!((ln_beta(0.5, 0.5) - PI.ln()).abs() < 1e-9);
        assert!((ln_beta(3.0, 5.0) - ln_beta(5.0, 3.0)).abs() < 1e-12);
    }

    // --- regularized_incomplete_beta ---

    #[test]
    fn test_inc_beta_boundary() {
        for &(a, b) in &[(0.5, 0.5), (2.0, 3.0), (60.0, 0.5), (0.1, 7.0)] {
            assert_eq!(ibeta(0.0, a, b), 0.0);
            assert_eq!(ibeta(1.0, a, b), 1.0);
        }
    }

    #[test]
    fn test_inc_beta_uniform() {
        // I_x(1,1) = x
        for &x in &[0.1, 0.3, 0.5, 0.7, 0.9] {
            let result = ibeta(x, 1.0, 1.0);
            assert!((result - x).abs() < 1e-6, "I_{x}(1,1) = {result}");
        }
    }

    #[test]
    fn test_inc_beta_arcsine() {
        // Beta(½,½): I_x = (2/π)·asin(√x)
        for &x in &[0.01_f64, 0.0245, 0.1, 0.4, 0.6, 0.9, 0.99] {
            let expected = 2.0 / PI * x.sqrt().asin();
            let result = ibeta(x, 0.5, 0.5);
            assert!(
                (result - expected).abs() < 1e-6,
                "I_{x}(½,½) = {result}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_inc_beta_polynomial_cases() {
        for &x in &[0.1_f64, 0.5, 0.9] {
            // I_x(1,b) = 1 − (1−x)^b
            let expected = 1.0 - (1.0 - x).powi(3);
            assert!((ibeta(x, 1.0, 3.0) - expected).abs() < 1e-6);
            // I_x(2,2) = 3x² − 2x³
            let expected = 3.0 * x * x - 2.0 * x * x * x;
            assert!((ibeta(x, 2.0, 2.0) - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_inc_beta_symmetric_midpoint() {
        // I_0.5(a,a) = 0.5
        for &a in &[0.5, 3.0, 15.0] {
            let result = ibeta(0.5, a, a);
            assert!((result - 0.5).abs() < 1e-6, "I_0.5({a},{a}) = {result}");
        }
    }

    #[test]
    fn test_inc_beta_student_t_tail() {
        // I_x(ν/2, ½) at x = ν/(ν+t²) is the two-sided tail of Student's t.
        // t = 1.812461 with ν = 10 leaves 10% in both tails.
        let nu = 10.0;
        let t: f64 = 1.812_461_122_8;
        let tail = ibeta(nu / (nu + t * t), nu / 2.0, 0.5);
        assert!((tail - 0.1).abs() < 1e-6, "tail = {tail}");
    }

    #[test]
    fn test_inc_beta_domain_errors() {
        assert_eq!(
            regularized_incomplete_beta(-0.1, 2.0, 3.0),
            Err(DomainError::ArgumentOutOfUnitInterval { value: -0.1 })
        );
        assert_eq!(
            regularized_incomplete_beta(1.1, 2.0, 3.0),
            Err(DomainError::ArgumentOutOfUnitInterval { value: 1.1 })
        );
        assert!(regularized_incomplete_beta(f64::NAN, 2.0, 3.0).is_err());
        assert_eq!(
            regularized_incomplete_beta(0.5, 0.0, 3.0),
            Err(DomainError::NonPositiveShape { name: "a", value: 0.0 })
        );
        assert_eq!(
            regularized_incomplete_beta(0.5, 2.0, -1.0),
            Err(DomainError::NonPositiveShape { name: "b", value: -1.0 })
        );
    }

    #[test]
    fn test_inc_beta_monotonic_grid() {
        let xs: Vec<f64> = (0..=100).map(|i| i as f64 / 100.0).collect();
        for &(a, b) in &[(0.5, 0.5), (5.0, 0.5), (2.0, 8.0)] {
            for w in xs.windows(2) {
                let (lo, hi) = (ibeta(w[0], a, b), ibeta(w[1], a, b));
                assert!(hi >= lo - 1e-7, "I not monotonic for ({a},{b}) at {w:?}");
            }
        }
    }

    #[test]
    fn test_floor_tiny() {
        assert_eq!(floor_tiny(0.0), CF_TINY);
        assert_eq!(floor_tiny(-1e-31), CF_TINY);
        assert_eq!(floor_tiny(-2.0), -2.0);
        assert_eq!(floor_tiny(0.25), 0.25);
    }
}
