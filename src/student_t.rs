//! Student's t-distribution quantile for carbon-stock uncertainty bounds.
//!
//! The uncertainty stage of the accounting pipeline scales the standard
//! error of the estimated carbon stock by `t_delta`, the 95% one-sided
//! quantile of Student's t with `plots − zones` degrees of freedom. That
//! quantile bounds a 90% two-sided confidence interval.
//!
//! # Algorithm
//!
//! With `X = ν / (ν + T²)` for `T ~ t(ν)`, the two-sided tail mass beyond
//! `|T| > y` equals `I_x(ν/2, ½)` at `x = ν/(ν + y²)`. Inverting the
//! incomplete beta function at `2·min(p, 1−p)` and solving for `y` gives
//! the quantile magnitude; the sign follows `p > ½`.

use crate::error::DomainError;
use crate::inverse::{inverse_regularized_incomplete_beta, BetaInverse};
use crate::special::incomplete_beta_unchecked;

/// Confidence level at which the uncertainty stage evaluates the quantile.
///
/// One-sided 95%, i.e. the upper bound of a two-sided 90% interval.
pub const UNCERTAINTY_CONFIDENCE: f64 = 0.95;

/// Quantile function (inverse CDF) of Student's t-distribution.
///
/// Given degrees of freedom `ν > 0` and a probability `p ∈ [0, 1]`,
/// returns `y` such that `P(T ≤ y) = p`.
///
/// # Edge behaviour
/// `p = 0` and `p = 1` are mathematical singularities and give `−∞`
/// and `+∞`. Non-convergence of the underlying iteration is not reported
/// here; use [`student_t_quantile_with_diagnostics`] to observe it.
///
/// # Errors
/// [`DomainError`] if `ν` is not finite and positive, or if `p` is NaN
/// or outside `[0, 1]`.
///
/// # Examples
/// ```
/// use tdelta::student_t::student_t_quantile;
/// // Median = 0
/// assert_eq!(student_t_quantile(10.0, 0.5).unwrap(), 0.0);
/// // 95% quantile with 10 degrees of freedom
/// assert!((student_t_quantile(10.0, 0.95).unwrap() - 1.812).abs() < 1e-3);
/// ```
pub fn student_t_quantile(degrees_of_freedom: f64, p: f64) -> Result<f64, DomainError> {
    student_t_quantile_with_diagnostics(degrees_of_freedom, p).map(|(t, _)| t)
}

/// [`student_t_quantile`] that also returns the diagnostics of the
/// incomplete beta inversion it ran.
///
/// # Examples
/// ```
/// use tdelta::student_t::student_t_quantile_with_diagnostics;
/// let (t, inv) = student_t_quantile_with_diagnostics(30.0, 0.95).unwrap();
/// assert!((t - 1.697).abs() < 1e-3);
/// assert!(inv.converged);
/// ```
pub fn student_t_quantile_with_diagnostics(
    degrees_of_freedom: f64,
    p: f64,
) -> Result<(f64, BetaInverse), DomainError> {
    check_degrees_of_freedom(degrees_of_freedom)?;
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return Err(DomainError::ProbabilityOutOfRange { value: p });
    }

    let q = p.min(1.0 - p);
    let inv = inverse_regularized_incomplete_beta(2.0 * q, degrees_of_freedom / 2.0, 0.5)?;
    let g = inv.value;
    let magnitude = (degrees_of_freedom * (1.0 - g) / g).sqrt();
    let t = if p > 0.5 { magnitude } else { -magnitude };

    tracing::trace!(
        degrees_of_freedom,
        p,
        t,
        iterations = inv.iterations,
        converged = inv.converged,
        "student t quantile"
    );
    Ok((t, inv))
}

/// The `t_delta` factor of the uncertainty formula:
/// `student_t_quantile(ν, 0.95)`.
///
/// # Examples
/// ```
/// use tdelta::student_t::t_delta;
/// assert!((t_delta(1.0).unwrap() - 6.314).abs() < 1e-3);
/// assert!(t_delta(0.0).is_err());
/// ```
pub fn t_delta(degrees_of_freedom: f64) -> Result<f64, DomainError> {
    student_t_quantile(degrees_of_freedom, UNCERTAINTY_CONFIDENCE)
}

/// Degrees of freedom for a stratified plot sample: `plots − zones`.
///
/// # Errors
/// [`DomainError::NonPositiveDegreesOfFreedom`] when there are no more
/// plots than monitoring zones.
///
/// # Examples
/// ```
/// use tdelta::student_t::degrees_of_freedom;
/// assert_eq!(degrees_of_freedom(12, 2).unwrap(), 10.0);
/// assert!(degrees_of_freedom(3, 3).is_err());
/// ```
pub fn degrees_of_freedom(total_plots: u64, total_zones: u64) -> Result<f64, DomainError> {
    let dof = total_plots as f64 - total_zones as f64;
    check_degrees_of_freedom(dof)?;
    Ok(dof)
}

/// CDF of Student's t-distribution: P(T ≤ t | ν).
///
/// # Algorithm
/// Uses the incomplete beta function:
/// - For t ≥ 0: `F(t) = 1 − I_x(ν/2, 1/2) / 2`
/// - For t < 0: `F(t) = I_x(ν/2, 1/2) / 2`
///
/// where `x = ν / (ν + t²)`.
///
/// # Errors
/// [`DomainError`] if `ν` is not finite and positive.
///
/// # Examples
/// ```
/// use tdelta::student_t::student_t_cdf;
/// // CDF at 0 = 0.5 (symmetric)
/// assert_eq!(student_t_cdf(0.0, 10.0).unwrap(), 0.5);
/// assert!((student_t_cdf(1.812461, 10.0).unwrap() - 0.95).abs() < 1e-6);
/// ```
pub fn student_t_cdf(t: f64, degrees_of_freedom: f64) -> Result<f64, DomainError> {
    check_degrees_of_freedom(degrees_of_freedom)?;
    if t.is_nan() {
        return Ok(f64::NAN);
    }
    if t == 0.0 {
        return Ok(0.5);
    }
    let x = degrees_of_freedom / (degrees_of_freedom + t * t);
    let ib = incomplete_beta_unchecked(x, degrees_of_freedom / 2.0, 0.5);
    Ok(if t > 0.0 { 1.0 - ib / 2.0 } else { ib / 2.0 })
}

fn check_degrees_of_freedom(value: f64) -> Result<(), DomainError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DomainError::NonPositiveDegreesOfFreedom { value })
    }
}
