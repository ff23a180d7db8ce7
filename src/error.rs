//! Error type for arguments outside a function's mathematical domain.
//!
//! Only caller mistakes are reported here. Numerical degeneracy inside the
//! continued fraction and non-convergence of the Newton refinement are
//! absorbed by the algorithms themselves; see [`crate::inverse::BetaInverse`].

use thiserror::Error;

/// An argument lies outside the domain of the function it was passed to.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DomainError {
    /// The evaluation point of `I_x(a, b)` is not in `[0, 1]`.
    #[error("argument x must lie in [0, 1], got {value}")]
    ArgumentOutOfUnitInterval { value: f64 },

    /// A probability or confidence level is NaN or not in `[0, 1]`.
    #[error("probability must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { value: f64 },

    /// A beta shape parameter is not a finite positive number.
    #[error("shape parameter {name} must be finite and > 0, got {value}")]
    NonPositiveShape { name: &'static str, value: f64 },

    /// Degrees of freedom are not a finite positive number.
    #[error("degrees of freedom must be finite and > 0, got {value}")]
    NonPositiveDegreesOfFreedom { value: f64 },
}

/// Checks that `value` is usable as a beta shape parameter.
pub(crate) fn check_shape(name: &'static str, value: f64) -> Result<(), DomainError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DomainError::NonPositiveShape { name, value })
    }
}
