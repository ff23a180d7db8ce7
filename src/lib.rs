//! # tdelta
//!
//! Student's t quantile engine for carbon-stock uncertainty bounds.
//!
//! The uncertainty-discount stage of carbon-credit accounting widens the
//! estimated stock by `t_delta · standard error`, where `t_delta` is the
//! 95% one-sided Student's t quantile. This crate computes that quantile by
//! inverting the regularized incomplete beta function. It knows nothing
//! about biomass, emissions, or token accounting.
//!
//! ## Modules
//!
//! - [`special`] — ln Γ and the regularized incomplete beta function
//! - [`inverse`] — inverse of the incomplete beta, with convergence diagnostics
//! - [`student_t`] — t quantile, CDF, and the `t_delta` entry point
//! - [`error`] — [`DomainError`] for arguments outside a function's domain
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: no shared state; every call is independent and
//!   safe to run in parallel.
//! - **Loud domain errors, quiet numerics**: invalid arguments are
//!   rejected with [`DomainError`]; non-convergence is best-effort and
//!   observable through [`inverse::BetaInverse`].
//! - **Property-based testing**: mathematical invariants verified via proptest
//!
//! ```
//! let dof = tdelta::degrees_of_freedom(24, 3).unwrap();
//! let t = tdelta::t_delta(dof).unwrap();
//! assert!((t - 1.7207).abs() < 1e-3);
//! ```

pub mod error;
pub mod inverse;
pub mod special;
pub mod student_t;

pub use error::DomainError;
pub use inverse::{BetaInverse, InverseOptions};
pub use student_t::{degrees_of_freedom, student_t_quantile, t_delta, UNCERTAINTY_CONFIDENCE};
