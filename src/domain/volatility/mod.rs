//! Conditional-Volatility Models
//!
//! Model specifications, variance recursions, innovation likelihoods,
//! the simplex optimizer, and the maximum-likelihood fitting entry
//! points for the GARCH / EGARCH / GJR-GARCH family.

pub mod fit;
pub mod likelihood;
pub mod optimizer;
pub mod recursion;
pub mod simulate;
pub mod spec;

pub use fit::{fit_all, fit_one, FitError, FittedModel};
pub use spec::{Distribution, ModelSpec, VolFamily};
