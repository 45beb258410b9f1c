//! Domain Layer - Core statistics and model logic
//!
//! Pure computation with no external dependencies; all network and
//! filesystem interaction happens through the ports layer.

pub mod descriptive;
pub mod diagnostics;
pub mod returns;
pub mod selection;
pub mod volatility;

pub use descriptive::DescriptiveStats;
pub use diagnostics::{acf, ljung_box, DiagnosticsResult, LjungBox};
pub use returns::{ReturnSeries, SeriesError};
pub use selection::{rank_models, select_best, ComparisonRow};
pub use volatility::{fit_all, fit_one, Distribution, FitError, FittedModel, ModelSpec, VolFamily};
