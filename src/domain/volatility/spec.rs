//! Model Specifications
//!
//! Immutable descriptors for the closed set of conditional-volatility
//! model variants fitted by the pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Innovation distribution applied uniformly to every spec in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    Normal,
    #[serde(rename = "t")]
    StudentT,
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distribution::Normal => write!(f, "normal"),
            Distribution::StudentT => write!(f, "t"),
        }
    }
}

/// Volatility-equation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolFamily {
    /// Symmetric GARCH: variance reacts to squared shocks only.
    Garch,
    /// Exponential GARCH: log-variance reacts to sign and magnitude
    /// of the lagged standardized shock.
    Egarch,
    /// Threshold GARCH: an indicator-weighted term lets negative
    /// shocks inflate variance more than positive ones.
    GjrGarch,
}

/// One volatility model variant: family, orders, and innovation
/// distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    pub family: VolFamily,
    /// ARCH order.
    pub p: usize,
    /// Asymmetry order.
    pub o: usize,
    /// GARCH order.
    pub q: usize,
    pub dist: Distribution,
}

impl ModelSpec {
    pub fn garch11(dist: Distribution) -> Self {
        Self { family: VolFamily::Garch, p: 1, o: 0, q: 1, dist }
    }

    pub fn egarch11(dist: Distribution) -> Self {
        Self { family: VolFamily::Egarch, p: 1, o: 0, q: 1, dist }
    }

    pub fn gjr_garch11(dist: Distribution) -> Self {
        Self { family: VolFamily::GjrGarch, p: 1, o: 1, q: 1, dist }
    }

    /// The closed model set fitted per asset, in fit order.
    pub fn standard_set(dist: Distribution) -> [ModelSpec; 3] {
        [
            Self::garch11(dist),
            Self::egarch11(dist),
            Self::gjr_garch11(dist),
        ]
    }

    /// Number of free parameters under maximum likelihood, including
    /// the constant mean and, for Student-t, the degrees of freedom.
    pub fn param_count(&self) -> usize {
        let vol_params = match self.family {
            VolFamily::Garch => 3,    // omega, alpha, beta
            VolFamily::Egarch => 4,   // omega, alpha, gamma, beta
            VolFamily::GjrGarch => 4, // omega, alpha, gamma, beta
        };
        let dist_params = match self.dist {
            Distribution::Normal => 0,
            Distribution::StudentT => 1, // nu
        };
        1 + vol_params + dist_params
    }

    pub fn name(&self) -> String {
        match self.family {
            VolFamily::Garch => format!("GARCH({},{})", self.p, self.q),
            VolFamily::Egarch => format!("EGARCH({},{})", self.p, self.q),
            VolFamily::GjrGarch => format!("GJR-GARCH({},{})", self.p, self.q),
        }
    }

    /// Name stripped to filesystem-safe characters, used for summary
    /// file names.
    pub fn safe_name(&self) -> String {
        self.name()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect()
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_set_is_three_distinct_specs() {
        let set = ModelSpec::standard_set(Distribution::Normal);
        assert_eq!(set.len(), 3);
        assert_eq!(set[0].name(), "GARCH(1,1)");
        assert_eq!(set[1].name(), "EGARCH(1,1)");
        assert_eq!(set[2].name(), "GJR-GARCH(1,1)");
    }

    #[test]
    fn param_counts() {
        assert_eq!(ModelSpec::garch11(Distribution::Normal).param_count(), 4);
        assert_eq!(ModelSpec::egarch11(Distribution::Normal).param_count(), 5);
        assert_eq!(ModelSpec::gjr_garch11(Distribution::Normal).param_count(), 5);
        assert_eq!(ModelSpec::garch11(Distribution::StudentT).param_count(), 5);
    }

    #[test]
    fn safe_name_drops_punctuation() {
        assert_eq!(
            ModelSpec::gjr_garch11(Distribution::Normal).safe_name(),
            "GJRGARCH11"
        );
    }
}
