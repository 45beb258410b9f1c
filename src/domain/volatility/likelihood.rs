//! Innovation Log-Likelihoods
//!
//! Gaussian and standardized Student-t log-likelihood of centered
//! returns given a conditional-variance path.

use statrs::function::gamma::ln_gamma;

use crate::domain::volatility::spec::Distribution;

/// Minimum degrees of freedom for a finite-variance Student-t.
pub const MIN_NU: f64 = 2.05;

/// Gaussian log-likelihood: -1/2 sum(ln 2pi + ln sigma2 + eps2/sigma2).
pub fn normal_loglik(eps: &[f64], sigma2: &[f64]) -> f64 {
    let ln_2pi = (2.0 * std::f64::consts::PI).ln();
    eps.iter()
        .zip(sigma2)
        .map(|(&e, &s2)| -0.5 * (ln_2pi + s2.ln() + e * e / s2))
        .sum()
}

/// Standardized Student-t log-likelihood with `nu` degrees of
/// freedom; the density is scaled so the innovation has unit
/// variance for any nu > 2.
pub fn student_t_loglik(eps: &[f64], sigma2: &[f64], nu: f64) -> f64 {
    if nu <= 2.0 {
        return f64::NEG_INFINITY;
    }
    let const_term = ln_gamma((nu + 1.0) / 2.0)
        - ln_gamma(nu / 2.0)
        - 0.5 * (std::f64::consts::PI * (nu - 2.0)).ln();

    eps.iter()
        .zip(sigma2)
        .map(|(&e, &s2)| {
            const_term - 0.5 * s2.ln() - (nu + 1.0) / 2.0 * (1.0 + e * e / (s2 * (nu - 2.0))).ln()
        })
        .sum()
}

/// Log-likelihood under the chosen innovation distribution.
/// `nu` is ignored for normal innovations.
pub fn loglik(dist: Distribution, eps: &[f64], sigma2: &[f64], nu: f64) -> f64 {
    match dist {
        Distribution::Normal => normal_loglik(eps, sigma2),
        Distribution::StudentT => student_t_loglik(eps, sigma2, nu),
    }
}

/// E|z| for a unit-variance innovation, used to center the EGARCH
/// magnitude term.
pub fn expected_abs_z(dist: Distribution, nu: f64) -> f64 {
    match dist {
        Distribution::Normal => (2.0 / std::f64::consts::PI).sqrt(),
        Distribution::StudentT => {
            // 2 sqrt(nu-2) Gamma((nu+1)/2) / (sqrt(pi) (nu-1) Gamma(nu/2))
            let ln_ratio = ln_gamma((nu + 1.0) / 2.0) - ln_gamma(nu / 2.0);
            2.0 * (nu - 2.0).sqrt() * ln_ratio.exp()
                / (std::f64::consts::PI.sqrt() * (nu - 1.0))
        }
    }
}
