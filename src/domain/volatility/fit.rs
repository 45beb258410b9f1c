//! Maximum-Likelihood Model Fitting
//!
//! Fits each spec in the standard set to one return series by
//! Nelder-Mead over a penalized negative log-likelihood. Fits are
//! independent: one model's failure never aborts the others.

use thiserror::Error;

use crate::domain::returns::ReturnSeries;
use crate::domain::volatility::likelihood::{expected_abs_z, loglik, MIN_NU};
use crate::domain::volatility::optimizer::{nelder_mead, NelderMeadOptions};
use crate::domain::volatility::recursion::{variance_path, VolCoeffs};
use crate::domain::volatility::spec::{Distribution, ModelSpec, VolFamily};

/// Minimum observations before a fit is attempted.
const MIN_OBS: usize = 50;

#[derive(Debug, Error)]
pub enum FitError {
    #[error("series too short: {n} observations, need at least {MIN_OBS}")]
    TooFewObservations { n: usize },

    #[error("optimizer failed to converge after {iterations} iterations")]
    NonConvergence { iterations: usize },

    #[error("degenerate likelihood: {detail}")]
    Degenerate { detail: String },
}

/// The result of fitting one spec to one series. Immutable once
/// created; one per spec per asset.
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub spec: ModelSpec,
    /// Named parameter estimates in canonical order.
    pub params: Vec<(&'static str, f64)>,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    /// Conditional volatility, one value per input observation.
    pub conditional_vol: Vec<f64>,
    /// Standardized residuals, one value per input observation.
    pub std_residuals: Vec<f64>,
    pub n_obs: usize,
}

impl FittedModel {
    pub fn name(&self) -> String {
        self.spec.name()
    }

    pub fn persistence(&self) -> Option<f64> {
        let get = |key: &str| self.params.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);
        match self.spec.family {
            VolFamily::Garch => Some(get("alpha")? + get("beta")?),
            VolFamily::GjrGarch => Some(get("alpha")? + get("gamma")? / 2.0 + get("beta")?),
            VolFamily::Egarch => get("beta"),
        }
    }

    /// Free-text parameter report persisted per fitted model.
    pub fn summary(&self) -> String {
        let mut s = format!("{} ({}) Model Summary\n", self.spec.name(), self.spec.dist);
        s.push_str(&"=".repeat(40));
        s.push('\n');
        for (name, value) in &self.params {
            s.push_str(&format!("{name}: {value:.6e}\n"));
        }
        if let Some(p) = self.persistence() {
            s.push_str(&format!("\nPersistence: {p:.4}\n"));
        }
        s.push_str(&format!("Observations: {}\n", self.n_obs));
        s.push_str(&format!("\nLog-likelihood: {:.2}\n", self.log_likelihood));
        s.push_str(&format!("AIC: {:.2}\n", self.aic));
        s.push_str(&format!("BIC: {:.2}\n", self.bic));
        s
    }
}

/// Unpacked parameter vector: mean, volatility coefficients, and the
/// Student-t degrees of freedom when applicable.
struct Unpacked {
    mu: f64,
    coeffs: VolCoeffs,
    nu: f64,
}

fn unpack(spec: &ModelSpec, theta: &[f64]) -> Option<Unpacked> {
    let mu = theta[0];
    let coeffs = match spec.family {
        VolFamily::Garch => VolCoeffs::Garch {
            omega: theta[1],
            alpha: theta[2],
            beta: theta[3],
        },
        VolFamily::Egarch => VolCoeffs::Egarch {
            omega: theta[1],
            alpha: theta[2],
            gamma: theta[3],
            beta: theta[4],
        },
        VolFamily::GjrGarch => VolCoeffs::Gjr {
            omega: theta[1],
            alpha: theta[2],
            gamma: theta[3],
            beta: theta[4],
        },
    };
    let nu = match spec.dist {
        Distribution::Normal => f64::NAN,
        Distribution::StudentT => {
            let nu = *theta.last()?;
            if nu < MIN_NU || nu > 500.0 {
                return None;
            }
            nu
        }
    };
    if !mu.is_finite() || !coeffs.is_admissible() {
        return None;
    }
    Some(Unpacked { mu, coeffs, nu })
}

fn initial_theta(spec: &ModelSpec, values: &[f64]) -> Vec<f64> {
    let n = values.len() as f64;
    let mu0 = values.iter().sum::<f64>() / n;
    let var0 = values.iter().map(|v| (v - mu0).powi(2)).sum::<f64>() / n;
    let var0 = var0.max(1e-10);

    let mut theta = match spec.family {
        VolFamily::Garch => vec![mu0, var0 * 0.05, 0.10, 0.85],
        VolFamily::Egarch => vec![mu0, 0.05 * var0.ln(), 0.15, -0.05, 0.95],
        VolFamily::GjrGarch => vec![mu0, var0 * 0.05, 0.05, 0.10, 0.85],
    };
    if spec.dist == Distribution::StudentT {
        theta.push(8.0);
    }
    theta
}

/// Penalized negative log-likelihood for one parameter vector.
fn objective(spec: &ModelSpec, values: &[f64], theta: &[f64]) -> f64 {
    let Some(p) = unpack(spec, theta) else {
        return f64::INFINITY;
    };

    let eps: Vec<f64> = values.iter().map(|v| v - p.mu).collect();
    let init_var = eps.iter().map(|e| e * e).sum::<f64>() / eps.len() as f64;
    let e_abs_z = expected_abs_z(spec.dist, p.nu);

    let Some(sigma2) = variance_path(&p.coeffs, &eps, init_var, e_abs_z) else {
        return f64::INFINITY;
    };

    let ll = loglik(spec.dist, &eps, &sigma2, p.nu);
    if ll.is_finite() {
        -ll
    } else {
        f64::INFINITY
    }
}

/// Fit one spec to the raw return values by maximum likelihood.
pub fn fit_one(values: &[f64], spec: ModelSpec) -> Result<FittedModel, FitError> {
    if values.len() < MIN_OBS {
        return Err(FitError::TooFewObservations { n: values.len() });
    }

    let theta0 = initial_theta(&spec, values);
    let opts = NelderMeadOptions {
        max_iters: 4000,
        tolerance: 1e-8,
        initial_step: 0.10,
    };
    let result = nelder_mead(|theta| objective(&spec, values, theta), &theta0, &opts);

    if !result.converged {
        return Err(FitError::NonConvergence {
            iterations: result.iterations,
        });
    }
    if !result.fx.is_finite() {
        return Err(FitError::Degenerate {
            detail: "non-finite likelihood at optimum".to_string(),
        });
    }

    let p = unpack(&spec, &result.x).ok_or_else(|| FitError::Degenerate {
        detail: "optimum outside admissible parameter region".to_string(),
    })?;

    let eps: Vec<f64> = values.iter().map(|v| v - p.mu).collect();
    let init_var = eps.iter().map(|e| e * e).sum::<f64>() / eps.len() as f64;
    let e_abs_z = expected_abs_z(spec.dist, p.nu);
    let sigma2 = variance_path(&p.coeffs, &eps, init_var, e_abs_z).ok_or_else(|| {
        FitError::Degenerate {
            detail: "variance path collapsed at optimum".to_string(),
        }
    })?;

    let log_likelihood = -result.fx;
    let k = spec.param_count() as f64;
    let n = values.len() as f64;
    let aic = 2.0 * k - 2.0 * log_likelihood;
    let bic = k * n.ln() - 2.0 * log_likelihood;

    let conditional_vol: Vec<f64> = sigma2.iter().map(|s2| s2.sqrt()).collect();
    let std_residuals: Vec<f64> = eps
        .iter()
        .zip(&conditional_vol)
        .map(|(e, s)| e / s)
        .collect();

    let mut params: Vec<(&'static str, f64)> = vec![("mu", p.mu)];
    match p.coeffs {
        VolCoeffs::Garch { omega, alpha, beta } => {
            params.extend([("omega", omega), ("alpha", alpha), ("beta", beta)]);
        }
        VolCoeffs::Egarch { omega, alpha, gamma, beta }
        | VolCoeffs::Gjr { omega, alpha, gamma, beta } => {
            params.extend([
                ("omega", omega),
                ("alpha", alpha),
                ("gamma", gamma),
                ("beta", beta),
            ]);
        }
    }
    if spec.dist == Distribution::StudentT {
        params.push(("nu", p.nu));
    }

    Ok(FittedModel {
        spec,
        params,
        log_likelihood,
        aic,
        bic,
        conditional_vol,
        std_residuals,
        n_obs: values.len(),
    })
}

/// Fit the full standard set against one series. Each entry carries
/// its own result so one failure never hides the others.
pub fn fit_all(
    series: &ReturnSeries,
    dist: Distribution,
) -> Vec<(ModelSpec, Result<FittedModel, FitError>)> {
    let values = series.values();
    ModelSpec::standard_set(dist)
        .into_iter()
        .map(|spec| {
            let outcome = fit_one(&values, spec);
            (spec, outcome)
        })
        .collect()
}
