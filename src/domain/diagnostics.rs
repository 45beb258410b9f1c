//! Residual Diagnostics
//!
//! Autocorrelation function and Ljung-Box test over standardized
//! residuals. A failure to reject on the raw residuals means the mean
//! model is adequate; on the squared residuals, the variance model.

use crate::domain::descriptive::chi_squared_survival;

/// Fixed lag for the residual diagnostics.
pub const LB_LAG: usize = 12;

/// Sample autocorrelations for lags 0..=max_lag.
pub fn acf(data: &[f64], max_lag: usize) -> Vec<f64> {
    let n = data.len();
    if n < 2 {
        return vec![];
    }
    let max_lag = max_lag.min(n - 1);
    let mean = data.iter().sum::<f64>() / n as f64;
    let var = data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    if var == 0.0 {
        return vec![1.0; max_lag + 1];
    }

    (0..=max_lag)
        .map(|lag| {
            if lag == 0 {
                return 1.0;
            }
            let cov: f64 = data[lag..]
                .iter()
                .zip(&data[..n - lag])
                .map(|(a, b)| (a - mean) * (b - mean))
                .sum();
            cov / (n as f64 * var)
        })
        .collect()
}

/// Ljung-Box portmanteau test up to `lag`.
#[derive(Debug, Clone, Copy)]
pub struct LjungBox {
    pub statistic: f64,
    pub p_value: f64,
    pub lag: usize,
}

/// Q = n(n+2) sum_{k=1..lag} rho_k^2 / (n-k), chi-squared with `lag`
/// degrees of freedom under the no-autocorrelation null.
pub fn ljung_box(data: &[f64], lag: usize) -> LjungBox {
    let n = data.len();
    let rho = acf(data, lag);
    if rho.len() < lag + 1 || n <= lag {
        return LjungBox {
            statistic: f64::NAN,
            p_value: 1.0,
            lag,
        };
    }

    let q: f64 = rho[1..=lag]
        .iter()
        .enumerate()
        .map(|(i, r)| r * r / (n - (i + 1)) as f64)
        .sum::<f64>()
        * n as f64
        * (n + 2) as f64;

    LjungBox {
        statistic: q,
        p_value: chi_squared_survival(q, lag as f64),
        lag,
    }
}

/// Lag-12 Ljung-Box results for a winner's standardized residuals and
/// their squares.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticsResult {
    pub resid: LjungBox,
    pub resid_sq: LjungBox,
}

impl DiagnosticsResult {
    pub fn from_residuals(std_residuals: &[f64]) -> Self {
        let squared: Vec<f64> = std_residuals.iter().map(|r| r * r).collect();
        Self {
            resid: ljung_box(std_residuals, LB_LAG),
            resid_sq: ljung_box(&squared, LB_LAG),
        }
    }
}
