//! Conditional-Variance Recursions
//!
//! One-pass variance filters for the three model families. All three
//! seed the recursion with the sample variance of the centered
//! returns and floor the variance path for numerical stability.

/// Family-specific volatility-equation coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolCoeffs {
    /// sigma2[t] = omega + alpha * eps2[t-1] + beta * sigma2[t-1]
    Garch { omega: f64, alpha: f64, beta: f64 },
    /// ln sigma2[t] = omega + alpha * (|z[t-1]| - E|z|)
    ///               + gamma * z[t-1] + beta * ln sigma2[t-1]
    Egarch { omega: f64, alpha: f64, gamma: f64, beta: f64 },
    /// sigma2[t] = omega + (alpha + gamma * 1[eps[t-1] < 0]) * eps2[t-1]
    ///            + beta * sigma2[t-1]
    Gjr { omega: f64, alpha: f64, gamma: f64, beta: f64 },
}

impl VolCoeffs {
    /// Whether the coefficients lie inside the admissible region
    /// (positivity and covariance stationarity where applicable).
    pub fn is_admissible(&self) -> bool {
        match *self {
            VolCoeffs::Garch { omega, alpha, beta } => {
                omega > 0.0 && alpha >= 0.0 && beta >= 0.0 && alpha + beta < 1.0
            }
            VolCoeffs::Egarch { omega, alpha, gamma, beta } => {
                omega.is_finite() && alpha.is_finite() && gamma.is_finite() && beta.abs() < 1.0
            }
            VolCoeffs::Gjr { omega, alpha, gamma, beta } => {
                omega > 0.0
                    && alpha >= 0.0
                    && alpha + gamma >= 0.0
                    && beta >= 0.0
                    && alpha + gamma / 2.0 + beta < 1.0
            }
        }
    }
}

const VARIANCE_FLOOR: f64 = 1e-12;
/// Cap on |ln sigma2| in the EGARCH filter to stop exp overflow.
const LOG_VARIANCE_CAP: f64 = 50.0;

/// Run the variance filter over centered returns.
///
/// `eps` are the centered returns, `init_var` seeds sigma2[0]
/// (sample variance), `e_abs_z` is E|z| under the innovation
/// distribution (EGARCH only). Returns `None` when the path turns
/// non-finite.
pub fn variance_path(coeffs: &VolCoeffs, eps: &[f64], init_var: f64, e_abs_z: f64) -> Option<Vec<f64>> {
    let n = eps.len();
    if n == 0 || !init_var.is_finite() || init_var <= 0.0 {
        return None;
    }

    let mut sigma2 = Vec::with_capacity(n);
    sigma2.push(init_var.max(VARIANCE_FLOOR));

    for t in 1..n {
        let prev_var = sigma2[t - 1];
        let prev_eps = eps[t - 1];

        let var_t = match *coeffs {
            VolCoeffs::Garch { omega, alpha, beta } => {
                omega + alpha * prev_eps * prev_eps + beta * prev_var
            }
            VolCoeffs::Egarch { omega, alpha, gamma, beta } => {
                let z = prev_eps / prev_var.sqrt();
                let log_var = omega + alpha * (z.abs() - e_abs_z) + gamma * z + beta * prev_var.ln();
                if log_var.abs() > LOG_VARIANCE_CAP {
                    return None;
                }
                log_var.exp()
            }
            VolCoeffs::Gjr { omega, alpha, gamma, beta } => {
                let asym = if prev_eps < 0.0 { gamma } else { 0.0 };
                omega + (alpha + asym) * prev_eps * prev_eps + beta * prev_var
            }
        };

        if !var_t.is_finite() {
            return None;
        }
        sigma2.push(var_t.max(VARIANCE_FLOOR));
    }

    Some(sigma2)
}
