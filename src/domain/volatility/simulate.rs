//! Synthetic GARCH Path Generation
//!
//! Seeded GARCH(1,1) return simulator used for estimator validation
//! and the `simulate` CLI subcommand.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Parameters of the simulated GARCH(1,1) process.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedGarch {
    pub mu: f64,
    pub omega: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl SimulatedGarch {
    /// Volatility-clustered process with crypto-like daily scale:
    /// unconditional variance 4e-4 (2% daily vol).
    pub fn crypto_like() -> Self {
        Self {
            mu: 0.0005,
            omega: 2e-5,
            alpha: 0.10,
            beta: 0.85,
        }
    }

    pub fn unconditional_variance(&self) -> f64 {
        self.omega / (1.0 - self.alpha - self.beta)
    }
}

/// Generate `n` returns from a GARCH(1,1) process with Gaussian
/// innovations. The recursion starts at the unconditional variance.
pub fn simulate_garch(params: &SimulatedGarch, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut returns = Vec::with_capacity(n);
    let mut sigma2 = params.unconditional_variance();
    let mut prev_eps = 0.0f64;

    for _ in 0..n {
        sigma2 = params.omega + params.alpha * prev_eps * prev_eps + params.beta * sigma2;
        let z = standard_normal(&mut rng);
        let eps = sigma2.sqrt() * z;
        returns.push(params.mu + eps);
        prev_eps = eps;
    }

    returns
}

/// Box-Muller draw from N(0,1).
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
