//! Nelder-Mead Simplex Minimizer
//!
//! Derivative-free minimizer used for maximum-likelihood estimation.
//! Constraint handling is by penalty: the objective returns
//! `f64::INFINITY` outside the admissible region and the simplex
//! walks back inside.

/// Options controlling the simplex search.
#[derive(Debug, Clone, Copy)]
pub struct NelderMeadOptions {
    pub max_iters: usize,
    /// Convergence threshold on the simplex function-value spread.
    pub tolerance: f64,
    /// Relative perturbation used to build the initial simplex.
    pub initial_step: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iters: 2000,
            tolerance: 1e-9,
            initial_step: 0.10,
        }
    }
}

/// Outcome of one minimization run.
#[derive(Debug, Clone)]
pub struct OptimisationResult {
    pub x: Vec<f64>,
    pub fx: f64,
    pub iterations: usize,
    pub converged: bool,
}

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Minimize `f` starting from `x0`. The starting point must have a
/// finite objective value; the initial simplex is built around it
/// with relative perturbations.
pub fn nelder_mead<F>(f: F, x0: &[f64], opts: &NelderMeadOptions) -> OptimisationResult
where
    F: Fn(&[f64]) -> f64,
{
    let dim = x0.len();
    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(dim + 1);
    simplex.push((x0.to_vec(), f(x0)));

    for i in 0..dim {
        let mut vertex = x0.to_vec();
        let step = if vertex[i].abs() > 1e-12 {
            vertex[i].abs() * opts.initial_step
        } else {
            opts.initial_step * 1e-3
        };
        vertex[i] += step;
        let mut fx = f(&vertex);
        if !fx.is_finite() {
            // Try the other direction before giving up on this axis.
            vertex[i] = x0[i] - step;
            fx = f(&vertex);
        }
        simplex.push((vertex, fx));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < opts.max_iters {
        iterations += 1;
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

        let best = simplex[0].1;
        let worst = simplex[dim].1;
        if worst.is_finite() && (worst - best).abs() < opts.tolerance {
            converged = true;
            break;
        }

        // Centroid of all vertices except the worst.
        let mut centroid = vec![0.0; dim];
        for (vertex, _) in simplex.iter().take(dim) {
            for (c, v) in centroid.iter_mut().zip(vertex) {
                *c += v / dim as f64;
            }
        }

        let reflected = blend(&centroid, &simplex[dim].0, 1.0 + REFLECT, -REFLECT);
        let f_reflected = f(&reflected);

        if f_reflected < simplex[0].1 {
            let expanded = blend(&centroid, &simplex[dim].0, 1.0 + EXPAND, -EXPAND);
            let f_expanded = f(&expanded);
            simplex[dim] = if f_expanded < f_reflected {
                (expanded, f_expanded)
            } else {
                (reflected, f_reflected)
            };
        } else if f_reflected < simplex[dim - 1].1 {
            simplex[dim] = (reflected, f_reflected);
        } else {
            let contracted = blend(&centroid, &simplex[dim].0, 1.0 - CONTRACT, CONTRACT);
            let f_contracted = f(&contracted);
            if f_contracted < simplex[dim].1 {
                simplex[dim] = (contracted, f_contracted);
            } else {
                // Shrink toward the best vertex.
                let best_vertex = simplex[0].0.clone();
                for entry in simplex.iter_mut().skip(1) {
                    for (v, b) in entry.0.iter_mut().zip(&best_vertex) {
                        *v = b + SHRINK * (*v - b);
                    }
                    entry.1 = f(&entry.0);
                }
            }
        }
    }

    simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
    let (x, fx) = simplex.swap_remove(0);
    OptimisationResult { x, fx, iterations, converged }
}

fn blend(centroid: &[f64], vertex: &[f64], wc: f64, wv: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(vertex)
        .map(|(c, v)| wc * c + wv * v)
        .collect()
}
