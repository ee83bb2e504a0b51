//! Derivative-free minimization for parameter estimation.
//!
//! Nelder-Mead simplex search with optional box bounds. All model fitting
//! in this crate (conditional sum of squares, smoothing SSE) goes through
//! [`minimize`].

/// Tuning knobs for the simplex search.
#[derive(Debug, Clone)]
pub struct SimplexOptions {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Convergence tolerance on the objective spread across the simplex.
    pub tolerance: f64,
    /// Reflection coefficient.
    pub reflection: f64,
    /// Expansion coefficient.
    pub expansion: f64,
    /// Contraction coefficient.
    pub contraction: f64,
    /// Shrink coefficient.
    pub shrink: f64,
    /// Relative step used to build the initial simplex.
    pub initial_step: f64,
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-8,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Outcome of a [`minimize`] call.
#[derive(Debug, Clone)]
pub struct Minimum {
    /// Best point found.
    pub point: Vec<f64>,
    /// Objective value at that point.
    pub value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether the simplex collapsed below tolerance.
    pub converged: bool,
}

/// A simplex vertex: a point and its objective value.
#[derive(Debug, Clone)]
struct Vertex {
    x: Vec<f64>,
    f: f64,
}

/// Minimize `objective` starting from `start`, optionally clamped to
/// per-dimension `bounds`.
///
/// # Example
/// ```
/// use gridcast::utils::{minimize, SimplexOptions};
///
/// let result = minimize(
///     |x| (x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     SimplexOptions::default(),
/// );
/// assert!(result.converged);
/// assert!((result.point[0] - 2.0).abs() < 0.01);
/// assert!((result.point[1] + 1.0).abs() < 0.01);
/// ```
pub fn minimize<F>(
    objective: F,
    start: &[f64],
    bounds: Option<&[(f64, f64)]>,
    options: SimplexOptions,
) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let dim = start.len();
    if dim == 0 {
        return Minimum {
            point: vec![],
            value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let clamp = |x: Vec<f64>| -> Vec<f64> {
        match bounds {
            None => x,
            Some(b) => x
                .iter()
                .zip(b.iter())
                .map(|(&v, &(lo, hi))| v.clamp(lo, hi))
                .collect(),
        }
    };
    let eval = |x: Vec<f64>| -> Vertex {
        let f = objective(&x);
        Vertex { x, f }
    };

    // Initial simplex: start plus one perturbed vertex per dimension.
    let mut simplex: Vec<Vertex> = Vec::with_capacity(dim + 1);
    simplex.push(eval(clamp(start.to_vec())));
    for i in 0..dim {
        let mut x = start.to_vec();
        let step = if x[i].abs() > 1e-10 {
            options.initial_step * x[i].abs()
        } else {
            options.initial_step
        };
        x[i] += step;
        simplex.push(eval(clamp(x)));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iterations {
        iterations += 1;
        simplex.sort_by(|a, b| a.f.partial_cmp(&b.f).unwrap_or(std::cmp::Ordering::Equal));

        let spread = simplex[dim].f - simplex[0].f;
        if spread.abs() < options.tolerance {
            converged = true;
            break;
        }

        // Centroid of all vertices except the worst.
        let mut centroid = vec![0.0; dim];
        for vertex in &simplex[..dim] {
            for (c, &v) in centroid.iter_mut().zip(vertex.x.iter()) {
                *c += v;
            }
        }
        for c in &mut centroid {
            *c /= dim as f64;
        }

        let worst = &simplex[dim];
        let toward = |coefficient: f64, target: &[f64]| -> Vec<f64> {
            centroid
                .iter()
                .zip(target.iter())
                .map(|(&c, &t)| c + coefficient * (t - c))
                .collect()
        };

        // Reflection.
        let reflected = eval(clamp(toward(-options.reflection, &worst.x)));

        if reflected.f < simplex[0].f {
            // Expansion.
            let expanded = eval(clamp(toward(
                -options.reflection * options.expansion,
                &worst.x,
            )));
            simplex[dim] = if expanded.f < reflected.f {
                expanded
            } else {
                reflected
            };
            continue;
        }

        if reflected.f < simplex[dim - 1].f {
            simplex[dim] = reflected;
            continue;
        }

        // Contraction, outside or inside depending on where reflection landed.
        let contracted = if reflected.f < worst.f {
            eval(clamp(toward(
                -options.reflection * options.contraction,
                &worst.x,
            )))
        } else {
            eval(clamp(toward(options.contraction, &worst.x)))
        };

        if contracted.f < worst.f.min(reflected.f) {
            simplex[dim] = contracted;
            continue;
        }

        // Shrink everything toward the best vertex.
        let best = simplex[0].x.clone();
        for vertex in simplex.iter_mut().skip(1) {
            let shrunk: Vec<f64> = best
                .iter()
                .zip(vertex.x.iter())
                .map(|(&b, &v)| b + options.shrink * (v - b))
                .collect();
            *vertex = eval(clamp(shrunk));
        }
    }

    let best = simplex
        .into_iter()
        .min_by(|a, b| a.f.partial_cmp(&b.f).unwrap_or(std::cmp::Ordering::Equal));

    match best {
        Some(vertex) => Minimum {
            point: vertex.x,
            value: vertex.f,
            iterations,
            converged,
        },
        None => Minimum {
            point: start.to_vec(),
            value: f64::NAN,
            iterations,
            converged: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn minimizes_quadratic_bowl() {
        let result = minimize(
            |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
            &[0.0, 0.0],
            None,
            SimplexOptions::default(),
        );

        assert!(result.converged);
        assert_relative_eq!(result.point[0], 2.0, epsilon = 1e-3);
        assert_relative_eq!(result.point[1], 3.0, epsilon = 1e-3);
        assert!(result.value < 1e-6);
    }

    #[test]
    fn minimizes_rosenbrock() {
        let options = SimplexOptions {
            max_iterations: 5000,
            tolerance: 1e-10,
            ..Default::default()
        };

        let result = minimize(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2),
            &[-1.0, 1.0],
            None,
            options,
        );

        assert_relative_eq!(result.point[0], 1.0, epsilon = 1e-2);
        assert_relative_eq!(result.point[1], 1.0, epsilon = 1e-2);
    }

    #[test]
    fn respects_bounds() {
        // Unconstrained minimum at x = 5 sits outside [0, 3].
        let result = minimize(
            |x| (x[0] - 5.0).powi(2),
            &[1.0],
            Some(&[(0.0, 3.0)]),
            SimplexOptions::default(),
        );

        assert_relative_eq!(result.point[0], 3.0, epsilon = 1e-3);
    }

    #[test]
    fn empty_start_does_not_iterate() {
        let result = minimize(|_| 0.0, &[], None, SimplexOptions::default());
        assert!(!result.converged);
        assert!(result.value.is_nan());
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn already_optimal_start_converges() {
        let result = minimize(
            |x| (x[0] - 1.5).powi(2),
            &[1.5],
            None,
            SimplexOptions::default(),
        );
        assert!(result.converged);
        assert_relative_eq!(result.point[0], 1.5, epsilon = 1e-3);
    }

    #[test]
    fn smoothing_weight_stays_inside_unit_interval() {
        // One-parameter exponential smoothing SSE, bounded to (0, 1).
        let data = [10.0, 12.0, 11.0, 13.0, 14.0, 13.0, 15.0, 16.0];
        let sse = |params: &[f64]| {
            let alpha = params[0];
            let mut level = data[0];
            let mut total = 0.0;
            for &y in &data[1..] {
                let error = y - level;
                total += error * error;
                level += alpha * error;
            }
            total
        };

        let result = minimize(
            sse,
            &[0.5],
            Some(&[(0.0001, 0.9999)]),
            SimplexOptions::default(),
        );

        assert!(result.converged);
        assert!(result.point[0] > 0.0 && result.point[0] < 1.0);
    }
}
