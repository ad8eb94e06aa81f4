use log::trace;
use num_traits::Float;
use std::fmt::Debug;

use crate::error::{Error, Result};
use crate::math::optimization::OptimizationConfig;

/// A linear programming problem with inequality constraints.
///
/// Variables are implicitly non-negative. Right-hand sides may be negative,
/// which is how `≥` rows are expressed (`-a·x ≤ -b`).
#[derive(Debug, Clone)]
pub struct LinearProgram<T>
where
    T: Float + Debug,
{
    /// The objective function coefficients (c in c^T x)
    pub objective: Vec<T>,
    /// The constraint matrix (A in Ax ≤ b)
    pub constraints: Vec<Vec<T>>,
    /// The right-hand side vector (b in Ax ≤ b)
    pub rhs: Vec<T>,
}

/// Outcome of a simplex run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpStatus {
    Optimal,
    Infeasible,
    Unbounded,
    IterationLimit,
}

/// Result of a simplex run.
///
/// `optimal_point` is only meaningful when `status` is `Optimal`; otherwise it
/// is all zeros and `optimal_value` is the infinity matching the status.
#[derive(Debug, Clone)]
pub struct SimplexSolution<T>
where
    T: Float + Debug,
{
    pub status: LpStatus,
    pub optimal_point: Vec<T>,
    pub optimal_value: T,
    /// Number of pivots performed over both phases
    pub iterations: usize,
}

/// Minimizes a linear program using the two-phase Simplex Method.
///
/// ```
/// use drinks_mc::math::optimization::{OptimizationConfig, simplex::{minimize, LinearProgram, LpStatus}};
///
/// // minimize -2x - y subject to x + y ≤ 2, x ≤ 1
/// let lp = LinearProgram {
///     objective: vec![-2.0_f64, -1.0],
///     constraints: vec![vec![1.0, 1.0], vec![1.0, 0.0]],
///     rhs: vec![2.0, 1.0],
/// };
/// let result = minimize(&lp, &OptimizationConfig::default()).unwrap();
/// assert_eq!(result.status, LpStatus::Optimal);
/// assert!((result.optimal_value + 3.0).abs() < 1e-9);
/// ```
pub fn minimize<T>(lp: &LinearProgram<T>, config: &OptimizationConfig<T>) -> Result<SimplexSolution<T>>
where
    T: Float + Debug,
{
    let negated = LinearProgram {
        objective: lp.objective.iter().map(|&c| -c).collect(),
        constraints: lp.constraints.clone(),
        rhs: lp.rhs.clone(),
    };
    let result = maximize(&negated, config)?;
    Ok(SimplexSolution {
        optimal_value: -result.optimal_value,
        ..result
    })
}

/// Maximizes a linear program using the two-phase Simplex Method.
///
/// Phase I adds one artificial variable per row with a negative right-hand
/// side and drives their sum to zero; Phase II optimizes the real objective
/// from the resulting basis. Bland's rule is used for both entering and
/// leaving variables, so the method cannot cycle.
pub fn maximize<T>(lp: &LinearProgram<T>, config: &OptimizationConfig<T>) -> Result<SimplexSolution<T>>
where
    T: Float + Debug,
{
    validate(lp)?;

    let n = lp.objective.len();
    let eps = config.tolerance;
    let mut tableau = Tableau::new(lp);
    let artificial_start = tableau.artificial_start;
    let mut iterations = 0;

    if tableau.cols > artificial_start {
        let mut costs = vec![T::zero(); tableau.cols];
        for c in costs.iter_mut().skip(artificial_start) {
            *c = T::one();
        }
        tableau.price(&costs);
        let (status, pivots) = tableau.run(tableau.cols, config.max_iterations, eps);
        iterations += pivots;
        if status == LpStatus::IterationLimit {
            return Ok(SimplexSolution::without_optimum(n, status, iterations));
        }

        // The objective row holds -w, the negated sum of artificials.
        let infeasibility = -tableau.objective[tableau.cols];
        if infeasibility > eps.sqrt() {
            trace!("phase I ended with residual {:?}", infeasibility);
            return Ok(SimplexSolution::without_optimum(n, LpStatus::Infeasible, iterations));
        }
        tableau.drive_out_artificials(eps);
    }

    let mut costs = vec![T::zero(); tableau.cols];
    for (c, &obj) in costs.iter_mut().zip(&lp.objective) {
        *c = -obj;
    }
    tableau.price(&costs);
    let remaining = config.max_iterations.saturating_sub(iterations);
    let (status, pivots) = tableau.run(artificial_start, remaining, eps);
    iterations += pivots;

    if status != LpStatus::Optimal {
        return Ok(SimplexSolution::without_optimum(n, status, iterations));
    }

    let optimal_point = tableau.point(n, eps);
    let optimal_value = optimal_point
        .iter()
        .zip(&lp.objective)
        .fold(T::zero(), |acc, (&x, &c)| acc + c * x);

    Ok(SimplexSolution {
        status,
        optimal_point,
        optimal_value,
        iterations,
    })
}

fn validate<T>(lp: &LinearProgram<T>) -> Result<()>
where
    T: Float + Debug,
{
    let n = lp.objective.len();
    if n == 0 {
        return Err(Error::invalid_input("linear program has no variables"));
    }
    if lp.constraints.len() != lp.rhs.len() {
        return Err(Error::invalid_input(format!(
            "{} constraint rows but {} right-hand sides",
            lp.constraints.len(),
            lp.rhs.len()
        )));
    }
    if let Some(row) = lp.constraints.iter().position(|row| row.len() != n) {
        return Err(Error::invalid_input(format!(
            "constraint row {} does not have {} coefficients",
            row, n
        )));
    }
    let all_finite = lp
        .objective
        .iter()
        .chain(lp.rhs.iter())
        .chain(lp.constraints.iter().flatten())
        .all(|v| v.is_finite());
    if !all_finite {
        return Err(Error::invalid_input("linear program contains non-finite coefficients"));
    }
    Ok(())
}

impl<T> SimplexSolution<T>
where
    T: Float + Debug,
{
    fn without_optimum(n: usize, status: LpStatus, iterations: usize) -> Self {
        let optimal_value = match status {
            LpStatus::Unbounded => T::infinity(),
            _ => T::neg_infinity(),
        };
        Self {
            status,
            optimal_point: vec![T::zero(); n],
            optimal_value,
            iterations,
        }
    }
}

/// Dense tableau in canonical form: original columns, one slack per row,
/// then artificials. The last entry of every row is the right-hand side.
struct Tableau<T> {
    rows: Vec<Vec<T>>,
    /// Reduced costs; the last entry is minus the current objective value.
    objective: Vec<T>,
    basis: Vec<usize>,
    cols: usize,
    artificial_start: usize,
}

impl<T> Tableau<T>
where
    T: Float + Debug,
{
    fn new(lp: &LinearProgram<T>) -> Self {
        let m = lp.constraints.len();
        let n = lp.objective.len();
        let artificial_start = n + m;
        let artificials = lp.rhs.iter().filter(|&&b| b < T::zero()).count();
        let cols = artificial_start + artificials;

        let mut rows = vec![vec![T::zero(); cols + 1]; m];
        let mut basis = vec![0; m];
        let mut next_artificial = artificial_start;

        for (i, row) in rows.iter_mut().enumerate() {
            let sign = if lp.rhs[i] < T::zero() { -T::one() } else { T::one() };
            for (dst, &a) in row.iter_mut().zip(&lp.constraints[i]) {
                *dst = sign * a;
            }
            row[n + i] = sign;
            row[cols] = sign * lp.rhs[i];
            if sign < T::zero() {
                row[next_artificial] = T::one();
                basis[i] = next_artificial;
                next_artificial += 1;
            } else {
                basis[i] = n + i;
            }
        }

        Self {
            rows,
            objective: vec![T::zero(); cols + 1],
            basis,
            cols,
            artificial_start,
        }
    }

    /// Recomputes the reduced-cost row for `costs` under the current basis.
    fn price(&mut self, costs: &[T]) {
        for j in 0..=self.cols {
            let own = if j < self.cols { costs[j] } else { T::zero() };
            let basic = self
                .rows
                .iter()
                .zip(&self.basis)
                .fold(T::zero(), |acc, (row, &b)| acc + costs[b] * row[j]);
            self.objective[j] = own - basic;
        }
    }

    /// Pivots until no column below `entering_limit` has a negative reduced cost.
    fn run(&mut self, entering_limit: usize, max_iterations: usize, eps: T) -> (LpStatus, usize) {
        let mut iterations = 0;
        while iterations < max_iterations {
            let entering = (0..entering_limit).find(|&j| self.objective[j] < -eps);
            let Some(col) = entering else {
                return (LpStatus::Optimal, iterations);
            };

            let mut leaving: Option<(usize, T)> = None;
            for (i, row) in self.rows.iter().enumerate() {
                let coef = row[col];
                if coef <= eps {
                    continue;
                }
                let ratio = row[self.cols] / coef;
                leaving = match leaving {
                    None => Some((i, ratio)),
                    Some((best, best_ratio)) => {
                        if ratio < best_ratio - eps
                            || ((ratio - best_ratio).abs() <= eps && self.basis[i] < self.basis[best])
                        {
                            Some((i, ratio))
                        } else {
                            Some((best, best_ratio))
                        }
                    }
                };
            }

            let Some((row, _)) = leaving else {
                return (LpStatus::Unbounded, iterations);
            };
            self.pivot(row, col);
            iterations += 1;
        }
        (LpStatus::IterationLimit, iterations)
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let p = self.rows[row][col];
        for v in self.rows[row].iter_mut() {
            *v = *v / p;
        }
        let pivot_row = self.rows[row].clone();

        for (i, r) in self.rows.iter_mut().enumerate() {
            if i != row {
                eliminate(r, &pivot_row, col);
            }
        }
        eliminate(&mut self.objective, &pivot_row, col);
        self.basis[row] = col;
    }

    /// Replaces zero-valued basic artificials with real columns where possible.
    /// Rows with no usable column are redundant and keep their artificial at zero.
    fn drive_out_artificials(&mut self, eps: T) {
        for i in 0..self.rows.len() {
            if self.basis[i] < self.artificial_start {
                continue;
            }
            let replacement = (0..self.artificial_start).find(|&j| self.rows[i][j].abs() > eps);
            if let Some(col) = replacement {
                self.pivot(i, col);
            }
        }
    }

    fn point(&self, n: usize, eps: T) -> Vec<T> {
        let mut point = vec![T::zero(); n];
        for (row, &b) in self.rows.iter().zip(&self.basis) {
            if b < n {
                let v = row[self.cols];
                point[b] = if v.abs() < eps { T::zero() } else { v };
            }
        }
        point
    }
}

fn eliminate<T>(row: &mut [T], pivot_row: &[T], col: usize)
where
    T: Float,
{
    let factor = row[col];
    if factor == T::zero() {
        return;
    }
    for (v, &p) in row.iter_mut().zip(pivot_row) {
        *v = *v - factor * p;
    }
}
