pub mod simplex;

use num_traits::Float;
use std::fmt::Debug;

pub use simplex::minimize as simplex_minimize;
pub use simplex::{maximize as simplex_maximize, LinearProgram, LpStatus, SimplexSolution};

/// Configuration options for optimization algorithms.
#[derive(Debug, Clone)]
pub struct OptimizationConfig<T>
where
    T: Float + Debug,
{
    /// Maximum number of iterations (pivots, for the simplex method)
    pub max_iterations: usize,
    /// Convergence tolerance
    pub tolerance: T,
}

impl<T> Default for OptimizationConfig<T>
where
    T: Float + Debug,
{
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: T::from(1e-9).unwrap_or_else(T::epsilon),
        }
    }
}
