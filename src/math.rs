pub mod integer_linear;
pub mod monte_carlo;
pub mod optimization;
pub mod quadrature;

pub use optimization::{
    simplex::LinearProgram, simplex::LpStatus, simplex::SimplexSolution, simplex_maximize,
    simplex_minimize, OptimizationConfig,
};

pub use integer_linear::{
    BranchAndBoundSolver, CbcCommand, ExecutableLocator, FallbackSolver, ILPSolution, ILPSolver,
    ILPStatus, IntegerLinearProgram, SearchPath,
};

pub use monte_carlo::{hit_or_miss_integration, sample_hit_or_miss, HitOrMissEstimate};
pub use quadrature::{adaptive_simpson, QuadratureResult};
