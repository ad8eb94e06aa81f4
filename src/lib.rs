pub mod demos;
pub mod error;
pub mod logging;
pub mod math;

pub use error::{Error, Result};

pub use math::{
    adaptive_simpson, hit_or_miss_integration, sample_hit_or_miss, BranchAndBoundSolver,
    CbcCommand, FallbackSolver, HitOrMissEstimate, ILPSolution, ILPSolver, ILPStatus,
    IntegerLinearProgram, QuadratureResult, SearchPath,
};
