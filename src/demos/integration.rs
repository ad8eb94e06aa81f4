//! Hit-or-miss integration of `sin(x) + x²` over `[0, 3]` at growing sample
//! sizes, next to a quadrature reference.

use std::fmt;

use log::debug;
use rand::Rng;

use crate::error::Result;
use crate::math::monte_carlo::{hit_or_miss_integration, HitOrMissEstimate};
use crate::math::quadrature::{adaptive_simpson, QuadratureResult, DEFAULT_TOLERANCE};

pub const LOWER_BOUND: f64 = 0.0;
pub const UPPER_BOUND: f64 = 3.0;
pub const SAMPLE_SIZES: [usize; 6] = [100, 1_000, 10_000, 100_000, 1_000_000, 10_000_000];
/// Size of the separate batch drawn for the plot
pub const PLOT_POINTS: usize = 10_000;
pub const FUNCTION_LABEL: &str = "f(x) = sin(x) + x^2";

pub fn target(x: f64) -> f64 {
    x.sin() + x * x
}

#[derive(Debug, Clone)]
pub struct IntegrationReport {
    pub lower: f64,
    pub upper: f64,
    pub reference: QuadratureResult,
    pub estimates: Vec<HitOrMissEstimate>,
}

/// Computes the reference value and one estimate per entry of `sample_sizes`.
pub fn run_report<R>(sample_sizes: &[usize], rng: &mut R) -> Result<IntegrationReport>
where
    R: Rng + ?Sized,
{
    let reference = adaptive_simpson(target, LOWER_BOUND, UPPER_BOUND, DEFAULT_TOLERANCE)?;
    debug!(
        "quadrature reference {} (error {:e}, {} evaluations)",
        reference.value, reference.error_estimate, reference.evaluations
    );

    let estimates = sample_sizes
        .iter()
        .map(|&n| hit_or_miss_integration(target, LOWER_BOUND, UPPER_BOUND, n, rng))
        .collect::<Result<Vec<_>>>()?;

    Ok(IntegrationReport {
        lower: LOWER_BOUND,
        upper: UPPER_BOUND,
        reference,
        estimates,
    })
}

impl fmt::Display for IntegrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Function: {}", FUNCTION_LABEL)?;
        writeln!(f, "Bounds: [{}, {}]", self.lower, self.upper)?;
        writeln!(f)?;
        writeln!(f, "Quadrature result: {:.6}", self.reference.value)?;
        writeln!(f)?;
        writeln!(f, "Monte Carlo results:")?;
        for estimate in &self.estimates {
            writeln!(f, " -> N={:<8} | {:.6}", estimate.samples, estimate.value)?;
        }
        Ok(())
    }
}
