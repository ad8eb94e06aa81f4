//! Deterministic quadrature used as a reference for the Monte Carlo estimates.

use crate::error::{Error, Result};

/// Absolute tolerance matching common library defaults.
pub const DEFAULT_TOLERANCE: f64 = 1.49e-8;

const MAX_DEPTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureResult {
    /// The computed integral value
    pub value: f64,
    /// Estimated absolute error in the result
    pub error_estimate: f64,
    /// Number of function evaluations
    pub evaluations: usize,
}

/// Integrates `f` over `[a, b]` with adaptive Simpson's rule.
///
/// Each interval is split until the two half-interval Simpson estimates agree
/// with the whole-interval estimate to within `15 * tolerance`, then the
/// Richardson-corrected value is used. `a > b` yields the negated integral.
pub fn adaptive_simpson<F>(f: F, a: f64, b: f64, tolerance: f64) -> Result<QuadratureResult>
where
    F: Fn(f64) -> f64,
{
    if !a.is_finite() || !b.is_finite() {
        return Err(Error::invalid_input(format!(
            "integration bounds must be finite, got [{}, {}]",
            a, b
        )));
    }
    if tolerance.is_nan() || tolerance <= 0.0 {
        return Err(Error::invalid_input("tolerance must be positive"));
    }
    if a == b {
        return Ok(QuadratureResult {
            value: 0.0,
            error_estimate: 0.0,
            evaluations: 0,
        });
    }
    if a > b {
        let reversed = adaptive_simpson(f, b, a, tolerance)?;
        return Ok(QuadratureResult {
            value: -reversed.value,
            ..reversed
        });
    }

    let fa = f(a);
    let fb = f(b);
    let fm = f((a + b) / 2.0);
    let whole = simpson(a, b, fa, fm, fb);

    let mut evaluations = 3;
    let (value, error_estimate) =
        refine(&f, a, b, [fa, fm, fb], whole, tolerance, MAX_DEPTH, &mut evaluations);

    if !value.is_finite() {
        return Err(Error::invalid_input("integrand is not finite on the interval"));
    }
    Ok(QuadratureResult {
        value,
        error_estimate,
        evaluations,
    })
}

fn simpson(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}

#[allow(clippy::too_many_arguments)]
fn refine<F>(
    f: &F,
    a: f64,
    b: f64,
    [fa, fm, fb]: [f64; 3],
    whole: f64,
    tolerance: f64,
    depth: usize,
    evaluations: &mut usize,
) -> (f64, f64)
where
    F: Fn(f64) -> f64,
{
    let m = (a + b) / 2.0;
    let flm = f((a + m) / 2.0);
    let frm = f((m + b) / 2.0);
    *evaluations += 2;

    let left = simpson(a, m, fa, flm, fm);
    let right = simpson(m, b, fm, frm, fb);
    let delta = left + right - whole;

    if depth == 0 || !delta.is_finite() || delta.abs() <= 15.0 * tolerance {
        return (left + right + delta / 15.0, delta.abs() / 15.0);
    }

    let (lv, le) = refine(f, a, m, [fa, flm, fm], left, tolerance / 2.0, depth - 1, evaluations);
    let (rv, re) = refine(f, m, b, [fm, frm, fb], right, tolerance / 2.0, depth - 1, evaluations);
    (lv + rv, le + re)
}
