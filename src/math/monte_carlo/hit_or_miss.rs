//! Hit-or-miss Monte Carlo integration.
//!
//! Points are drawn uniformly from the box `[a, b) × [0, max_y)` and the
//! integral is estimated as the box area times the fraction of points that
//! fall on or under the curve.
//!
//! `max_y` is the largest value of `f` on an evenly spaced grid over `[a, b]`.
//! That is only an upper bound when `f` has no peak narrower than the grid
//! spacing; otherwise the estimate is biased low.

use log::trace;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::error::{Error, Result};

pub const DEFAULT_GRID_POINTS: usize = 1000;

#[derive(Debug, Clone)]
pub struct HitOrMissConfig {
    /// Number of grid points used to estimate the maximum of `f`
    pub grid_points: usize,
}

impl Default for HitOrMissConfig {
    fn default() -> Self {
        Self {
            grid_points: DEFAULT_GRID_POINTS,
        }
    }
}

/// Outcome of one hit-or-miss batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOrMissEstimate {
    pub samples: usize,
    /// Points with `y <= f(x)`
    pub hits: usize,
    /// Height of the sampling box
    pub max_y: f64,
    pub box_area: f64,
    pub value: f64,
}

impl HitOrMissEstimate {
    fn new(a: f64, b: f64, max_y: f64, samples: usize, hits: usize) -> Self {
        let box_area = (b - a) * max_y;
        Self {
            samples,
            hits,
            max_y,
            box_area,
            value: box_area * (hits as f64 / samples as f64),
        }
    }

    pub fn misses(&self) -> usize {
        self.samples - self.hits
    }
}

/// A hit-or-miss batch that keeps its points, for plotting.
#[derive(Debug, Clone)]
pub struct HitOrMissSample {
    pub points: Vec<(f64, f64)>,
    pub under_curve: Vec<bool>,
    pub estimate: HitOrMissEstimate,
}

impl HitOrMissSample {
    pub fn hits(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.classified(true)
    }

    pub fn misses(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.classified(false)
    }

    fn classified(&self, under: bool) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .zip(&self.under_curve)
            .filter(move |&(_, &u)| u == under)
            .map(|(&p, _)| p)
    }
}

/// `n` evenly spaced points from `a` to `b`, both included.
pub fn linspace(a: f64, b: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 { (b - a) / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| if n > 1 && i == n - 1 { b } else { a + step * i as f64 })
}

/// Largest value of `f` over a `grid_points` grid on `[a, b]`.
pub fn estimate_max<F>(f: F, a: f64, b: f64, grid_points: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    linspace(a, b, grid_points).map(f).fold(f64::NEG_INFINITY, f64::max)
}

/// Estimates the integral of `f` over `[a, b]` from `samples` random points.
///
/// ```
/// use drinks_mc::math::monte_carlo::hit_or_miss_integration;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let mut rng = ChaCha20Rng::seed_from_u64(7);
/// let estimate = hit_or_miss_integration(|x| x, 0.0, 1.0, 100_000, &mut rng).unwrap();
/// assert!((estimate.value - 0.5).abs() < 0.01);
/// ```
pub fn hit_or_miss_integration<F, R>(
    f: F,
    a: f64,
    b: f64,
    samples: usize,
    rng: &mut R,
) -> Result<HitOrMissEstimate>
where
    F: Fn(f64) -> f64,
    R: Rng + ?Sized,
{
    hit_or_miss_with_config(f, a, b, samples, &HitOrMissConfig::default(), rng)
}

pub fn hit_or_miss_with_config<F, R>(
    f: F,
    a: f64,
    b: f64,
    samples: usize,
    config: &HitOrMissConfig,
    rng: &mut R,
) -> Result<HitOrMissEstimate>
where
    F: Fn(f64) -> f64,
    R: Rng + ?Sized,
{
    let max_y = bounding_height(&f, a, b, samples, config)?;
    let xs = Uniform::new(a, b);
    let ys = Uniform::new(0.0, max_y);

    let mut hits = 0;
    for _ in 0..samples {
        let x = xs.sample(rng);
        let y = ys.sample(rng);
        if y <= f(x) {
            hits += 1;
        }
    }

    let estimate = HitOrMissEstimate::new(a, b, max_y, samples, hits);
    trace!("hit-or-miss n={} hits={} value={}", samples, hits, estimate.value);
    Ok(estimate)
}

/// Like [`hit_or_miss_integration`], but keeps every point and its classification.
pub fn sample_hit_or_miss<F, R>(
    f: F,
    a: f64,
    b: f64,
    samples: usize,
    rng: &mut R,
) -> Result<HitOrMissSample>
where
    F: Fn(f64) -> f64,
    R: Rng + ?Sized,
{
    let max_y = bounding_height(&f, a, b, samples, &HitOrMissConfig::default())?;
    let xs = Uniform::new(a, b);
    let ys = Uniform::new(0.0, max_y);

    let points: Vec<(f64, f64)> = (0..samples).map(|_| (xs.sample(rng), ys.sample(rng))).collect();
    let under_curve: Vec<bool> = points.iter().map(|&(x, y)| y <= f(x)).collect();
    let hits = under_curve.iter().filter(|&&u| u).count();

    Ok(HitOrMissSample {
        points,
        under_curve,
        estimate: HitOrMissEstimate::new(a, b, max_y, samples, hits),
    })
}

fn bounding_height<F>(f: &F, a: f64, b: f64, samples: usize, config: &HitOrMissConfig) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    if !a.is_finite() || !b.is_finite() || a >= b || !(b - a).is_finite() {
        return Err(Error::invalid_input(format!(
            "interval must be finite with a < b, got [{}, {}]",
            a, b
        )));
    }
    if samples == 0 {
        return Err(Error::invalid_input("sample count must be positive"));
    }
    if config.grid_points < 2 {
        return Err(Error::invalid_input("maximum estimation needs at least 2 grid points"));
    }

    let max_y = estimate_max(f, a, b, config.grid_points);
    if !max_y.is_finite() {
        return Err(Error::invalid_input("function maximum on the grid is not finite"));
    }
    if max_y <= 0.0 {
        return Err(Error::invalid_input(format!(
            "function has no positive values on the grid over [{}, {}]",
            a, b
        )));
    }
    Ok(max_y)
}
