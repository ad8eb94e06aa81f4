//! SVG rendering of a hit-or-miss batch over the integrated function.

use std::path::Path;

use log::info;
use plotters::prelude::*;

use crate::error::{Error, Result};
use crate::math::monte_carlo::{linspace, HitOrMissSample};

const GRAY: RGBColor = RGBColor(128, 128, 128);
const WHEAT: RGBColor = RGBColor(245, 222, 179);

#[derive(Debug, Clone)]
pub struct PlotOptions<'a> {
    pub path: &'a Path,
    pub label: &'a str,
    /// Quadrature value shown next to the Monte Carlo estimate
    pub reference: Option<f64>,
    pub size: (u32, u32),
}

impl<'a> PlotOptions<'a> {
    pub fn new(path: &'a Path, label: &'a str) -> Self {
        Self {
            path,
            label,
            reference: None,
            size: (1000, 600),
        }
    }

    pub fn with_reference(mut self, reference: f64) -> Self {
        self.reference = Some(reference);
        self
    }
}

/// Draws `f` over `[a - 0.5, b + 0.5]`, the shaded area between `a` and `b`,
/// the sampled points split by classification, the bounds and a summary box.
pub fn render_integration_plot<F>(
    f: F,
    a: f64,
    b: f64,
    sample: &HitOrMissSample,
    options: &PlotOptions<'_>,
) -> Result<()>
where
    F: Fn(f64) -> f64,
{
    let root = SVGBackend::new(options.path, options.size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let curve: Vec<(f64, f64)> = linspace(a - 0.5, b + 0.5, 400).map(|x| (x, f(x))).collect();
    let (low, high) = curve
        .iter()
        .fold((0.0_f64, sample.estimate.max_y), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    let pad = (high - low) * 0.05;
    let (y_min, y_max) = (low - pad, high + pad);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Monte Carlo Integration of {} from {} to {}", options.label, a, b),
            ("sans-serif", 22),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((a - 0.5)..(b + 0.5), y_min..y_max)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("f(x)")
        .light_line_style(BLACK.mix(0.05))
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(AreaSeries::new(
            linspace(a, b, 100).map(|x| (x, f(x))),
            0.0,
            GRAY.mix(0.3),
        ))
        .map_err(plot_error)?
        .label("Integration area")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], GRAY.mix(0.3).filled()));

    chart
        .draw_series(LineSeries::new(curve, BLUE.stroke_width(2)))
        .map_err(plot_error)?
        .label(options.label)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    chart
        .draw_series(sample.hits().map(|p| Circle::new(p, 1, GREEN.mix(0.5).filled())))
        .map_err(plot_error)?
        .label(format!("Under curve: {}", sample.estimate.hits))
        .legend(|(x, y)| Circle::new((x, y), 3, GREEN.filled()));

    chart
        .draw_series(sample.misses().map(|p| Circle::new(p, 1, RED.mix(0.5).filled())))
        .map_err(plot_error)?
        .label(format!("Above curve: {}", sample.estimate.misses()))
        .legend(|(x, y)| Circle::new((x, y), 3, RED.filled()));

    for (bound, name) in [(a, "a"), (b, "b")] {
        chart
            .draw_series(LineSeries::new(vec![(bound, y_min), (bound, y_max)], GRAY.stroke_width(1)))
            .map_err(plot_error)?
            .label(format!("{} = {}", name, bound))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GRAY));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;

    let mut lines = vec![
        format!("Points: {}", sample.points.len()),
        format!("Monte Carlo: {:.4}", sample.estimate.value),
    ];
    if let Some(reference) = options.reference {
        lines.push(format!("Quadrature: {:.4}", reference));
    }
    draw_summary(&root, &lines)?;

    root.present().map_err(plot_error)?;
    info!("plot written to {}", options.path.display());
    Ok(())
}

/// Text box anchored to the lower right of the plotting area.
fn draw_summary<DB>(root: &DrawingArea<DB, plotters::coord::Shift>, lines: &[String]) -> Result<()>
where
    DB: DrawingBackend,
{
    const LINE_HEIGHT: i32 = 18;
    const BOX_WIDTH: i32 = 190;

    let (width, height) = root.dim_in_pixel();
    let right = width as i32 - 30;
    let bottom = height as i32 - 60;
    let top_left = (right - BOX_WIDTH, bottom - LINE_HEIGHT * lines.len() as i32 - 12);

    root.draw(&Rectangle::new([top_left, (right, bottom)], WHEAT.mix(0.8).filled()))
        .map_err(plot_error)?;
    root.draw(&Rectangle::new([top_left, (right, bottom)], BLACK.stroke_width(1)))
        .map_err(plot_error)?;

    let style = ("sans-serif", 16).into_font().color(&BLACK);
    for (i, line) in lines.iter().enumerate() {
        let pos = (top_left.0 + 8, top_left.1 + 6 + LINE_HEIGHT * i as i32);
        root.draw(&Text::new(line.as_str(), pos, style.clone()))
            .map_err(plot_error)?;
    }
    Ok(())
}

fn plot_error<E: std::fmt::Display>(err: E) -> Error {
    Error::Plot(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::monte_carlo::sample_hit_or_miss;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::fs;

    fn f(x: f64) -> f64 {
        x.sin() + x * x
    }

    #[test]
    fn test_renders_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.svg");
        let mut rng = ChaCha20Rng::seed_from_u64(17);
        let sample = sample_hit_or_miss(f, 0.0, 3.0, 500, &mut rng).unwrap();

        let options = PlotOptions::new(&path, "f(x) = sin(x) + x^2").with_reference(10.99);
        render_integration_plot(f, 0.0, 3.0, &sample, &options).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains(&format!("Under curve: {}", sample.estimate.hits)));
        assert!(svg.contains(&format!("Above curve: {}", sample.estimate.misses())));
        assert!(svg.contains("Points: 500"));
        assert!(svg.contains("Quadrature: 10.9900"));
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("plot.svg");
        let mut rng = ChaCha20Rng::seed_from_u64(17);
        let sample = sample_hit_or_miss(f, 0.0, 3.0, 10, &mut rng).unwrap();

        let result = render_integration_plot(f, 0.0, 3.0, &sample, &PlotOptions::new(&path, "f"));
        assert!(matches!(result, Err(Error::Plot(_))));
    }
}
