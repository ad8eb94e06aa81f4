use std::path::Path;

use drinks_mc::demos::integration::{
    run_report, target, FUNCTION_LABEL, LOWER_BOUND, PLOT_POINTS, SAMPLE_SIZES, UPPER_BOUND,
};
use drinks_mc::demos::plot::{render_integration_plot, PlotOptions};
use drinks_mc::logging;
use drinks_mc::math::monte_carlo::sample_hit_or_miss;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const PLOT_FILE: &str = "monte_carlo_integration.svg";

fn main() -> drinks_mc::Result<()> {
    logging::init();
    let mut rng = ChaCha20Rng::from_entropy();

    let report = run_report(&SAMPLE_SIZES, &mut rng)?;
    print!("{}", report);

    let sample = sample_hit_or_miss(target, LOWER_BOUND, UPPER_BOUND, PLOT_POINTS, &mut rng)?;
    let path = Path::new(PLOT_FILE);
    let options = PlotOptions::new(path, FUNCTION_LABEL).with_reference(report.reference.value);
    render_integration_plot(target, LOWER_BOUND, UPPER_BOUND, &sample, &options)?;

    println!("\nPlot written to {}", path.display());
    Ok(())
}
