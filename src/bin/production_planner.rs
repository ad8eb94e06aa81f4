use drinks_mc::demos::production::{default_solver, solve_plan};
use drinks_mc::logging;

fn main() -> drinks_mc::Result<()> {
    logging::init();

    let plan = solve_plan(&default_solver())?;
    println!();
    print!("{}", plan);
    Ok(())
}
