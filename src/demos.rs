//! The two fixed scenarios driven by the binaries.

pub mod integration;
pub mod plot;
pub mod production;

pub use integration::{run_report, target, IntegrationReport};
pub use plot::{render_integration_plot, PlotOptions};
pub use production::{default_solver, fresh_drinks_model, solve_plan, ProductionPlan};
