//! The fresh-drinks production plan: how many units of lemonade and fruit
//! juice to make from fixed stocks of water, sugar, lemon juice and fruit
//! puree so that total output is as large as possible.

use std::fmt;

use log::info;

use crate::error::Result;
use crate::math::integer_linear::{
    BranchAndBoundSolver, FallbackSolver, ILPSolution, ILPSolver, ILPStatus, IntegerLinearProgram,
    SearchPath,
};

pub const WATER_CAPACITY: f64 = 100.0;
pub const SUGAR_CAPACITY: f64 = 50.0;
pub const LEMON_JUICE_CAPACITY: f64 = 30.0;
pub const FRUIT_PUREE_CAPACITY: f64 = 40.0;

/// Resource units consumed by one unit of a drink.
#[derive(Debug, Clone, Copy)]
pub struct Recipe {
    pub name: &'static str,
    pub water: f64,
    pub sugar: f64,
    pub lemon_juice: f64,
    pub fruit_puree: f64,
}

pub const LEMONADE: Recipe = Recipe {
    name: "lemonade",
    water: 2.0,
    sugar: 1.0,
    lemon_juice: 1.0,
    fruit_puree: 0.0,
};

pub const FRUIT_JUICE: Recipe = Recipe {
    name: "fruit_juice",
    water: 1.0,
    sugar: 0.0,
    lemon_juice: 0.0,
    fruit_puree: 2.0,
};

/// Builds `max lemonade + fruit_juice` under the four resource limits.
pub fn fresh_drinks_model() -> Result<IntegerLinearProgram> {
    let drinks = [LEMONADE, FRUIT_JUICE];
    let mut model = IntegerLinearProgram::new("fresh-drinks-production");
    for drink in &drinks {
        model.add_variable(drink.name, true);
    }
    model.set_objective(vec![1.0; drinks.len()])?;

    let resources: [(&str, fn(&Recipe) -> f64, f64); 4] = [
        ("Water Constraint", |r| r.water, WATER_CAPACITY),
        ("Sugar Constraint", |r| r.sugar, SUGAR_CAPACITY),
        ("Lemon Juice Constraint", |r| r.lemon_juice, LEMON_JUICE_CAPACITY),
        ("Fruit Puree Constraint", |r| r.fruit_puree, FRUIT_PUREE_CAPACITY),
    ];
    for (label, usage, capacity) in resources {
        model.add_constraint(label, drinks.iter().map(usage).collect(), capacity)?;
    }
    Ok(model)
}

/// Built-in branch and bound, retried once with `cbc` from `PATH` if it fails.
pub fn default_solver() -> FallbackSolver<BranchAndBoundSolver, SearchPath> {
    FallbackSolver::new(BranchAndBoundSolver::default(), SearchPath::from_env())
}

/// Solved plan, with quantities as whole units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionPlan {
    pub status: ILPStatus,
    pub lemonade: i64,
    pub fruit_juice: i64,
    pub total: i64,
}

impl ProductionPlan {
    /// Reads the plan out of `solution` whatever its status; variables the
    /// solver did not report count as zero.
    pub fn from_solution(solution: &ILPSolution) -> Self {
        let units = |name| solution.value_of(name).unwrap_or(0.0) as i64;
        Self {
            status: solution.status,
            lemonade: units(LEMONADE.name),
            fruit_juice: units(FRUIT_JUICE.name),
            total: solution.objective_value as i64,
        }
    }
}

impl fmt::Display for ProductionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solve status: {}", self.status)?;
        writeln!(f, "Optimal Production:")?;
        writeln!(f, " -> Lemonade:    {} units", self.lemonade)?;
        writeln!(f, " -> Fruit Juice: {} units", self.fruit_juice)?;
        writeln!(f, "Total Products: {} units", self.total)
    }
}

pub fn solve_plan<S>(solver: &S) -> Result<ProductionPlan>
where
    S: ILPSolver + ?Sized,
{
    let model = fresh_drinks_model()?;
    let solution = solver.solve(&model)?;
    info!("'{}' solved with status {}", model.name, solution.status);
    Ok(ProductionPlan::from_solution(&solution))
}
