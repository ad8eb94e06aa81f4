use std::fmt;

use crate::error::{Error, Result};

pub mod branch_and_bound;
pub mod cbc;
pub mod fallback;
pub mod lp_format;


/// A maximization problem `max c^T x` subject to `Ax ≤ b`, `x ≥ 0`, with the
/// variables listed in `integer_vars` restricted to integer values.
///
/// Variables and constraints carry names so the model can be reported and
/// written out for external solvers.
#[derive(Debug, Clone)]
pub struct IntegerLinearProgram {
    pub name: String,
    pub variables: Vec<String>,
    pub objective: Vec<f64>,
    pub constraint_labels: Vec<String>,
    pub constraints: Vec<Vec<f64>>,
    pub bounds: Vec<f64>,
    pub integer_vars: Vec<usize>,
}

impl IntegerLinearProgram {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            objective: Vec::new(),
            constraint_labels: Vec::new(),
            constraints: Vec::new(),
            bounds: Vec::new(),
            integer_vars: Vec::new(),
        }
    }

    /// Adds a non-negative variable and returns its column index.
    ///
    /// Existing constraint rows and the objective get a zero coefficient.
    pub fn add_variable(&mut self, name: impl Into<String>, integer: bool) -> usize {
        let index = self.variables.len();
        self.variables.push(name.into());
        self.objective.push(0.0);
        for row in &mut self.constraints {
            row.push(0.0);
        }
        if integer {
            self.integer_vars.push(index);
        }
        index
    }

    /// Adds the row `coefficients · x ≤ bound`.
    pub fn add_constraint(
        &mut self,
        label: impl Into<String>,
        coefficients: Vec<f64>,
        bound: f64,
    ) -> Result<()> {
        let label = label.into();
        if coefficients.len() != self.variables.len() {
            return Err(Error::invalid_input(format!(
                "constraint '{}' has {} coefficients for {} variables",
                label,
                coefficients.len(),
                self.variables.len()
            )));
        }
        if !bound.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(Error::invalid_input(format!(
                "constraint '{}' has non-finite coefficients",
                label
            )));
        }
        self.constraint_labels.push(label);
        self.constraints.push(coefficients);
        self.bounds.push(bound);
        Ok(())
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>) -> Result<()> {
        if coefficients.len() != self.variables.len() {
            return Err(Error::invalid_input(format!(
                "objective has {} coefficients for {} variables",
                coefficients.len(),
                self.variables.len()
            )));
        }
        self.objective = coefficients;
        Ok(())
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn is_integer(&self, var: usize) -> bool {
        self.integer_vars.contains(&var)
    }

    /// Objective value at `values`.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective.iter().zip(values).map(|(c, x)| c * x).sum()
    }
}

#[derive(Debug, Clone)]
pub struct ILPSolution {
    pub values: Vec<f64>,
    pub objective_value: f64,
    pub status: ILPStatus,
    variables: Vec<String>,
}

impl ILPSolution {
    pub fn new(problem: &IntegerLinearProgram, status: ILPStatus, values: Vec<f64>) -> Self {
        let objective_value = problem.evaluate(&values);
        Self {
            values,
            objective_value,
            status,
            variables: problem.variables.clone(),
        }
    }

    /// A solution with every variable at zero, for statuses without an optimum.
    pub fn empty(problem: &IntegerLinearProgram, status: ILPStatus) -> Self {
        Self::new(problem, status, vec![0.0; problem.num_variables()])
    }

    pub fn value_of(&self, variable: &str) -> Option<f64> {
        self.variables
            .iter()
            .position(|v| v == variable)
            .and_then(|i| self.values.get(i).copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ILPStatus {
    Optimal,
    Infeasible,
    Unbounded,
    NotSolved,
    Undefined,
}

impl fmt::Display for ILPStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ILPStatus::Optimal => "Optimal",
            ILPStatus::Infeasible => "Infeasible",
            ILPStatus::Unbounded => "Unbounded",
            ILPStatus::NotSolved => "Not Solved",
            ILPStatus::Undefined => "Undefined",
        };
        f.write_str(label)
    }
}

pub trait ILPSolver {
    fn solve(&self, problem: &IntegerLinearProgram) -> Result<ILPSolution>;
}

impl<S: ILPSolver + ?Sized> ILPSolver for Box<S> {
    fn solve(&self, problem: &IntegerLinearProgram) -> Result<ILPSolution> {
        (**self).solve(problem)
    }
}

pub use branch_and_bound::BranchAndBoundSolver;
pub use cbc::CbcCommand;
pub use fallback::{ExecutableLocator, FallbackSolver, SearchPath};
pub use lp_format::write_lp;
