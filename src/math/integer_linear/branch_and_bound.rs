use approx::abs_diff_eq;
use log::{debug, trace};

use crate::error::{Error, Result};
use crate::math::integer_linear::{ILPSolution, ILPSolver, ILPStatus, IntegerLinearProgram};
use crate::math::optimization::simplex::{maximize, LinearProgram, LpStatus};
use crate::math::optimization::OptimizationConfig;

/// Depth-first branch and bound over simplex relaxations.
pub struct BranchAndBoundSolver {
    max_nodes: usize,
    tolerance: f64,
    lp_config: OptimizationConfig<f64>,
}

impl Default for BranchAndBoundSolver {
    fn default() -> Self {
        Self::new(10_000, 1e-6)
    }
}

impl BranchAndBoundSolver {
    pub fn new(max_nodes: usize, tolerance: f64) -> Self {
        Self {
            max_nodes,
            tolerance,
            lp_config: OptimizationConfig::default(),
        }
    }

    pub fn with_lp_config(mut self, lp_config: OptimizationConfig<f64>) -> Self {
        self.lp_config = lp_config;
        self
    }

    fn is_integer(&self, value: f64) -> bool {
        abs_diff_eq!(value, value.round(), epsilon = self.tolerance)
    }

    fn branch(
        &self,
        node: &LinearProgram<f64>,
        var_idx: usize,
        value: f64,
    ) -> (LinearProgram<f64>, LinearProgram<f64>) {
        let n = node.objective.len();
        let mut lower_branch = node.clone();
        let mut upper_branch = node.clone();

        // x_i <= floor(value)
        let mut lower_constraint = vec![0.0; n];
        lower_constraint[var_idx] = 1.0;
        lower_branch.constraints.push(lower_constraint);
        lower_branch.rhs.push(value.floor());

        // x_i >= ceil(value), written as -x_i <= -ceil(value)
        let mut upper_constraint = vec![0.0; n];
        upper_constraint[var_idx] = -1.0;
        upper_branch.constraints.push(upper_constraint);
        upper_branch.rhs.push(-value.ceil());

        (lower_branch, upper_branch)
    }
}

impl ILPSolver for BranchAndBoundSolver {
    fn solve(&self, problem: &IntegerLinearProgram) -> Result<ILPSolution> {
        let root = LinearProgram {
            objective: problem.objective.clone(),
            constraints: problem.constraints.clone(),
            rhs: problem.bounds.clone(),
        };

        let mut best: Option<Vec<f64>> = None;
        let mut best_objective = f64::NEG_INFINITY;
        let mut nodes = vec![root];
        let mut explored = 0;
        let mut exhausted = true;

        while let Some(current) = nodes.pop() {
            if explored >= self.max_nodes {
                if best.is_none() {
                    return Err(Error::NodeLimit {
                        limit: self.max_nodes,
                    });
                }
                debug!("node limit reached, returning incumbent {}", best_objective);
                exhausted = false;
                break;
            }
            explored += 1;

            let relaxation = maximize(&current, &self.lp_config)?;
            match relaxation.status {
                LpStatus::Optimal => {}
                LpStatus::Infeasible => continue,
                LpStatus::Unbounded => {
                    // Added branching rows only shrink the region, so this
                    // can only happen at the root.
                    debug!("relaxation of '{}' is unbounded", problem.name);
                    return Ok(ILPSolution::empty(problem, ILPStatus::Unbounded));
                }
                LpStatus::IterationLimit => {
                    return Err(Error::IterationLimit(self.lp_config.max_iterations));
                }
            }

            if relaxation.optimal_value <= best_objective + self.tolerance {
                trace!("pruned node with bound {}", relaxation.optimal_value);
                continue;
            }

            let fractional = relaxation
                .optimal_point
                .iter()
                .enumerate()
                .find(|&(i, &value)| problem.is_integer(i) && !self.is_integer(value));

            match fractional {
                None => {
                    trace!("new incumbent {}", relaxation.optimal_value);
                    best_objective = relaxation.optimal_value;
                    best = Some(relaxation.optimal_point);
                }
                Some((var_idx, &value)) => {
                    let (lower, upper) = self.branch(&current, var_idx, value);
                    nodes.push(upper);
                    nodes.push(lower);
                }
            }
        }

        debug!("branch and bound explored {} nodes for '{}'", explored, problem.name);

        match best {
            Some(mut values) => {
                for &i in &problem.integer_vars {
                    values[i] = values[i].round();
                }
                // An incumbent is only proven optimal once every node is closed.
                let status = if exhausted {
                    ILPStatus::Optimal
                } else {
                    ILPStatus::NotSolved
                };
                Ok(ILPSolution::new(problem, status, values))
            }
            None => Ok(ILPSolution::empty(problem, ILPStatus::Infeasible)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn two_var_problem(constraints: Vec<(Vec<f64>, f64)>) -> IntegerLinearProgram {
        let mut problem = IntegerLinearProgram::new("test");
        problem.add_variable("x", true);
        problem.add_variable("y", true);
        problem.set_objective(vec![1.0, 1.0]).unwrap();
        for (i, (row, bound)) in constraints.into_iter().enumerate() {
            problem.add_constraint(format!("c{}", i), row, bound).unwrap();
        }
        problem
    }

    #[test]
    fn test_simple_ilp() {
        // maximize x + y subject to x + y <= 5
        let problem = two_var_problem(vec![(vec![1.0, 1.0], 5.0)]);

        let solver = BranchAndBoundSolver::new(1000, 1e-6);
        let solution = solver.solve(&problem).unwrap();

        assert_eq!(solution.status, ILPStatus::Optimal);
        assert_abs_diff_eq!(solution.objective_value, 5.0, epsilon = 1e-6);
        assert_eq!(solution.values.len(), 2);
        for &value in &solution.values {
            assert_eq!(value, value.round());
        }
    }

    #[test]
    fn test_fractional_relaxation_is_branched() {
        // maximize x + y subject to 2x + 2y <= 7: relaxation gives 3.5
        let problem = two_var_problem(vec![(vec![2.0, 2.0], 7.0)]);

        let solution = BranchAndBoundSolver::default().solve(&problem).unwrap();

        assert_eq!(solution.status, ILPStatus::Optimal);
        assert_abs_diff_eq!(solution.objective_value, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_infeasible_ilp() {
        // x + y <= 5 and x + y >= 6
        let problem = two_var_problem(vec![(vec![1.0, 1.0], 5.0), (vec![-1.0, -1.0], -6.0)]);

        let solution = BranchAndBoundSolver::new(1000, 1e-6).solve(&problem).unwrap();

        assert_eq!(solution.status, ILPStatus::Infeasible);
        assert_eq!(solution.values, vec![0.0, 0.0]);
    }

    #[test]
    fn test_integer_infeasible_ilp() {
        // 0.4 <= x <= 0.6 has real solutions but no integer one
        let mut problem = IntegerLinearProgram::new("gap");
        problem.add_variable("x", true);
        problem.set_objective(vec![1.0]).unwrap();
        problem.add_constraint("upper", vec![1.0], 0.6).unwrap();
        problem.add_constraint("lower", vec![-1.0], -0.4).unwrap();

        let solution = BranchAndBoundSolver::default().solve(&problem).unwrap();
        assert_eq!(solution.status, ILPStatus::Infeasible);
    }

    #[test]
    fn test_unbounded_ilp() {
        let problem = two_var_problem(vec![(vec![1.0, -1.0], 3.0)]);

        let solution = BranchAndBoundSolver::default().solve(&problem).unwrap();
        assert_eq!(solution.status, ILPStatus::Unbounded);
    }

    #[test]
    fn test_node_limit_without_incumbent() {
        let problem = two_var_problem(vec![(vec![2.0, 2.0], 7.0)]);

        let result = BranchAndBoundSolver::new(1, 1e-6).solve(&problem);
        assert!(matches!(result, Err(Error::NodeLimit { limit: 1 })));
    }

    #[test]
    fn test_relaxation_iteration_limit_is_an_error() {
        let problem = two_var_problem(vec![(vec![1.0, 0.0], 2.5), (vec![0.0, 1.0], 2.5)]);
        let solver = BranchAndBoundSolver::default().with_lp_config(OptimizationConfig {
            max_iterations: 1,
            tolerance: 1e-9,
        });

        let result = solver.solve(&problem);
        assert!(matches!(result, Err(Error::IterationLimit(1))));
    }

    #[test]
    fn test_node_limit_with_incumbent_is_not_proven() {
        // maximize 5x + 4y subject to 6x + 4y <= 24, x + 2y <= 6
        let mut problem = IntegerLinearProgram::new("limited");
        problem.add_variable("x", true);
        problem.add_variable("y", true);
        problem.set_objective(vec![5.0, 4.0]).unwrap();
        problem.add_constraint("c0", vec![6.0, 4.0], 24.0).unwrap();
        problem.add_constraint("c1", vec![1.0, 2.0], 6.0).unwrap();

        let full = BranchAndBoundSolver::default().solve(&problem).unwrap();
        assert_eq!(full.status, ILPStatus::Optimal);
        assert_eq!(full.values, vec![4.0, 0.0]);
        assert_abs_diff_eq!(full.objective_value, 20.0, epsilon = 1e-9);

        let cut_short = BranchAndBoundSolver::new(3, 1e-6).solve(&problem).unwrap();
        assert_eq!(cut_short.status, ILPStatus::NotSolved);
        assert_eq!(cut_short.values, vec![3.0, 1.0]);
        assert_abs_diff_eq!(cut_short.objective_value, 19.0, epsilon = 1e-9);
    }
}
