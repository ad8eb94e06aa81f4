//! Solving through an external COIN-OR CBC executable.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::math::integer_linear::lp_format::{lp_name, write_lp};
use crate::math::integer_linear::{ILPSolution, ILPSolver, ILPStatus, IntegerLinearProgram};

/// Runs `cbc` on an LP file written to a temporary directory and reads back
/// its solution file.
#[derive(Debug, Clone)]
pub struct CbcCommand {
    path: PathBuf,
}

impl CbcCommand {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ILPSolver for CbcCommand {
    fn solve(&self, problem: &IntegerLinearProgram) -> Result<ILPSolution> {
        let dir = tempfile::tempdir()?;
        let model_path = dir.path().join("model.lp");
        let solution_path = dir.path().join("solution.txt");
        fs::write(&model_path, write_lp(problem))?;

        info!("solving '{}' with {}", problem.name, self.path.display());
        let output = Command::new(&self.path)
            .arg(&model_path)
            .arg("-solve")
            .arg("-printingOptions")
            .arg("all")
            .arg("-solution")
            .arg(&solution_path)
            .output()?;

        if !output.status.success() {
            return Err(Error::SolverProcess {
                program: self.path.display().to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        debug!("cbc output:\n{}", String::from_utf8_lossy(&output.stdout));

        let text = fs::read_to_string(&solution_path).map_err(|e| {
            Error::MalformedSolution(format!("cannot read {}: {}", solution_path.display(), e))
        })?;
        parse_solution(problem, &text)
    }
}

/// Parses a CBC solution file.
///
/// The first line starts with the status; every following line is
/// `index name value reduced_cost`, optionally prefixed with `**` when the
/// value violates a bound.
pub fn parse_solution(problem: &IntegerLinearProgram, text: &str) -> Result<ILPSolution> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| Error::MalformedSolution("empty solution file".into()))?;
    let status = parse_status(header)?;

    let names: Vec<String> = problem.variables.iter().map(|v| lp_name(v)).collect();
    let mut values = vec![0.0; names.len()];

    for line in lines {
        let line = line.trim_start().trim_start_matches("**").trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(Error::MalformedSolution(format!("short line '{}'", line)));
        }
        let value: f64 = fields[2]
            .parse()
            .map_err(|_| Error::MalformedSolution(format!("bad value in '{}'", line)))?;
        if let Some(i) = names.iter().position(|n| n == fields[1]) {
            values[i] = value;
        }
    }

    Ok(ILPSolution::new(problem, status, values))
}

fn parse_status(header: &str) -> Result<ILPStatus> {
    let header = header.trim();
    let status = if header.starts_with("Optimal") {
        ILPStatus::Optimal
    } else if header.starts_with("Infeasible") || header.starts_with("Integer infeasible") {
        ILPStatus::Infeasible
    } else if header.starts_with("Unbounded") {
        ILPStatus::Unbounded
    } else if header.starts_with("Stopped") {
        ILPStatus::NotSolved
    } else {
        return Err(Error::MalformedSolution(format!("unknown status line '{}'", header)));
    };
    Ok(status)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn problem() -> IntegerLinearProgram {
        let mut problem = IntegerLinearProgram::new("p");
        problem.add_variable("lemonade", true);
        problem.add_variable("fruit juice", true);
        problem.set_objective(vec![1.0, 1.0]).unwrap();
        problem
    }

    #[test]
    fn test_parse_optimal_solution() {
        let text = "Optimal - objective value 50.00000000\n\
                    \x20     0 lemonade                30                      -1\n\
                    \x20     1 fruit_juice             20                      -1\n";

        let solution = parse_solution(&problem(), text).unwrap();

        assert_eq!(solution.status, ILPStatus::Optimal);
        assert_eq!(solution.value_of("lemonade"), Some(30.0));
        assert_eq!(solution.value_of("fruit juice"), Some(20.0));
        assert_eq!(solution.objective_value, 50.0);
    }

    #[test]
    fn test_parse_flagged_lines_and_statuses() {
        let text = "Infeasible - objective value 0.00000000\n\
                    **    0 lemonade                1.5                     0\n";

        let solution = parse_solution(&problem(), text).unwrap();
        assert_eq!(solution.status, ILPStatus::Infeasible);
        assert_eq!(solution.values, vec![1.5, 0.0]);

        assert_eq!(parse_status("Integer infeasible - objective value 0").unwrap(), ILPStatus::Infeasible);
        assert_eq!(parse_status("Unbounded").unwrap(), ILPStatus::Unbounded);
        assert_eq!(parse_status("Stopped on iterations - objective value 3").unwrap(), ILPStatus::NotSolved);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_solution(&problem(), ""), Err(Error::MalformedSolution(_))));
        assert!(matches!(
            parse_solution(&problem(), "Feasible\n"),
            Err(Error::MalformedSolution(_))
        ));
        assert!(matches!(
            parse_solution(&problem(), "Optimal\n 0 lemonade thirty 0\n"),
            Err(Error::MalformedSolution(_))
        ));
    }

    #[test]
    fn test_missing_executable_is_io_error() {
        let solver = CbcCommand::new("/nonexistent/bin/cbc");
        assert_eq!(solver.path(), Path::new("/nonexistent/bin/cbc"));
        assert!(matches!(solver.solve(&problem()), Err(Error::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_solution_file_is_read_back() {
        use super::testing::{retry_busy, write_fake_cbc, DRINKS_OPTIMUM};

        let dir = tempfile::tempdir().unwrap();
        let solver = CbcCommand::new(write_fake_cbc(dir.path(), DRINKS_OPTIMUM));

        let solution = retry_busy(|| solver.solve(&problem())).unwrap();

        assert_eq!(solution.status, ILPStatus::Optimal);
        assert_eq!(solution.values, vec![30.0, 20.0]);
        assert_eq!(solution.objective_value, 50.0);
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_run_is_process_error() {
        use super::testing::{retry_busy, write_fake_cbc};

        let dir = tempfile::tempdir().unwrap();
        let solver = CbcCommand::new(write_fake_cbc(dir.path(), "echo 'license expired' >&2\nexit 1\n"));

        let err = retry_busy(|| solver.solve(&problem())).unwrap_err();

        match err {
            Error::SolverProcess { status, stderr, .. } => {
                assert_eq!(status.code(), Some(1));
                assert_eq!(stderr, "license expired");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
