//! One-shot solver fallback: when the primary solver fails, look for an
//! external solver executable and retry once with it.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::Result;
use crate::math::integer_linear::cbc::CbcCommand;
use crate::math::integer_linear::{ILPSolution, ILPSolver, IntegerLinearProgram};

/// Finds an executable by program name.
pub trait ExecutableLocator {
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

impl<F> ExecutableLocator for F
where
    F: Fn(&str) -> Option<PathBuf>,
{
    fn locate(&self, program: &str) -> Option<PathBuf> {
        self(program)
    }
}

/// Looks programs up in a `PATH`-style directory list.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    dirs: Option<OsString>,
}

impl SearchPath {
    pub fn new(dirs: impl Into<OsString>) -> Self {
        Self {
            dirs: Some(dirs.into()),
        }
    }

    /// Uses the `PATH` of the current process.
    pub fn from_env() -> Self {
        Self {
            dirs: env::var_os("PATH"),
        }
    }
}

impl ExecutableLocator for SearchPath {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        let dirs = self.dirs.as_ref()?;
        env::split_paths(dirs)
            .flat_map(|dir| candidates(&dir, program))
            .find(|candidate| is_executable(candidate))
    }
}

fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    let mut found = vec![dir.join(program)];
    if cfg!(windows) {
        found.push(dir.join(format!("{}.exe", program)));
    }
    found
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

type Connect = Box<dyn Fn(PathBuf) -> Box<dyn ILPSolver>>;

/// Solves with `primary`; on error, locates the fallback program once and
/// retries with it. If the program cannot be found the primary's error is
/// returned unchanged.
pub struct FallbackSolver<P, L> {
    primary: P,
    locator: L,
    program: String,
    connect: Connect,
}

impl<P, L> FallbackSolver<P, L>
where
    P: ILPSolver,
    L: ExecutableLocator,
{
    /// Falls back to `cbc`.
    pub fn new(primary: P, locator: L) -> Self {
        Self {
            primary,
            locator,
            program: "cbc".to_string(),
            connect: Box::new(|path: PathBuf| -> Box<dyn ILPSolver> {
                Box::new(CbcCommand::new(path))
            }),
        }
    }

    /// Replaces the fallback program name and how a solver is built from its path.
    pub fn with_fallback<F, S>(mut self, program: impl Into<String>, connect: F) -> Self
    where
        F: Fn(PathBuf) -> S + 'static,
        S: ILPSolver + 'static,
    {
        self.program = program.into();
        self.connect = Box::new(move |path: PathBuf| -> Box<dyn ILPSolver> { Box::new(connect(path)) });
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl<P, L> ILPSolver for FallbackSolver<P, L>
where
    P: ILPSolver,
    L: ExecutableLocator,
{
    fn solve(&self, problem: &IntegerLinearProgram) -> Result<ILPSolution> {
        let original = match self.primary.solve(problem) {
            Ok(solution) => return Ok(solution),
            Err(e) => e,
        };
        warn!("primary solver failed on '{}': {}", problem.name, original);

        match self.locator.locate(&self.program) {
            Some(path) => {
                info!("retrying with {}", path.display());
                (self.connect)(path).solve(problem)
            }
            None => {
                warn!("no '{}' executable found, giving up", self.program);
                Err(original)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::math::integer_linear::{BranchAndBoundSolver, ILPStatus};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct Unavailable;

    impl ILPSolver for Unavailable {
        fn solve(&self, _problem: &IntegerLinearProgram) -> Result<ILPSolution> {
            Err(Error::SolverUnavailable("bundled solver missing".into()))
        }
    }

    fn problem() -> IntegerLinearProgram {
        let mut problem = IntegerLinearProgram::new("small");
        problem.add_variable("x", true);
        problem.set_objective(vec![1.0]).unwrap();
        problem.add_constraint("cap", vec![2.0], 7.0).unwrap();
        problem
    }

    #[test]
    fn test_primary_success_skips_lookup() {
        let lookups = Cell::new(0);
        let locator = |_: &str| {
            lookups.set(lookups.get() + 1);
            None
        };
        let solver = FallbackSolver::new(BranchAndBoundSolver::default(), locator);

        let solution = solver.solve(&problem()).unwrap();

        assert_eq!(solution.status, ILPStatus::Optimal);
        assert_eq!(solution.value_of("x"), Some(3.0));
        assert_eq!(lookups.get(), 0);
    }

    #[test]
    fn test_missing_fallback_returns_original_error() {
        let lookups = Cell::new(0);
        let locator = |program: &str| {
            assert_eq!(program, "cbc");
            lookups.set(lookups.get() + 1);
            None
        };
        let solver = FallbackSolver::new(Unavailable, locator);

        let err = solver.solve(&problem()).unwrap_err();

        assert!(matches!(err, Error::SolverUnavailable(ref msg) if msg == "bundled solver missing"));
        assert_eq!(lookups.get(), 1);
    }

    #[test]
    fn test_fallback_is_built_from_located_path() {
        let lookups = Cell::new(0);
        let locator = |_: &str| {
            lookups.set(lookups.get() + 1);
            Some(PathBuf::from("/opt/coin/bin/cbc"))
        };
        let connected = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&connected);
        let solver = FallbackSolver::new(Unavailable, locator).with_fallback("cbc", move |path| {
            seen.borrow_mut().push(path);
            BranchAndBoundSolver::default()
        });

        let solution = solver.solve(&problem()).unwrap();

        assert_eq!(solution.status, ILPStatus::Optimal);
        assert_eq!(solution.value_of("x"), Some(3.0));
        assert_eq!(lookups.get(), 1);
        assert_eq!(*connected.borrow(), vec![PathBuf::from("/opt/coin/bin/cbc")]);
    }

    #[test]
    fn test_fallback_failure_is_reported() {
        let locator = |_: &str| Some(PathBuf::from("/nonexistent/cbc"));
        let solver = FallbackSolver::new(Unavailable, locator);

        let err = solver.solve(&problem()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_search_path_finds_executables_only() {
        use std::os::unix::fs::PermissionsExt;

        let plain = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        fs::write(plain.path().join("cbc"), "").unwrap();
        let exe = bin.path().join("cbc");
        fs::write(&exe, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();

        let dirs = env::join_paths([plain.path(), bin.path()]).unwrap();
        let search = SearchPath::new(dirs);

        assert_eq!(search.locate("cbc"), Some(exe));
        assert_eq!(search.locate("glpsol"), None);
    }

    #[test]
    fn test_search_path_without_dirs() {
        assert_eq!(SearchPath::default().locate("cbc"), None);
    }
}
