//! Error type shared by the solvers, estimators and plotting code.

use std::process::ExitStatus;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Arguments outside the domain an algorithm accepts.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Branch and bound ran out of nodes before finding any integer solution.
    #[error("branch and bound exhausted its limit of {limit} nodes without an integer solution")]
    NodeLimit { limit: usize },

    /// The simplex method did not reach an optimal basis in time.
    #[error("simplex did not terminate within {0} iterations")]
    IterationLimit(usize),

    /// A solver could not be used at all.
    #[error("solver unavailable: {0}")]
    SolverUnavailable(String),

    /// An external solver process exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    SolverProcess {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("malformed solution file: {0}")]
    MalformedSolution(String),

    #[error("plotting failed: {0}")]
    Plot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::invalid_input("a must be less than b").to_string(),
            "invalid input: a must be less than b"
        );
        assert_eq!(
            Error::NodeLimit { limit: 3 }.to_string(),
            "branch and bound exhausted its limit of 3 nodes without an integer solution"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "cbc");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "cbc");
    }
}
