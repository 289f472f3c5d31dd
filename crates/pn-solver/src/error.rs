//! Error types for solver operations.

use pn_graph::GraphError;
use thiserror::Error;

/// Errors that abort a solve.
///
/// Devices that cannot compute and networks that do not settle are not
/// errors: the first leave devices invalid, the second end in
/// [`Phase::Stalled`](crate::Phase::Stalled).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid solver configuration: {what}")]
    InvalidConfig { what: &'static str },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type SolverResult<T> = Result<T, SolverError>;
