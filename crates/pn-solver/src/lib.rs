//! Relaxation solver for device networks.
//!
//! A solve runs passes over the graph until every device holds valid data
//! that no longer changes. Each pass has two sweeps:
//!
//! 1. demand sweep, downstream to upstream: every device turns the pressure
//!    its outlets need into the pressure its inlets need;
//! 2. forward sweep, upstream to downstream: every device computes from its
//!    inlets and sends the result on.
//!
//! Acyclic networks are exact after one pass. Networks with loops repeat
//! passes until the largest change drops below the configured epsilon or the
//! iteration budget runs out.

pub mod config;
pub mod error;
pub mod solve;
pub mod state;

pub use config::SolverConfig;
pub use error::{SolverError, SolverResult};
pub use solve::{PassEvent, SolveReport, solve, solve_with_progress};
pub use state::{Phase, SimulationState};
