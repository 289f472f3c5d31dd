//! The tick loop: priming, passes, convergence.

use pn_core::Real;
use pn_graph::DeviceGraph;
use tracing::{debug, trace, warn};

use crate::error::SolverResult;
use crate::state::{Phase, SimulationState};

/// Reported after every pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassEvent {
    pub tick: u64,
    /// Passes completed in this tick, counting this one
    pub iteration: usize,
    pub max_delta: Real,
    /// Devices without valid data after this pass
    pub invalid: usize,
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    pub tick: u64,
    pub iterations: usize,
    pub converged: bool,
    pub phase: Phase,
    pub max_delta: Real,
    pub invalid: usize,
}

/// Solve one tick.
///
/// See [`solve_with_progress`].
pub fn solve(graph: &mut DeviceGraph, state: &mut SimulationState) -> SolverResult<SolveReport> {
    solve_with_progress(graph, state, |_, _| {})
}

/// Solve one tick, calling `on_pass` after every pass.
///
/// Tick 1 is a cold start: every slot is cleared before boundaries are
/// seeded. Later ticks start from the previous tick's values. A tick ends
/// `Converged` when every device is valid and either the network has no
/// loops or no device moved by `convergence_epsilon` or more; it ends
/// `Stalled` after exactly `max_iterations` passes otherwise. Stalling is
/// not an error and keeps the last values.
pub fn solve_with_progress<F>(
    graph: &mut DeviceGraph,
    state: &mut SimulationState,
    mut on_pass: F,
) -> SolverResult<SolveReport>
where
    F: FnMut(&PassEvent, &DeviceGraph),
{
    state.config().validate()?;

    state.tick += 1;
    state.iteration_count = 0;
    state.converged = false;
    state.max_delta = 0.0;
    state.phase = Phase::Priming;
    let cold = state.tick == 1;
    debug!(tick = state.tick, cold, "priming");

    if cold {
        graph.reset();
    }
    graph.seed_boundaries();

    let sequence = graph.order().sequence().to_vec();
    let acyclic = graph.is_acyclic();
    state.phase = Phase::Iterating;

    let invalid = loop {
        graph.clear_demand();
        for &id in sequence.iter().rev() {
            graph.refresh_demand(id)?;
        }

        let stamp = state.stamp();
        for &id in &sequence {
            if let Some(err) = graph.evaluate(id, stamp)? {
                trace!(device = %id, %err, "device not ready");
            }
        }
        state.iteration_count += 1;

        let max_delta = graph.max_delta();
        let invalid = graph.invalid_count();
        state.max_delta = max_delta;

        let event = PassEvent {
            tick: state.tick,
            iteration: state.iteration_count,
            max_delta,
            invalid,
        };
        debug!(
            tick = event.tick,
            iteration = event.iteration,
            max_delta = event.max_delta,
            invalid = event.invalid,
            "pass"
        );
        on_pass(&event, graph);

        if invalid == 0 && (acyclic || max_delta < state.convergence_epsilon) {
            state.converged = true;
            state.phase = Phase::Converged;
            break invalid;
        }
        if state.iteration_count >= state.max_iterations {
            state.phase = Phase::Stalled;
            warn!(
                tick = state.tick,
                iterations = state.iteration_count,
                max_delta,
                invalid,
                "network did not settle"
            );
            break invalid;
        }
    };

    debug!(tick = state.tick, phase = %state.phase, iterations = state.iteration_count, "tick done");

    Ok(SolveReport {
        tick: state.tick,
        iterations: state.iteration_count,
        converged: state.converged,
        phase: state.phase,
        max_delta: state.max_delta,
        invalid,
    })
}
