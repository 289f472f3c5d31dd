//! Per-simulation solver state.

use core::fmt;

use pn_core::Real;
use pn_graph::PassStamp;
use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;

/// Where the solver is in a tick.
///
/// ```text
/// Idle -> Priming -> Iterating -> Converged | Stalled -> (next tick) Priming
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Priming,
    Iterating,
    Converged,
    Stalled,
}

impl Phase {
    /// True once a tick has finished, settled or not.
    pub fn is_finished(self) -> bool {
        matches!(self, Phase::Converged | Phase::Stalled)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::Priming => "priming",
            Phase::Iterating => "iterating",
            Phase::Converged => "converged",
            Phase::Stalled => "stalled",
        };
        f.write_str(s)
    }
}

/// Tick counter, convergence flag and iteration budget.
///
/// Reset when a simulation starts and mutated only by a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    /// Ticks solved so far; the tick in progress during a solve
    pub tick: u64,
    /// Passes run in the current tick
    pub iteration_count: usize,
    pub converged: bool,
    pub max_iterations: usize,
    pub convergence_epsilon: Real,
    pub phase: Phase,
    /// Largest device change in the last pass
    pub max_delta: Real,
}

impl SimulationState {
    pub fn new(config: &SolverConfig) -> Self {
        Self {
            tick: 0,
            iteration_count: 0,
            converged: false,
            max_iterations: config.max_iterations,
            convergence_epsilon: config.convergence_epsilon,
            phase: Phase::Idle,
            max_delta: 0.0,
        }
    }

    /// Back to idle before tick 1. The next solve is a cold start.
    pub fn reset(&mut self) {
        self.tick = 0;
        self.iteration_count = 0;
        self.converged = false;
        self.phase = Phase::Idle;
        self.max_delta = 0.0;
    }

    pub fn config(&self) -> SolverConfig {
        SolverConfig {
            max_iterations: self.max_iterations,
            convergence_epsilon: self.convergence_epsilon,
        }
    }

    /// Stamp for values sent in the pass about to run.
    pub fn stamp(&self) -> PassStamp {
        PassStamp {
            tick: self.tick,
            iteration: self.iteration_count,
        }
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(&SolverConfig::default())
    }
}
