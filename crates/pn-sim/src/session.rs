//! A running simulation: queue, solve, publish.

use std::collections::VecDeque;
use std::sync::Arc;

use pn_core::DeviceId;
use pn_graph::DeviceGraph;
use pn_solver::{Phase, SimulationState, SolveReport, SolverConfig, solve};
use tracing::{debug, info, warn};

use crate::error::{SimError, SimResult};
use crate::request::Request;
use crate::snapshot::Snapshot;

/// What one call to [`Simulation::tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Requests applied before solving
    pub applied: usize,
    /// Requests that could not be applied, with the reason
    pub rejected: Vec<(Request, SimError)>,
    /// `None` while the simulation is stopped
    pub report: Option<SolveReport>,
}

/// Owns a device graph and advances it tick by tick.
///
/// Changes arrive through [`submit`](Self::submit) and are held until the
/// next tick, so the graph is only ever touched between solves. Readers get
/// the latest [`Snapshot`] behind an `Arc`; a new one replaces it after each
/// solve, and snapshots already handed out never change.
#[derive(Debug)]
pub struct Simulation {
    graph: DeviceGraph,
    state: SimulationState,
    queue: VecDeque<Request>,
    running: bool,
    snapshot: Arc<Snapshot>,
}

impl Simulation {
    /// Create a stopped simulation.
    pub fn new(graph: DeviceGraph, config: SolverConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            graph,
            state: SimulationState::new(&config),
            queue: VecDeque::new(),
            running: false,
            snapshot: Arc::new(Snapshot::default()),
        })
    }

    /// Queue a request for the next tick.
    pub fn submit(&mut self, request: Request) {
        self.queue.push_back(request);
    }

    pub fn start(&mut self) {
        self.submit(Request::Start);
    }

    pub fn stop(&mut self) {
        self.submit(Request::Stop);
    }

    /// Requests waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn graph(&self) -> &DeviceGraph {
        &self.graph
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn device_id(&self, name: &str) -> Option<DeviceId> {
        self.graph.find_by_name(name)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Apply queued requests, then solve one tick if running.
    ///
    /// A request that fails (unknown device, wrong kind, bad value) is
    /// dropped and reported in the outcome; the rest still apply.
    pub fn tick(&mut self) -> SimResult<TickOutcome> {
        let mut applied = 0;
        let mut rejected = Vec::new();
        while let Some(request) = self.queue.pop_front() {
            match self.apply(&request) {
                Ok(()) => applied += 1,
                Err(err) => {
                    warn!(?request, %err, "request rejected");
                    rejected.push((request, err));
                }
            }
        }

        if !self.running {
            return Ok(TickOutcome {
                applied,
                rejected,
                report: None,
            });
        }

        let report = solve(&mut self.graph, &mut self.state)?;
        self.snapshot = Arc::new(Snapshot::capture(&self.graph, &self.state));
        debug!(tick = report.tick, phase = %report.phase, "snapshot published");

        Ok(TickOutcome {
            applied,
            rejected,
            report: Some(report),
        })
    }

    fn apply(&mut self, request: &Request) -> SimResult<()> {
        match *request {
            Request::Start => {
                if !self.running {
                    self.state.reset();
                    self.running = true;
                    info!("simulation started");
                }
            }
            Request::Stop => {
                if self.running {
                    self.running = false;
                    self.state.phase = Phase::Idle;
                    info!(tick = self.state.tick, "simulation stopped");
                }
            }
            Request::SetOpenness { device, openness } => {
                self.graph.set_openness(device, openness)?;
            }
            Request::SetPressureLoss { device, loss } => {
                self.graph.set_pressure_loss(device, loss)?;
            }
            Request::SetPumpRise { device, rise } => {
                self.graph.set_pump_rise(device, rise)?;
            }
            Request::SetBoundary { device, slot, data } => {
                self.graph.set_boundary(device, slot, data)?;
            }
        }
        Ok(())
    }
}
