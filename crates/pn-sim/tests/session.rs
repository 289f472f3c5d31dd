//! Session behaviour: queueing, publishing, start/stop.

use std::sync::Arc;

use pn_core::DeviceData;
use pn_devices::{Consumer, Pipe, Pump, Valve};
use pn_graph::{DeviceGraphBuilder, GraphError};
use pn_sim::{Channel, Gauge, GaugeScale, Request, SimError, Simulation};
use pn_solver::{Phase, SolverConfig};

fn plant() -> Simulation {
    let mut b = DeviceGraphBuilder::new();
    let pump = b.add_device("pump", Pump::new(50.0).unwrap());
    let pipe = b.add_device("pipe", Pipe);
    let valve = b.add_device("valve", Valve::new(1.0));
    let sink = b.add_device("sink", Consumer::default());
    b.set_boundary(pump, 0, DeviceData::new(10.0, 0.0, 20.0));
    b.set_pressure_loss(pipe, 5.0);
    b.set_pressure_loss(valve, 2.0);
    b.connect(pump, 0, pipe, 0);
    b.connect(pipe, 0, valve, 0);
    b.connect(valve, 0, sink, 0);
    Simulation::new(b.build().unwrap(), SolverConfig::default()).unwrap()
}

fn sink_data(sim: &Simulation) -> DeviceData {
    sim.snapshot().by_name("sink").unwrap().data
}

#[test]
fn stopped_simulation_does_not_solve() {
    let mut sim = plant();
    let outcome = sim.tick().unwrap();
    assert!(outcome.report.is_none());
    assert_eq!(sim.snapshot().tick, 0);
    assert!(sim.snapshot().devices.is_empty());
}

#[test]
fn start_then_tick_publishes() {
    let mut sim = plant();
    sim.start();
    assert_eq!(sim.pending(), 1);
    assert!(!sim.is_running());

    let outcome = sim.tick().unwrap();
    assert_eq!(outcome.applied, 1);
    let report = outcome.report.unwrap();
    assert!(report.converged);
    assert_eq!(sim.snapshot().phase, Phase::Converged);
    assert_eq!(sink_data(&sim), DeviceData::new(10.0, 43.0, 20.0));
}

#[test]
fn requests_wait_for_next_tick() {
    let mut sim = plant();
    sim.start();
    sim.tick().unwrap();
    let held = sim.snapshot();

    let valve = sim.device_id("valve").unwrap();
    sim.submit(Request::SetOpenness {
        device: valve,
        openness: 0.5,
    });
    // Nothing changes until the tick boundary.
    assert_eq!(sink_data(&sim).flow, 10.0);

    sim.tick().unwrap();
    let out = sink_data(&sim);
    assert_eq!(out.flow, 5.0);
    assert_eq!(out.pressure, 41.0);

    // A snapshot handed out earlier is untouched.
    assert_eq!(held.by_name("sink").unwrap().data.flow, 10.0);
    assert!(!Arc::ptr_eq(&held, &sim.snapshot()));
}

#[test]
fn bad_request_is_rejected_alone() {
    let mut sim = plant();
    let pump = sim.device_id("pump").unwrap();
    let pipe = sim.device_id("pipe").unwrap();
    sim.start();
    sim.submit(Request::SetOpenness {
        device: pump,
        openness: 0.5,
    });
    sim.submit(Request::SetPressureLoss {
        device: pipe,
        loss: 10.0,
    });

    let outcome = sim.tick().unwrap();
    assert_eq!(outcome.applied, 2);
    assert_eq!(outcome.rejected.len(), 1);
    assert!(matches!(
        outcome.rejected[0].1,
        SimError::Graph(GraphError::WrongKind { .. })
    ));
    assert_eq!(sink_data(&sim).pressure, 38.0);
}

#[test]
fn pump_rise_and_boundary_requests() {
    let mut sim = plant();
    let pump = sim.device_id("pump").unwrap();
    sim.start();
    sim.submit(Request::SetPumpRise { device: pump, rise: 20.0 });
    sim.submit(Request::SetBoundary {
        device: pump,
        slot: 0,
        data: DeviceData::new(4.0, 1.0, 60.0),
    });
    sim.tick().unwrap();
    assert_eq!(sink_data(&sim), DeviceData::new(4.0, 14.0, 60.0));
}

#[test]
fn stop_keeps_last_snapshot_and_restart_is_cold() {
    let mut sim = plant();
    sim.start();
    sim.tick().unwrap();
    sim.tick().unwrap();
    assert_eq!(sim.state().tick, 2);

    sim.stop();
    assert!(sim.tick().unwrap().report.is_none());
    assert!(!sim.is_running());
    assert_eq!(sim.snapshot().tick, 2);
    assert_eq!(sim.state().phase, Phase::Idle);

    sim.start();
    let report = sim.tick().unwrap().report.unwrap();
    assert_eq!(report.tick, 1);
}

#[test]
fn invalid_config_rejected() {
    let b = DeviceGraphBuilder::new();
    let config = SolverConfig {
        max_iterations: 0,
        ..Default::default()
    };
    assert!(matches!(
        Simulation::new(b.build().unwrap(), config),
        Err(SimError::Solver(_))
    ));
}

#[test]
fn gauge_reads_snapshot() {
    let mut sim = plant();
    sim.start();
    sim.tick().unwrap();
    let gauge = Gauge::new(Channel::Pressure, GaugeScale::linear(0.0, 86.0).unwrap());
    let snap = sim.snapshot();
    let angle = gauge.angle(&snap.by_name("sink").unwrap().data).unwrap();
    assert!(angle.abs() < 1e-9);
}

#[test]
fn snapshot_serializes() {
    let mut sim = plant();
    sim.start();
    sim.tick().unwrap();
    let json = serde_json::to_value(&*sim.snapshot()).unwrap();
    assert_eq!(json["phase"], "converged");
    assert_eq!(json["devices"][3]["name"], "sink");
    assert_eq!(json["devices"][3]["data"]["pressure"], 43.0);
}
