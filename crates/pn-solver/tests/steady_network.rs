//! Whole-network solves against hand-computed values.

use pn_core::{DeviceData, DeviceId};
use pn_devices::{Consumer, Pipe, Pump, TeeMerge, TeeSplit, Valve};
use pn_graph::{DeviceGraph, DeviceGraphBuilder};
use pn_solver::{Phase, SimulationState, SolverConfig, solve, solve_with_progress};
use proptest::prelude::*;

fn state(max_iterations: usize) -> SimulationState {
    SimulationState::new(&SolverConfig {
        max_iterations,
        convergence_epsilon: 1e-6,
    })
}

fn data(graph: &DeviceGraph, id: DeviceId) -> DeviceData {
    graph.device(id).unwrap().device_data()
}

#[test]
fn pump_pipe_valve_consumer() {
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
    let mut g = b.build().unwrap();

    let mut st = state(100);
    let report = solve(&mut g, &mut st).unwrap();

    assert!(report.converged);
    assert_eq!(report.iterations, 1);
    assert_eq!(st.phase, Phase::Converged);
    assert_eq!(data(&g, sink), DeviceData::new(10.0, 43.0, 20.0));
    assert_eq!(g.device(valve).unwrap().slot_out_data(0), Some(&DeviceData::new(10.0, 43.0, 20.0)));
}

#[test]
fn parallel_pumps_feed_merge() {
    let mut b = DeviceGraphBuilder::new();
    let a = b.add_device("pump a", Pump::new(10.0).unwrap());
    let c = b.add_device("pump b", Pump::new(10.0).unwrap());
    let merge = b.add_device("merge", TeeMerge);
    let sink = b.add_device("sink", Consumer::default());
    b.pair_parallel(a, c);
    b.set_boundary(a, 0, DeviceData::new(5.0, 0.0, 20.0));
    b.set_boundary(c, 0, DeviceData::new(5.0, 0.0, 60.0));
    b.connect(a, 0, merge, 0);
    b.connect(c, 0, merge, 1);
    b.connect(merge, 0, sink, 0);
    let mut g = b.build().unwrap();

    let report = solve(&mut g, &mut state(100)).unwrap();
    assert!(report.converged);
    assert_eq!(report.iterations, 1);

    let out = data(&g, sink);
    assert_eq!(out.flow, 10.0);
    assert_eq!(out.temperature, 40.0);
    assert_eq!(out.pressure, 10.0);
    assert_eq!(g.parallel_share(a), Some(0.5));
}

#[test]
fn split_follows_downstream_demand() {
    let mut b = DeviceGraphBuilder::new();
    let pump = b.add_device("pump", Pump::new(10.0).unwrap());
    let split = b.add_device("split", TeeSplit::default());
    let easy = b.add_device("easy", Pipe);
    let hard = b.add_device("hard", Pipe);
    let sink_easy = b.add_device("sink easy", Consumer::default());
    let sink_hard = b.add_device("sink hard", Consumer::default());
    b.set_boundary(pump, 0, DeviceData::new(16.0, 0.0, 20.0));
    b.set_pressure_loss(easy, 1.0);
    b.set_pressure_loss(hard, 3.0);
    b.connect(pump, 0, split, 0);
    b.connect(split, 0, easy, 0);
    b.connect(split, 1, hard, 0);
    b.connect(easy, 0, sink_easy, 0);
    b.connect(hard, 0, sink_hard, 0);
    let mut g = b.build().unwrap();

    let report = solve(&mut g, &mut state(100)).unwrap();
    assert!(report.converged);

    // Weights 10 - 1 and 10 - 3.
    assert_eq!(data(&g, sink_easy).flow, 9.0);
    assert_eq!(data(&g, sink_hard).flow, 7.0);
    assert_eq!(data(&g, sink_hard).pressure, 7.0);
}

#[test]
fn closed_valve_isolates_downstream() {
    let mut b = DeviceGraphBuilder::new();
    let pump = b.add_device("pump", Pump::new(20.0).unwrap());
    let valve = b.add_device("valve", Valve::new(0.0));
    let pipe = b.add_device("pipe", Pipe);
    let sink = b.add_device("sink", Consumer::default());
    b.set_boundary(pump, 0, DeviceData::new(8.0, 1.0, 35.0));
    b.set_pressure_loss(pipe, 1.0);
    b.connect(pump, 0, valve, 0);
    b.connect(valve, 0, pipe, 0);
    b.connect(pipe, 0, sink, 0);
    let mut g = b.build().unwrap();

    let mut st = state(100);
    solve(&mut g, &mut st).unwrap();
    let before = data(&g, sink);
    assert_eq!(before, DeviceData::new(0.0, -1.0, 35.0));

    g.set_boundary(pump, 0, DeviceData::new(8.0, 30.0, 35.0)).unwrap();
    let report = solve(&mut g, &mut st).unwrap();
    assert_eq!(report.iterations, 1);
    assert_eq!(data(&g, sink), before);
    assert_eq!(data(&g, pump).pressure, 50.0);
}

/// feed -> merge -> pump -> split -> sink
///                    ^         |
///                    +-- back -+
fn recirculation(pump_rise: f64) -> (DeviceGraph, DeviceId, DeviceId) {
    let mut b = DeviceGraphBuilder::new();
    let feed = b.add_device("feed", Pipe);
    let merge = b.add_device("merge", TeeMerge);
    let pump = b.add_device("pump", Pump::new(pump_rise).unwrap());
    let split = b.add_device("split", TeeSplit::default());
    let back = b.add_device("back", Pipe);
    let sink = b.add_device("sink", Consumer::default());
    b.set_boundary(feed, 0, DeviceData::new(1.0, 5.0, 20.0));
    b.set_pressure_loss(back, 1.0);
    b.connect(feed, 0, merge, 0);
    b.connect(merge, 0, pump, 0);
    b.connect(pump, 0, split, 0);
    b.connect(split, 0, sink, 0);
    b.connect(split, 1, back, 0);
    b.connect(back, 0, merge, 1);
    (b.build().unwrap(), split, sink)
}

#[test]
fn pumped_loop_converges() {
    let (mut g, split, sink) = recirculation(5.0);
    assert!(!g.is_acyclic());

    let mut st = state(100);
    let mut passes = 0;
    let report = solve_with_progress(&mut g, &mut st, |event, graph| {
        passes += 1;
        assert_eq!(event.iteration, passes);
        let d = graph.device(split).unwrap();
        let q_in = d.slot_in_data(0).unwrap().flow;
        let q_out = d.slot_out_data(0).unwrap().flow + d.slot_out_data(1).unwrap().flow;
        assert!((q_in - q_out).abs() <= 1e-12 * q_in.max(1.0));
    })
    .unwrap();

    assert!(report.converged);
    assert_eq!(report.phase, Phase::Converged);
    assert!(report.iterations > 1 && report.iterations < 100);
    assert_eq!(passes, report.iterations);
    assert!(report.max_delta < 1e-6);

    // What goes in comes out.
    let out = data(&g, sink);
    assert!((out.flow - 1.0).abs() < 1e-5);
    assert_eq!(out.pressure, 10.0);
    assert!((out.temperature - 20.0).abs() < 1e-9);
}

#[test]
fn warm_tick_starts_from_last_values() {
    let (mut g, _, sink) = recirculation(5.0);
    let mut st = state(100);
    let first = solve(&mut g, &mut st).unwrap();
    let settled = data(&g, sink);

    let second = solve(&mut g, &mut st).unwrap();
    assert!(second.converged);
    assert_eq!(second.tick, 2);
    assert!(second.iterations < first.iterations);
    assert!((data(&g, sink).flow - settled.flow).abs() < 1e-6);
}

#[test]
fn unpowered_loop_stalls_at_budget() {
    // Without a pump every lap loses pressure, so the loop never settles.
    let (mut g, _, sink) = recirculation(0.0);
    let mut st = state(25);
    let mut passes = 0;
    let report = solve_with_progress(&mut g, &mut st, |_, _| passes += 1).unwrap();

    assert!(!report.converged);
    assert!(!st.converged);
    assert_eq!(report.phase, Phase::Stalled);
    assert_eq!(report.iterations, 25);
    assert_eq!(st.iteration_count, 25);
    assert_eq!(passes, 25);
    // Best values are kept.
    assert!(data(&g, sink).valid);
}

#[test]
fn stall_is_recoverable() {
    let (mut g, _, _) = recirculation(0.0);
    let mut st = state(10);
    assert_eq!(solve(&mut g, &mut st).unwrap().phase, Phase::Stalled);
    let report = solve(&mut g, &mut st).unwrap();
    assert_eq!(report.tick, 2);
    assert_eq!(report.iterations, 10);
}

#[test]
fn reset_state_means_cold_start() {
    let (mut g, _, sink) = recirculation(5.0);
    let mut st = state(100);
    let first = solve(&mut g, &mut st).unwrap();
    st.reset();
    let again = solve(&mut g, &mut st).unwrap();
    assert_eq!(again.tick, 1);
    assert_eq!(again.iterations, first.iterations);
    assert!(data(&g, sink).valid);
}

proptest! {
    #[test]
    fn pipe_chain_is_exact_in_one_pass(
        losses in prop::collection::vec(0.0_f64..10.0, 1..12),
        p0 in 0.0_f64..100.0,
        q in 0.1_f64..50.0,
    ) {
        let mut b = DeviceGraphBuilder::new();
        let mut prev = None;
        for (i, &loss) in losses.iter().enumerate() {
            let id = b.add_device(format!("pipe {i}"), Pipe);
            b.set_pressure_loss(id, loss);
            match prev {
                None => b.set_boundary(id, 0, DeviceData::new(q, p0, 20.0)),
                Some(p) => b.connect(p, 0, id, 0),
            }
            prev = Some(id);
        }
        let sink = b.add_device("sink", Consumer::default());
        if let Some(p) = prev {
            b.connect(p, 0, sink, 0);
        }
        let mut g = b.build().unwrap();

        let report = solve(&mut g, &mut state(50)).unwrap();
        prop_assert!(report.converged);
        prop_assert_eq!(report.iterations, 1);

        let out = data(&g, sink);
        let expected = p0 - losses.iter().sum::<f64>();
        prop_assert!((out.pressure - expected).abs() < 1e-9);
        prop_assert_eq!(out.flow, q);
    }
}
