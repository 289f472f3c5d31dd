//! Integration tests for pn-devices through the `Math` dispatch.

use pn_core::{DeviceData, Real};
use pn_devices::{
    ComputeContext, ComputeError, Consumer, HeatExchanger, Math, Pipe, Pump, TeeMerge, TeeSplit,
    Valve, ValveLaw,
};
use proptest::prelude::*;

fn eval(math: &Math, inputs: &[DeviceData], loss: Real) -> Vec<DeviceData> {
    math.compute(inputs, loss, &ComputeContext::default())
        .unwrap()
}

#[test]
fn pump_pipe_valve_chain_by_hand() {
    let boundary = DeviceData::new(10.0, 0.0, 20.0);
    let pump = eval(&Pump::new(50.0).unwrap().into(), &[boundary], 0.0);
    let pipe = eval(&Pipe.into(), &pump, 5.0);
    let valve = eval(&Valve::new(1.0).into(), &pipe, 2.0);
    assert_eq!(valve[0], DeviceData::new(10.0, 43.0, 20.0));

    let consumer = Math::from(Consumer::default());
    assert!(eval(&consumer, &valve, 0.0).is_empty());
}

#[test]
fn valve_position_sweep_is_monotonic() {
    let inlet = DeviceData::new(12.0, 30.0, 15.0);
    let mut prev_flow = -1.0;
    let mut prev_pressure = Real::NEG_INFINITY;
    for pos in [0.1, 0.2, 0.4, 0.6, 0.8, 1.0] {
        let out = eval(&Valve::new(pos).with_law(ValveLaw::Quadratic).into(), &[inlet], 1.0)[0];
        assert!(out.flow >= prev_flow, "flow should not decrease with openness");
        assert!(out.pressure >= prev_pressure, "loss should shrink with openness");
        prev_flow = out.flow;
        prev_pressure = out.pressure;
    }
}

#[test]
fn every_kind_reports_missing_inputs() {
    let models: Vec<Math> = vec![
        Pipe.into(),
        Valve::new(0.7).into(),
        Pump::new(3.0).unwrap().into(),
        TeeSplit::default().into(),
        TeeMerge.into(),
        HeatExchanger::new(0.4).unwrap().into(),
        Consumer::default().into(),
    ];
    for math in models {
        let inputs = vec![DeviceData::invalid(); math.inlets()];
        let err = math
            .compute(&inputs, 0.0, &ComputeContext::default())
            .unwrap_err();
        assert!(
            matches!(err, ComputeError::InvalidInput { slot: 0, .. }),
            "{} should fail on slot 0",
            math.kind()
        );
    }
}

proptest! {
    #[test]
    fn split_conserves_flow(
        q in 0.0_f64..500.0,
        p in -10.0_f64..100.0,
        r0 in prop::option::of(-10.0_f64..100.0),
        r1 in prop::option::of(-10.0_f64..100.0),
        loss in 0.0_f64..5.0,
    ) {
        let demand = [r0, r1];
        let out = Math::from(TeeSplit::default())
            .compute(&[DeviceData::new(q, p, 20.0)], loss, &ComputeContext::new(&demand))
            .unwrap();
        prop_assert!((out[0].flow + out[1].flow - q).abs() <= 1e-9 * q.max(1.0));
        prop_assert!(out[0].flow >= 0.0 && out[1].flow >= 0.0);
    }

    #[test]
    fn compute_is_idempotent(
        q in 0.0_f64..100.0,
        p in -50.0_f64..100.0,
        t in -20.0_f64..120.0,
        openness in 0.0_f64..1.0,
        loss in 0.0_f64..10.0,
    ) {
        let inlet = DeviceData::new(q, p, t);
        let second = DeviceData::new(q * 0.5, p - 1.0, t + 30.0);
        let demand = [Some(p - 3.0), Some(p - 1.0)];
        let ctx = ComputeContext::new(&demand);
        let cases: Vec<(Math, Vec<DeviceData>)> = vec![
            (Valve::new(openness).into(), vec![inlet]),
            (Pump::new(20.0).unwrap().with_target(p + 5.0).into(), vec![inlet]),
            (TeeSplit::default().into(), vec![inlet]),
            (TeeMerge.into(), vec![inlet, second]),
            (HeatExchanger::new(0.6).unwrap().into(), vec![inlet, second]),
        ];
        for (math, inputs) in cases {
            let a = math.compute(&inputs, loss, &ctx).unwrap();
            let b = math.compute(&inputs, loss, &ctx).unwrap();
            for (x, y) in a.iter().zip(&b) {
                prop_assert_eq!(x.flow.to_bits(), y.flow.to_bits());
                prop_assert_eq!(x.pressure.to_bits(), y.pressure.to_bits());
                prop_assert_eq!(x.temperature.to_bits(), y.temperature.to_bits());
            }
        }
    }
}
