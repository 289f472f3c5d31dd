//! Two-stream heat exchanger.

use crate::common::{EPSILON_WEIGHT, input, through};
use crate::error::ComputeResult;
use crate::traits::{ComputeContext, DeviceMath};
use pn_core::numeric::ensure_fraction;
use pn_core::{DeviceData, Real};

/// Counter-flow heat exchanger with two independent paths.
///
/// Path 0 runs inlet 0 → outlet 0, path 1 runs inlet 1 → outlet 1. Both
/// streams are treated as the same fluid, so heat capacity rate is the flow:
///
/// ```text
/// duty = efficiency * min(Q0, Q1) * (T0 - T1)
/// T0'  = T0 - duty / Q0
/// T1'  = T1 + duty / Q1
/// ```
///
/// Flows are unchanged and both paths lose the device's pressure loss. A
/// stagnant side transfers nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatExchanger {
    /// Effectiveness in 0..1
    pub efficiency: Real,
}

impl HeatExchanger {
    pub fn new(efficiency: Real) -> ComputeResult<Self> {
        let efficiency = ensure_fraction(efficiency, "heat exchanger efficiency")?;
        Ok(Self { efficiency })
    }

    /// Heat moved from path 0 to path 1, in flow·°C.
    pub fn duty(&self, a: &DeviceData, b: &DeviceData) -> Real {
        let qa = a.flow.abs();
        let qb = b.flow.abs();
        if qa <= EPSILON_WEIGHT || qb <= EPSILON_WEIGHT {
            return 0.0;
        }
        self.efficiency * qa.min(qb) * (a.temperature - b.temperature)
    }
}

impl DeviceMath for HeatExchanger {
    fn inlets(&self) -> usize {
        2
    }

    fn outlets(&self) -> usize {
        2
    }

    fn compute(
        &self,
        inputs: &[DeviceData],
        pressure_loss: Real,
        _ctx: &ComputeContext<'_>,
    ) -> ComputeResult<Vec<DeviceData>> {
        let a = input(inputs, 0)?;
        let b = input(inputs, 1)?;
        let duty = self.duty(&a, &b);

        let (ta, tb) = if duty == 0.0 {
            (a.temperature, b.temperature)
        } else {
            (
                a.temperature - duty / a.flow.abs(),
                b.temperature + duty / b.flow.abs(),
            )
        };

        Ok(vec![
            a.with_temperature(ta)
                .with_pressure(a.pressure - pressure_loss),
            b.with_temperature(tb)
                .with_pressure(b.pressure - pressure_loss),
        ])
    }

    fn required_inlet(
        &self,
        outlet_demand: &[Option<Real>],
        pressure_loss: Real,
    ) -> Vec<Option<Real>> {
        (0..2)
            .map(|i| through(outlet_demand.get(i).copied().flatten(), pressure_loss))
            .collect()
    }
}
