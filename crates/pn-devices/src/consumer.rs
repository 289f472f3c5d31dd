//! Flow sink at the end of a branch.

use crate::common::input;
use crate::error::{ComputeError, ComputeResult};
use crate::traits::{ComputeContext, DeviceMath};
use pn_core::{DeviceData, Real};

/// Terminal consumer.
///
/// Has no outlet; its device data is whatever it last received. Its demand
/// signal is `sink_pressure`: the pressure it needs at its inlet to take the
/// stream, fed upstream to shape tee splits on the next evaluation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Consumer {
    pub sink_pressure: Real,
}

impl Consumer {
    pub fn new(sink_pressure: Real) -> ComputeResult<Self> {
        if !sink_pressure.is_finite() {
            return Err(ComputeError::InvalidArg {
                what: "sink pressure must be finite",
            });
        }
        Ok(Self { sink_pressure })
    }
}

impl DeviceMath for Consumer {
    fn inlets(&self) -> usize {
        1
    }

    fn outlets(&self) -> usize {
        0
    }

    fn compute(
        &self,
        inputs: &[DeviceData],
        _pressure_loss: Real,
        _ctx: &ComputeContext<'_>,
    ) -> ComputeResult<Vec<DeviceData>> {
        input(inputs, 0)?;
        Ok(Vec::new())
    }

    fn required_inlet(
        &self,
        _outlet_demand: &[Option<Real>],
        _pressure_loss: Real,
    ) -> Vec<Option<Real>> {
        vec![Some(self.sink_pressure)]
    }
}
