//! Straight pipe section.

use crate::common::{input, through};
use crate::error::ComputeResult;
use crate::traits::{ComputeContext, DeviceMath};
use pn_core::{DeviceData, Real};

/// Adiabatic, incompressible pipe run.
///
/// Drops pressure by the device's pressure loss; flow and temperature pass
/// through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pipe;

impl DeviceMath for Pipe {
    fn inlets(&self) -> usize {
        1
    }

    fn outlets(&self) -> usize {
        1
    }

    fn compute(
        &self,
        inputs: &[DeviceData],
        pressure_loss: Real,
        _ctx: &ComputeContext<'_>,
    ) -> ComputeResult<Vec<DeviceData>> {
        let inlet = input(inputs, 0)?;
        Ok(vec![inlet.with_pressure(inlet.pressure - pressure_loss)])
    }

    fn required_inlet(
        &self,
        outlet_demand: &[Option<Real>],
        pressure_loss: Real,
    ) -> Vec<Option<Real>> {
        vec![through(outlet_demand.first().copied().flatten(), pressure_loss)]
    }
}
