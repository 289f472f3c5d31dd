//! Core trait for device models.

use crate::error::ComputeResult;
use pn_core::{DeviceData, Real};

/// What a device knows about its surroundings while computing.
///
/// `outlet_demand[i]` is the pressure the device behind outlet `i` needs at
/// its inlet (from the demand sweep), `None` while unknown.
#[derive(Clone, Copy, Debug, Default)]
pub struct ComputeContext<'a> {
    pub outlet_demand: &'a [Option<Real>],
}

impl<'a> ComputeContext<'a> {
    pub fn new(outlet_demand: &'a [Option<Real>]) -> Self {
        Self { outlet_demand }
    }

    pub fn demand(&self, outlet: usize) -> Option<Real> {
        self.outlet_demand.get(outlet).copied().flatten()
    }
}

/// A device's physical model.
///
/// Implementations are deterministic: the result depends only on the
/// arguments and the model's parameters.
pub trait DeviceMath {
    /// Number of inlet slots.
    fn inlets(&self) -> usize;

    /// Number of outlet slots.
    fn outlets(&self) -> usize;

    /// Compute one output per outlet from one input per inlet.
    fn compute(
        &self,
        inputs: &[DeviceData],
        pressure_loss: Real,
        ctx: &ComputeContext<'_>,
    ) -> ComputeResult<Vec<DeviceData>>;

    /// Pressure required at each inlet, given what each outlet requires.
    fn required_inlet(&self, outlet_demand: &[Option<Real>], pressure_loss: Real)
    -> Vec<Option<Real>>;
}
