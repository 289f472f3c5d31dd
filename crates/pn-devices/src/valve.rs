//! Valve with openness control and opening laws.

use crate::common::{EPSILON_OPEN, input};
use crate::error::{ComputeError, ComputeResult};
use crate::traits::{ComputeContext, DeviceMath};
use pn_core::{DeviceData, Real};

/// Valve opening characteristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValveLaw {
    /// factor = openness
    #[default]
    Linear,
    /// factor = openness^2
    Quadratic,
}

/// Throttling valve.
///
/// With opening factor `f` (from openness and law):
/// - `f == 0`: shut. Output flow and pressure are zero, so nothing upstream
///   reaches the devices behind it. Temperature passes through.
/// - otherwise: flow scales by `f` and the pressure loss is `loss / f`, which
///   is exactly the base loss when fully open.
#[derive(Debug, Clone, PartialEq)]
pub struct Valve {
    /// Valve openness: 0.0 (closed) to 1.0 (fully open)
    pub openness: Real,
    pub law: ValveLaw,
}

impl Default for Valve {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Valve {
    /// Create a valve with linear law. Openness is clamped to 0..1.
    pub fn new(openness: Real) -> Self {
        Self {
            openness: clamp_openness(openness),
            law: ValveLaw::Linear,
        }
    }

    pub fn with_law(mut self, law: ValveLaw) -> Self {
        self.law = law;
        self
    }

    /// Set openness (clamped to 0..1). NaN is rejected.
    pub fn set_openness(&mut self, openness: Real) -> ComputeResult<()> {
        if openness.is_nan() {
            return Err(ComputeError::InvalidArg {
                what: "valve openness must be a number",
            });
        }
        self.openness = clamp_openness(openness);
        Ok(())
    }

    /// Opening factor in 0..1 after applying the law.
    pub fn factor(&self) -> Real {
        match self.law {
            ValveLaw::Linear => self.openness,
            ValveLaw::Quadratic => self.openness * self.openness,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.factor() <= EPSILON_OPEN
    }

    /// Pressure loss at the current opening.
    pub fn effective_loss(&self, base_loss: Real) -> Real {
        if self.is_closed() {
            Real::INFINITY
        } else {
            base_loss / self.factor()
        }
    }
}

fn clamp_openness(openness: Real) -> Real {
    if openness.is_nan() {
        0.0
    } else {
        openness.clamp(0.0, 1.0)
    }
}

impl DeviceMath for Valve {
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
        if self.is_closed() {
            return Ok(vec![DeviceData::new(0.0, 0.0, inlet.temperature)]);
        }
        let f = self.factor();
        Ok(vec![DeviceData::new(
            inlet.flow * f,
            inlet.pressure - self.effective_loss(pressure_loss),
            inlet.temperature,
        )])
    }

    fn required_inlet(
        &self,
        outlet_demand: &[Option<Real>],
        pressure_loss: Real,
    ) -> Vec<Option<Real>> {
        if self.is_closed() {
            return vec![Some(Real::INFINITY)];
        }
        let demand = outlet_demand.first().copied().flatten();
        vec![demand.map(|d| d + self.effective_loss(pressure_loss))]
    }
}
