//! Pump model.

use crate::common::input;
use crate::error::{ComputeError, ComputeResult};
use crate::traits::{ComputeContext, DeviceMath};
use pn_core::{DeviceData, Real};

/// Pump adding pressure to a stream.
///
/// ## Model
///
/// ```text
/// added = rise                              (no target)
/// added = clamp(target - p_in, 0, rise)     (pressure-regulating)
/// p_out = p_in + added - loss
/// ```
///
/// `rise` is the rated maximum head. Flow and temperature are unchanged.
/// A pump fed from a reservoir has its inlet left unconnected with a boundary
/// value, which makes it a source for the solver.
#[derive(Clone, Debug, PartialEq)]
pub struct Pump {
    /// Rated pressure rise (bar)
    pub rise: Real,
    /// Outlet set point before losses; `None` runs at full rise
    pub target_pressure: Option<Real>,
}

impl Pump {
    /// Create a pump with rated rise.
    ///
    /// # Errors
    /// Returns error if `rise` is negative or not finite.
    pub fn new(rise: Real) -> ComputeResult<Self> {
        validate_rise(rise)?;
        Ok(Self {
            rise,
            target_pressure: None,
        })
    }

    /// Regulate towards `target` instead of always applying full rise.
    pub fn with_target(mut self, target: Real) -> Self {
        self.target_pressure = Some(target);
        self
    }

    pub fn set_rise(&mut self, rise: Real) -> ComputeResult<()> {
        validate_rise(rise)?;
        self.rise = rise;
        Ok(())
    }

    /// Pressure actually added for a given inlet pressure.
    pub fn added(&self, p_in: Real) -> Real {
        match self.target_pressure {
            Some(target) => (target - p_in).clamp(0.0, self.rise),
            None => self.rise,
        }
    }
}

fn validate_rise(rise: Real) -> ComputeResult<()> {
    if !rise.is_finite() || rise < 0.0 {
        return Err(ComputeError::InvalidArg {
            what: "pump rise must be finite and non-negative",
        });
    }
    Ok(())
}

impl DeviceMath for Pump {
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
        let p_out = inlet.pressure + self.added(inlet.pressure) - pressure_loss;
        Ok(vec![inlet.with_pressure(p_out)])
    }

    fn required_inlet(
        &self,
        outlet_demand: &[Option<Real>],
        pressure_loss: Real,
    ) -> Vec<Option<Real>> {
        let demand = outlet_demand.first().copied().flatten();
        // Invert p_out = p_in + added(p_in) - loss for p_in.
        vec![demand.map(|d| {
            let before_loss = d + pressure_loss;
            match self.target_pressure {
                Some(target) if before_loss > target => before_loss,
                _ => before_loss - self.rise,
            }
        })]
    }
}
