//! The closed set of device models.

use core::fmt;

use crate::common::check_outputs;
use crate::consumer::Consumer;
use crate::error::ComputeResult;
use crate::heat_exchanger::HeatExchanger;
use crate::pipe::Pipe;
use crate::pump::Pump;
use crate::tee::{TeeMerge, TeeSplit};
use crate::traits::{ComputeContext, DeviceMath};
use crate::valve::Valve;
use pn_core::{DeviceData, Real};

/// Device kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceKind {
    Pipe,
    Valve,
    Pump,
    TeeSplit,
    TeeMerge,
    HeatExchanger,
    Consumer,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeviceKind::Pipe => "pipe",
            DeviceKind::Valve => "valve",
            DeviceKind::Pump => "pump",
            DeviceKind::TeeSplit => "tee-split",
            DeviceKind::TeeMerge => "tee-merge",
            DeviceKind::HeatExchanger => "heat-exchanger",
            DeviceKind::Consumer => "consumer",
        };
        f.write_str(s)
    }
}

/// A device's model, one variant per kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Math {
    Pipe(Pipe),
    Valve(Valve),
    Pump(Pump),
    TeeSplit(TeeSplit),
    TeeMerge(TeeMerge),
    HeatExchanger(HeatExchanger),
    Consumer(Consumer),
}

impl Math {
    pub fn kind(&self) -> DeviceKind {
        match self {
            Math::Pipe(_) => DeviceKind::Pipe,
            Math::Valve(_) => DeviceKind::Valve,
            Math::Pump(_) => DeviceKind::Pump,
            Math::TeeSplit(_) => DeviceKind::TeeSplit,
            Math::TeeMerge(_) => DeviceKind::TeeMerge,
            Math::HeatExchanger(_) => DeviceKind::HeatExchanger,
            Math::Consumer(_) => DeviceKind::Consumer,
        }
    }

    fn model(&self) -> &dyn DeviceMath {
        match self {
            Math::Pipe(m) => m,
            Math::Valve(m) => m,
            Math::Pump(m) => m,
            Math::TeeSplit(m) => m,
            Math::TeeMerge(m) => m,
            Math::HeatExchanger(m) => m,
            Math::Consumer(m) => m,
        }
    }

    pub fn inlets(&self) -> usize {
        self.model().inlets()
    }

    pub fn outlets(&self) -> usize {
        self.model().outlets()
    }

    /// Evaluate the model and reject non-finite results.
    pub fn compute(
        &self,
        inputs: &[DeviceData],
        pressure_loss: Real,
        ctx: &ComputeContext<'_>,
    ) -> ComputeResult<Vec<DeviceData>> {
        let outputs = self.model().compute(inputs, pressure_loss, ctx)?;
        check_outputs(&outputs)?;
        Ok(outputs)
    }

    pub fn required_inlet(
        &self,
        outlet_demand: &[Option<Real>],
        pressure_loss: Real,
    ) -> Vec<Option<Real>> {
        self.model().required_inlet(outlet_demand, pressure_loss)
    }

    pub fn as_valve_mut(&mut self) -> Option<&mut Valve> {
        match self {
            Math::Valve(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_pump_mut(&mut self) -> Option<&mut Pump> {
        match self {
            Math::Pump(p) => Some(p),
            _ => None,
        }
    }
}

macro_rules! impl_from_model {
    ($($ty:ident),*) => {
        $(impl From<$ty> for Math {
            fn from(m: $ty) -> Self {
                Math::$ty(m)
            }
        })*
    };
}

impl_from_model!(Pipe, Valve, Pump, TeeSplit, TeeMerge, HeatExchanger, Consumer);
