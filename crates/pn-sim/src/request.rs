//! Requests queued against a running simulation.

use pn_core::{DeviceData, DeviceId, Real, SlotIndex};

/// A change submitted from outside the solve.
///
/// Requests are applied in submission order at the start of the next tick,
/// never during a solve.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Begin solving on every tick. Starting a stopped simulation is a cold
    /// start.
    Start,
    /// Stop solving; the last snapshot stays published.
    Stop,
    SetOpenness { device: DeviceId, openness: Real },
    SetPressureLoss { device: DeviceId, loss: Real },
    SetPumpRise { device: DeviceId, rise: Real },
    SetBoundary {
        device: DeviceId,
        slot: SlotIndex,
        data: DeviceData,
    },
}

impl Request {
    /// Device the request targets, if any.
    pub fn device(&self) -> Option<DeviceId> {
        match self {
            Request::Start | Request::Stop => None,
            Request::SetOpenness { device, .. }
            | Request::SetPressureLoss { device, .. }
            | Request::SetPumpRise { device, .. }
            | Request::SetBoundary { device, .. } => Some(*device),
        }
    }
}
