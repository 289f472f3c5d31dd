//! Common helpers shared by device models.

use crate::error::{ComputeError, ComputeResult};
use pn_core::numeric::ensure_finite;
use pn_core::{DeviceData, Real};

/// Openness factor at or below which a valve counts as shut.
pub const EPSILON_OPEN: Real = 1e-9;

/// Weight sum below which a split falls back to its default ratio.
pub const EPSILON_WEIGHT: Real = 1e-12;

/// Fetch input `slot`, failing if it is missing or not yet valid.
pub fn input(inputs: &[DeviceData], slot: usize) -> ComputeResult<DeviceData> {
    let data = inputs.get(slot).copied().ok_or(ComputeError::InvalidInput {
        slot,
        what: "missing input",
    })?;
    if !data.valid {
        return Err(ComputeError::InvalidInput {
            slot,
            what: "not yet valid",
        });
    }
    Ok(data)
}

/// Reject outputs with non-finite channels.
pub fn check_outputs(outputs: &[DeviceData]) -> ComputeResult<()> {
    for out in outputs {
        ensure_finite(out.flow, "flow")?;
        ensure_finite(out.pressure, "pressure")?;
        ensure_finite(out.temperature, "temperature")?;
    }
    Ok(())
}

/// Demand seen through an element that loses `loss` bar.
pub fn through(demand: Option<Real>, loss: Real) -> Option<Real> {
    demand.map(|d| d + loss)
}
