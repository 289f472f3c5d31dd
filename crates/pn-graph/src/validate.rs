//! Topology validation run by the builder.

use std::collections::HashSet;

use pn_core::{DeviceData, DeviceId, SlotIndex};
use pn_devices::Math;

use crate::device::valid_boundary;
use crate::error::{GraphError, GraphResult, SlotSide};
use crate::graph::Connection;

/// Builder-side view of one device, enough to validate against.
pub(crate) struct DeviceShape<'a> {
    pub id: DeviceId,
    pub math: &'a Math,
    pub pressure_loss: f64,
}

fn shape<'a, 'b>(devices: &'b [DeviceShape<'a>], id: DeviceId) -> GraphResult<&'b DeviceShape<'a>> {
    devices
        .get(id.slot())
        .filter(|d| d.id == id)
        .ok_or(GraphError::UnknownDevice { device: id })
}

pub(crate) fn validate_devices(devices: &[DeviceShape<'_>]) -> GraphResult<()> {
    for d in devices {
        if !d.pressure_loss.is_finite() {
            return Err(GraphError::NonFiniteLoss { device: d.id });
        }
    }
    Ok(())
}

/// Every connection joins an existing outlet to an existing inlet of another
/// device, and no slot is used twice.
pub(crate) fn validate_connections(
    devices: &[DeviceShape<'_>],
    connections: &[Connection],
) -> GraphResult<()> {
    let mut used_out: HashSet<(DeviceId, SlotIndex)> = HashSet::new();
    let mut used_in: HashSet<(DeviceId, SlotIndex)> = HashSet::new();

    for c in connections {
        let from = shape(devices, c.from.device)?;
        let to = shape(devices, c.to.device)?;

        if c.from.slot >= from.math.outlets() {
            return Err(GraphError::SlotOutOfRange {
                device: from.id,
                side: SlotSide::Out,
                slot: c.from.slot,
            });
        }
        if c.to.slot >= to.math.inlets() {
            return Err(GraphError::SlotOutOfRange {
                device: to.id,
                side: SlotSide::In,
                slot: c.to.slot,
            });
        }
        if from.id == to.id {
            return Err(GraphError::SelfLoop { device: from.id });
        }
        if !used_out.insert((from.id, c.from.slot)) {
            return Err(GraphError::OutletTaken {
                device: from.id,
                slot: c.from.slot,
            });
        }
        if !used_in.insert((to.id, c.to.slot)) {
            return Err(GraphError::InletTaken {
                device: to.id,
                slot: c.to.slot,
            });
        }
    }
    Ok(())
}

/// Boundaries sit on existing, unconnected inlets and hold usable values.
pub(crate) fn validate_boundaries(
    devices: &[DeviceShape<'_>],
    connections: &[Connection],
    boundaries: &[(DeviceId, SlotIndex, DeviceData)],
) -> GraphResult<()> {
    for &(id, slot, data) in boundaries {
        let d = shape(devices, id)?;
        if slot >= d.math.inlets() {
            return Err(GraphError::SlotOutOfRange {
                device: id,
                side: SlotSide::In,
                slot,
            });
        }
        if connections
            .iter()
            .any(|c| c.to.device == id && c.to.slot == slot)
        {
            return Err(GraphError::BoundaryOnConnectedInlet { device: id, slot });
        }
        if !valid_boundary(&data) {
            return Err(GraphError::InvalidBoundary { device: id, slot });
        }
    }
    Ok(())
}

/// Parallel links point at another existing device of the same kind that
/// points back.
pub(crate) fn validate_parallel(
    devices: &[DeviceShape<'_>],
    parallel: &[Option<DeviceId>],
) -> GraphResult<()> {
    for (i, link) in parallel.iter().enumerate() {
        let Some(sibling) = *link else { continue };
        let device = DeviceId::from_index(i as u32);
        if sibling == device {
            return Err(GraphError::SelfParallel { device });
        }
        let a = shape(devices, device)?;
        let b = shape(devices, sibling)?;
        if parallel.get(sibling.slot()).copied().flatten() != Some(device) {
            return Err(GraphError::AsymmetricParallel { device, sibling });
        }
        if a.math.kind() != b.math.kind() {
            return Err(GraphError::ParallelKindMismatch {
                device,
                kind: a.math.kind(),
                sibling,
                sibling_kind: b.math.kind(),
            });
        }
    }
    Ok(())
}
