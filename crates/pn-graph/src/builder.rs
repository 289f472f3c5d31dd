//! Incremental graph builder.

use pn_core::{DeviceData, DeviceId, Real, SlotIndex};
use pn_devices::Math;

use crate::device::Device;
use crate::error::{GraphError, GraphResult};
use crate::graph::{Connection, DeviceGraph};
use crate::order::EvaluationOrder;
use crate::slot::SlotRef;
use crate::validate::{self, DeviceShape};

#[derive(Debug)]
struct PendingDevice {
    name: String,
    math: Math,
    pressure_loss: Real,
}

/// Builder for a device network.
///
/// Nothing is checked while adding; `build()` validates the whole topology
/// and freezes it into a [`DeviceGraph`].
#[derive(Debug, Default)]
pub struct DeviceGraphBuilder {
    devices: Vec<PendingDevice>,
    connections: Vec<Connection>,
    boundaries: Vec<(DeviceId, SlotIndex, DeviceData)>,
    parallel: Vec<(DeviceId, DeviceId)>,
}

impl DeviceGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device and return its id. Ids are handed out in insertion order.
    pub fn add_device(&mut self, name: impl Into<String>, math: impl Into<Math>) -> DeviceId {
        let id = DeviceId::from_index(self.devices.len() as u32);
        self.devices.push(PendingDevice {
            name: name.into(),
            math: math.into(),
            pressure_loss: 0.0,
        });
        id
    }

    /// Set the base pressure loss of a device. Unknown ids are ignored.
    pub fn set_pressure_loss(&mut self, id: DeviceId, loss: Real) {
        if let Some(d) = self.devices.get_mut(id.slot()) {
            d.pressure_loss = loss;
        }
    }

    /// Fix the condition on an inlet that will not be connected.
    pub fn set_boundary(&mut self, id: DeviceId, slot: SlotIndex, data: DeviceData) {
        self.boundaries.retain(|&(d, s, _)| (d, s) != (id, slot));
        self.boundaries.push((id, slot, data));
    }

    /// Connect outlet `out_slot` of `from` to inlet `in_slot` of `to`.
    pub fn connect(&mut self, from: DeviceId, out_slot: SlotIndex, to: DeviceId, in_slot: SlotIndex) {
        self.connections.push(Connection {
            from: SlotRef::new(from, out_slot),
            to: SlotRef::new(to, in_slot),
        });
    }

    /// Record a one-way parallel link. `build()` rejects links that are not
    /// reciprocated.
    pub fn set_parallel(&mut self, id: DeviceId, sibling: DeviceId) {
        self.parallel.retain(|&(d, _)| d != id);
        self.parallel.push((id, sibling));
    }

    /// Link two devices as parallel siblings in both directions.
    pub fn pair_parallel(&mut self, a: DeviceId, b: DeviceId) {
        self.set_parallel(a, b);
        self.set_parallel(b, a);
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Validate and freeze the network.
    pub fn build(self) -> GraphResult<DeviceGraph> {
        let count = self.devices.len();
        let links = self.parallel_links()?;

        {
            let shapes: Vec<DeviceShape<'_>> = self
                .devices
                .iter()
                .enumerate()
                .map(|(i, d)| DeviceShape {
                    id: DeviceId::from_index(i as u32),
                    math: &d.math,
                    pressure_loss: d.pressure_loss,
                })
                .collect();
            validate::validate_devices(&shapes)?;
            validate::validate_connections(&shapes, &self.connections)?;
            validate::validate_boundaries(&shapes, &self.connections, &self.boundaries)?;
            validate::validate_parallel(&shapes, &links)?;
        }

        let mut devices: Vec<Device> = self
            .devices
            .into_iter()
            .enumerate()
            .map(|(i, d)| {
                Device::new(
                    DeviceId::from_index(i as u32),
                    d.name,
                    d.math,
                    d.pressure_loss,
                )
            })
            .collect();

        for c in &self.connections {
            devices[c.from.device.slot()].slots_out[c.from.slot].peer = Some(c.to);
            devices[c.to.device.slot()].slots_in[c.to.slot].peer = Some(c.from);
        }
        for &(id, slot, data) in &self.boundaries {
            devices[id.slot()].slots_in[slot].boundary = Some(data);
        }
        for (device, link) in devices.iter_mut().zip(links) {
            device.parallel = link;
        }

        let order = EvaluationOrder::from_edges(
            count,
            self.connections.iter().map(|c| (c.from.device, c.to.device)),
        );

        Ok(DeviceGraph {
            devices,
            connections: self.connections,
            order,
        })
    }

    /// Per-device sibling table.
    fn parallel_links(&self) -> GraphResult<Vec<Option<DeviceId>>> {
        let mut links = vec![None; self.devices.len()];
        for &(id, sibling) in &self.parallel {
            let slot = links
                .get_mut(id.slot())
                .ok_or(GraphError::UnknownDevice { device: id })?;
            *slot = Some(sibling);
        }
        Ok(links)
    }
}
