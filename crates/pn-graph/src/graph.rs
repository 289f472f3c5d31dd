//! The device arena and the per-device propagation protocol.

use pn_core::data::EPSILON_FLOW;
use pn_core::{DeviceData, DeviceId, Real, SlotIndex};
use pn_devices::{ComputeContext, ComputeError};

use crate::device::Device;
use crate::error::{GraphError, GraphResult};
use crate::order::EvaluationOrder;
use crate::slot::{PassStamp, SlotRef};

/// One edge: an outlet of one device feeding an inlet of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    pub from: SlotRef,
    pub to: SlotRef,
}

/// A validated network of devices.
///
/// The graph owns every device; slots and parallel links are id lookups into
/// the arena. Topology is frozen by [`DeviceGraphBuilder::build`]; only
/// device parameters and slot data change afterwards.
///
/// [`DeviceGraphBuilder::build`]: crate::DeviceGraphBuilder::build
#[derive(Debug, Clone)]
pub struct DeviceGraph {
    pub(crate) devices: Vec<Device>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) order: EvaluationOrder,
}

impl DeviceGraph {
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(id.slot())
    }

    pub fn device_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        self.devices.get_mut(id.slot())
    }

    fn get(&self, id: DeviceId) -> GraphResult<&Device> {
        self.device(id)
            .ok_or(GraphError::UnknownDevice { device: id })
    }

    fn get_mut(&mut self, id: DeviceId) -> GraphResult<&mut Device> {
        self.device_mut(id)
            .ok_or(GraphError::UnknownDevice { device: id })
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn order(&self) -> &EvaluationOrder {
        &self.order
    }

    /// True when no device feeds back into itself through the network.
    pub fn is_acyclic(&self) -> bool {
        self.order.is_acyclic()
    }

    pub fn find_by_name(&self, name: &str) -> Option<DeviceId> {
        self.devices.iter().find(|d| d.name == name).map(|d| d.id)
    }

    /// Devices whose every inlet is a boundary.
    pub fn sources(&self) -> Vec<DeviceId> {
        self.devices
            .iter()
            .filter(|d| d.is_source())
            .map(|d| d.id)
            .collect()
    }

    /// Write `data` to an outlet and deliver it to the connected inlet.
    pub fn send(
        &mut self,
        id: DeviceId,
        slot: SlotIndex,
        data: DeviceData,
        stamp: PassStamp,
    ) -> GraphResult<()> {
        if let Some(peer) = self.get_mut(id)?.record_sent(data, slot, stamp)? {
            self.get_mut(peer.device)?.update_data(data, peer.slot)?;
        }
        Ok(())
    }

    /// Required pressure at each outlet of `id`, read from the inlet it feeds.
    pub fn outlet_demand(&self, id: DeviceId) -> Vec<Option<Real>> {
        let Some(device) = self.device(id) else {
            return Vec::new();
        };
        device
            .slots_out
            .iter()
            .map(|out| {
                out.peer.and_then(|peer| {
                    self.device(peer.device)
                        .and_then(|d| d.slots_in.get(peer.slot))
                        .and_then(|inlet| inlet.required_pressure)
                })
            })
            .collect()
    }

    /// Recompute the required pressure at each inlet of `id` from what its
    /// outlets currently require.
    pub fn refresh_demand(&mut self, id: DeviceId) -> GraphResult<()> {
        let demand = self.outlet_demand(id);
        let device = self.get_mut(id)?;
        let required = device.math.required_inlet(&demand, device.pressure_loss);
        for (i, inlet) in device.slots_in.iter_mut().enumerate() {
            inlet.required_pressure = required.get(i).copied().flatten();
        }
        Ok(())
    }

    /// Forget every inlet's required pressure.
    ///
    /// Run before each demand sweep: demand is rebuilt from the sinks on
    /// every pass, so an inlet fed around a loop reads as unknown instead of
    /// compounding its own previous value.
    pub fn clear_demand(&mut self) {
        for device in &mut self.devices {
            for inlet in &mut device.slots_in {
                inlet.required_pressure = None;
            }
        }
    }

    /// Compute one device from its inlets and send the results downstream.
    ///
    /// A device that cannot compute (unfed inlet, invalid input, non-finite
    /// result) is marked invalid and sends invalid data on every outlet; the
    /// reason is returned rather than raised so the pass can carry on.
    pub fn evaluate(
        &mut self,
        id: DeviceId,
        stamp: PassStamp,
    ) -> GraphResult<Option<ComputeError>> {
        let demand = self.outlet_demand(id);
        let device = self.get(id)?;
        let outlets = device.slots_out.len();
        let outcome = device.gather_inputs().and_then(|inputs| {
            let ctx = ComputeContext::new(&demand);
            let outputs = device.math.compute(&inputs, device.pressure_loss, &ctx)?;
            Ok((inputs, outputs))
        });

        match outcome {
            Ok((inputs, outputs)) => {
                self.get_mut(id)?.commit(&inputs, &outputs);
                for (slot, data) in outputs.into_iter().enumerate() {
                    self.send(id, slot, data, stamp)?;
                }
                Ok(None)
            }
            Err(err) => {
                self.get_mut(id)?.commit_invalid();
                for slot in 0..outlets {
                    self.send(id, slot, DeviceData::invalid(), stamp)?;
                }
                Ok(Some(err))
            }
        }
    }

    /// Largest change of any device between its last two evaluations.
    pub fn max_delta(&self) -> Real {
        self.devices
            .iter()
            .map(Device::delta)
            .fold(0.0, Real::max)
    }

    /// Number of devices whose latest data is invalid.
    pub fn invalid_count(&self) -> usize {
        self.devices.iter().filter(|d| !d.data.valid).count()
    }

    /// Forget every slot value and device result (cold start).
    pub fn reset(&mut self) {
        self.devices.iter_mut().for_each(Device::clear);
    }

    /// Copy boundary conditions into their inlets.
    pub fn seed_boundaries(&mut self) {
        self.devices.iter_mut().for_each(Device::seed_boundaries);
    }

    /// Fraction of a parallel pair's combined flow carried by `id`.
    ///
    /// `None` when the device has no sibling, either side is invalid, or the
    /// pair carries no flow.
    pub fn parallel_share(&self, id: DeviceId) -> Option<Real> {
        let device = self.device(id)?;
        let sibling = self.device(device.parallel?)?;
        if !device.data.valid || !sibling.data.valid {
            return None;
        }
        let own = device.data.flow.abs();
        let total = own + sibling.data.flow.abs();
        (total > EPSILON_FLOW).then(|| own / total)
    }

    pub fn set_openness(&mut self, id: DeviceId, openness: Real) -> GraphResult<()> {
        self.get_mut(id)?.set_openness(openness)
    }

    pub fn set_pump_rise(&mut self, id: DeviceId, rise: Real) -> GraphResult<()> {
        self.get_mut(id)?.set_pump_rise(rise)
    }

    pub fn set_pressure_loss(&mut self, id: DeviceId, loss: Real) -> GraphResult<()> {
        self.get_mut(id)?.set_pressure_loss(loss)
    }

    pub fn set_boundary(
        &mut self,
        id: DeviceId,
        slot: SlotIndex,
        data: DeviceData,
    ) -> GraphResult<()> {
        self.get_mut(id)?.set_boundary(slot, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeviceGraphBuilder;
    use pn_devices::{Consumer, Pipe, Pump};

    const STAMP: PassStamp = PassStamp {
        tick: 1,
        iteration: 0,
    };

    fn pump_pipe() -> (DeviceGraph, DeviceId, DeviceId) {
        let mut b = DeviceGraphBuilder::new();
        let pump = b.add_device("pump", Pump::new(50.0).unwrap());
        let pipe = b.add_device("pipe", Pipe);
        b.set_pressure_loss(pipe, 5.0);
        b.set_boundary(pump, 0, DeviceData::new(10.0, 0.0, 20.0));
        b.connect(pump, 0, pipe, 0);
        (b.build().unwrap(), pump, pipe)
    }

    #[test]
    fn send_stamps_outlet_and_fills_peer() {
        let (mut g, pump, pipe) = pump_pipe();
        g.send(pump, 0, DeviceData::new(1.0, 2.0, 3.0), STAMP).unwrap();
        let out = &g.device(pump).unwrap().slots_out()[0];
        assert_eq!(out.stamp(), Some(STAMP));
        assert_eq!(
            g.device(pipe).unwrap().slot_in_data(0),
            Some(&DeviceData::new(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn evaluate_chain_in_order() {
        let (mut g, pump, pipe) = pump_pipe();
        g.seed_boundaries();
        assert!(g.evaluate(pump, STAMP).unwrap().is_none());
        assert!(g.evaluate(pipe, STAMP).unwrap().is_none());
        assert_eq!(g.device(pipe).unwrap().device_data(), DeviceData::new(10.0, 45.0, 20.0));
        assert_eq!(g.invalid_count(), 0);
    }

    #[test]
    fn evaluate_without_input_marks_invalid() {
        let (mut g, _pump, pipe) = pump_pipe();
        let err = g.evaluate(pipe, STAMP).unwrap();
        assert!(matches!(err, Some(ComputeError::InvalidInput { .. })));
        assert!(!g.device(pipe).unwrap().device_data().valid);
    }

    #[test]
    fn demand_flows_upstream() {
        let mut b = DeviceGraphBuilder::new();
        let pipe = b.add_device("pipe", Pipe);
        let sink = b.add_device("sink", Consumer::new(2.0).unwrap());
        b.set_pressure_loss(pipe, 3.0);
        b.connect(pipe, 0, sink, 0);
        let mut g = b.build().unwrap();

        g.refresh_demand(sink).unwrap();
        assert_eq!(g.outlet_demand(pipe), vec![Some(2.0)]);
        g.refresh_demand(pipe).unwrap();
        assert_eq!(g.device(pipe).unwrap().slots_in()[0].required_pressure(), Some(5.0));

        g.clear_demand();
        assert_eq!(g.outlet_demand(pipe), vec![None]);
    }

    #[test]
    fn reset_clears_results() {
        let (mut g, pump, _) = pump_pipe();
        g.seed_boundaries();
        g.evaluate(pump, STAMP).unwrap();
        g.reset();
        assert!(!g.device(pump).unwrap().device_data().valid);
        assert!(!g.device(pump).unwrap().slot_in_data(0).unwrap().valid);
        assert_eq!(g.max_delta(), 0.0);
    }

    #[test]
    fn lookup_by_name() {
        let (g, pump, _) = pump_pipe();
        assert_eq!(g.find_by_name("pump"), Some(pump));
        assert_eq!(g.find_by_name("nope"), None);
        assert_eq!(g.sources(), vec![pump]);
    }
}
