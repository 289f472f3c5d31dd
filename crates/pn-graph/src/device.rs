//! A device: slots, pressure loss and math.

use pn_core::{DeviceData, DeviceId, Real, SlotIndex};
use pn_devices::{ComputeError, ComputeResult, DeviceKind, Math};

use crate::error::{GraphError, GraphResult, SlotSide};
use crate::slot::{PassStamp, SlotIn, SlotOut, SlotRef};

/// One node of the device network.
///
/// Devices only ever touch their own slots. Delivering a sent value to the
/// downstream device is the graph's job, so a device is never re-entered
/// while it is being written to.
#[derive(Debug, Clone)]
pub struct Device {
    pub(crate) id: DeviceId,
    pub(crate) name: String,
    pub(crate) math: Math,
    pub(crate) slots_in: Vec<SlotIn>,
    pub(crate) slots_out: Vec<SlotOut>,
    pub(crate) pressure_loss: Real,
    pub(crate) parallel: Option<DeviceId>,
    /// Result of the latest evaluation
    pub(crate) data: DeviceData,
    /// Result of the evaluation before that
    pub(crate) previous: DeviceData,
}

impl Device {
    pub(crate) fn new(id: DeviceId, name: String, math: Math, pressure_loss: Real) -> Self {
        let slots_in = (0..math.inlets()).map(SlotIn::new).collect();
        let slots_out = (0..math.outlets()).map(SlotOut::new).collect();
        Self {
            id,
            name,
            math,
            slots_in,
            slots_out,
            pressure_loss,
            parallel: None,
            data: DeviceData::invalid(),
            previous: DeviceData::invalid(),
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DeviceKind {
        self.math.kind()
    }

    pub fn math(&self) -> &Math {
        &self.math
    }

    pub fn slots_in(&self) -> &[SlotIn] {
        &self.slots_in
    }

    pub fn slots_out(&self) -> &[SlotOut] {
        &self.slots_out
    }

    /// Most recent output. Multi-outlet devices report their outlets mixed
    /// into one stream; a consumer reports what it received.
    pub fn device_data(&self) -> DeviceData {
        self.data
    }

    /// Output of the evaluation before the latest one.
    pub fn previous_data(&self) -> DeviceData {
        self.previous
    }

    /// Largest channel change between the last two evaluations.
    pub fn delta(&self) -> Real {
        self.data.max_abs_diff(&self.previous)
    }

    pub fn slot_out_data(&self, slot: SlotIndex) -> Option<&DeviceData> {
        self.slots_out.get(slot).map(SlotOut::data)
    }

    pub fn slot_in_data(&self, slot: SlotIndex) -> Option<&DeviceData> {
        self.slots_in.get(slot).map(SlotIn::data)
    }

    /// Downstream inlet connected to outlet `slot`.
    pub fn slot_out_peer(&self, slot: SlotIndex) -> Option<SlotRef> {
        self.slots_out.get(slot).and_then(SlotOut::peer)
    }

    /// Upstream outlet connected to inlet `slot`.
    pub fn slot_in_peer(&self, slot: SlotIndex) -> Option<SlotRef> {
        self.slots_in.get(slot).and_then(SlotIn::peer)
    }

    pub fn pressure_loss(&self) -> Real {
        self.pressure_loss
    }

    pub fn set_pressure_loss(&mut self, loss: Real) -> GraphResult<()> {
        if !loss.is_finite() {
            return Err(GraphError::NonFiniteLoss { device: self.id });
        }
        self.pressure_loss = loss;
        Ok(())
    }

    /// Parallel sibling, if this device shares load with another.
    pub fn parallel(&self) -> Option<DeviceId> {
        self.parallel
    }

    /// A source has inlets and every one of them is a boundary.
    pub fn is_source(&self) -> bool {
        !self.slots_in.is_empty() && self.slots_in.iter().all(|s| s.boundary.is_some())
    }

    /// Store a value delivered to inlet `slot`. Does not re-evaluate.
    pub fn update_data(&mut self, data: DeviceData, slot: SlotIndex) -> GraphResult<()> {
        let id = self.id;
        let inlet = self
            .slots_in
            .get_mut(slot)
            .ok_or(GraphError::SlotOutOfRange {
                device: id,
                side: SlotSide::In,
                slot,
            })?;
        inlet.data = data;
        Ok(())
    }

    /// Write `data` to outlet `slot` and return where it must be delivered.
    pub(crate) fn record_sent(
        &mut self,
        data: DeviceData,
        slot: SlotIndex,
        stamp: PassStamp,
    ) -> GraphResult<Option<SlotRef>> {
        let id = self.id;
        let outlet = self
            .slots_out
            .get_mut(slot)
            .ok_or(GraphError::SlotOutOfRange {
                device: id,
                side: SlotSide::Out,
                slot,
            })?;
        outlet.data = data;
        outlet.stamp = Some(stamp);
        Ok(outlet.peer)
    }

    pub fn set_openness(&mut self, openness: Real) -> GraphResult<()> {
        let (id, actual) = (self.id, self.kind());
        let valve = self.math.as_valve_mut().ok_or(GraphError::WrongKind {
            device: id,
            expected: DeviceKind::Valve,
            actual,
        })?;
        valve.set_openness(openness)?;
        Ok(())
    }

    pub fn set_pump_rise(&mut self, rise: Real) -> GraphResult<()> {
        let (id, actual) = (self.id, self.kind());
        let pump = self.math.as_pump_mut().ok_or(GraphError::WrongKind {
            device: id,
            expected: DeviceKind::Pump,
            actual,
        })?;
        pump.set_rise(rise)?;
        Ok(())
    }

    /// Replace the boundary on an unconnected inlet.
    pub fn set_boundary(&mut self, slot: SlotIndex, data: DeviceData) -> GraphResult<()> {
        let id = self.id;
        let inlet = self
            .slots_in
            .get_mut(slot)
            .ok_or(GraphError::SlotOutOfRange {
                device: id,
                side: SlotSide::In,
                slot,
            })?;
        if inlet.peer.is_some() {
            return Err(GraphError::BoundaryOnConnectedInlet { device: id, slot });
        }
        if !valid_boundary(&data) {
            return Err(GraphError::InvalidBoundary { device: id, slot });
        }
        inlet.boundary = Some(data);
        Ok(())
    }

    /// Collect one value per inlet for the math.
    ///
    /// An inlet with neither an upstream peer nor a boundary can never be fed
    /// and is reported as invalid input. Validity of fed values is checked by
    /// the math itself.
    pub fn gather_inputs(&self) -> ComputeResult<Vec<DeviceData>> {
        self.slots_in
            .iter()
            .map(|s| {
                if s.peer.is_none() && s.boundary.is_none() {
                    Err(ComputeError::InvalidInput {
                        slot: s.index,
                        what: "unconnected",
                    })
                } else {
                    Ok(s.data)
                }
            })
            .collect()
    }

    /// Store an evaluation result as the device's current data.
    pub(crate) fn commit(&mut self, inputs: &[DeviceData], outputs: &[DeviceData]) {
        let data = match outputs {
            [] => inputs.first().copied().unwrap_or_default(),
            [single] => *single,
            [first, rest @ ..] => rest
                .iter()
                .fold(*first, |acc, out| DeviceData::mix(&acc, out)),
        };
        self.previous = self.data;
        self.data = data;
    }

    pub(crate) fn commit_invalid(&mut self) {
        self.previous = self.data;
        self.data = DeviceData::invalid();
    }

    pub(crate) fn seed_boundaries(&mut self) {
        for inlet in &mut self.slots_in {
            if let Some(boundary) = inlet.boundary {
                inlet.data = boundary;
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots_in.iter_mut().for_each(SlotIn::clear);
        self.slots_out.iter_mut().for_each(SlotOut::clear);
        self.data = DeviceData::invalid();
        self.previous = DeviceData::invalid();
    }
}

pub(crate) fn valid_boundary(data: &DeviceData) -> bool {
    data.valid && data.flow.is_finite() && data.pressure.is_finite() && data.temperature.is_finite()
}
