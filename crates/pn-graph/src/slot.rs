//! Connection endpoints.

use pn_core::{DeviceData, DeviceId, Real, SlotIndex};

/// Address of one slot on one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub device: DeviceId,
    pub slot: SlotIndex,
}

impl SlotRef {
    pub fn new(device: DeviceId, slot: SlotIndex) -> Self {
        Self { device, slot }
    }
}

/// When a value was sent: simulation tick and pass within that tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PassStamp {
    pub tick: u64,
    pub iteration: usize,
}

/// Inlet endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotIn {
    pub(crate) index: SlotIndex,
    /// Upstream outlet feeding this inlet
    pub(crate) peer: Option<SlotRef>,
    /// Most recently received value
    pub(crate) data: DeviceData,
    /// Fixed reservoir condition for an unconnected inlet
    pub(crate) boundary: Option<DeviceData>,
    /// Pressure this inlet needs to accept the stream (demand sweep)
    pub(crate) required_pressure: Option<Real>,
}

impl SlotIn {
    pub(crate) fn new(index: SlotIndex) -> Self {
        Self {
            index,
            peer: None,
            data: DeviceData::invalid(),
            boundary: None,
            required_pressure: None,
        }
    }

    pub fn index(&self) -> SlotIndex {
        self.index
    }

    pub fn peer(&self) -> Option<SlotRef> {
        self.peer
    }

    pub fn data(&self) -> &DeviceData {
        &self.data
    }

    pub fn boundary(&self) -> Option<&DeviceData> {
        self.boundary.as_ref()
    }

    pub fn required_pressure(&self) -> Option<Real> {
        self.required_pressure
    }

    pub fn is_connected(&self) -> bool {
        self.peer.is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.data = DeviceData::invalid();
        self.required_pressure = None;
    }
}

/// Outlet endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotOut {
    pub(crate) index: SlotIndex,
    /// Downstream inlet fed by this outlet
    pub(crate) peer: Option<SlotRef>,
    /// Most recently sent value
    pub(crate) data: DeviceData,
    pub(crate) stamp: Option<PassStamp>,
}

impl SlotOut {
    pub(crate) fn new(index: SlotIndex) -> Self {
        Self {
            index,
            peer: None,
            data: DeviceData::invalid(),
            stamp: None,
        }
    }

    pub fn index(&self) -> SlotIndex {
        self.index
    }

    pub fn peer(&self) -> Option<SlotRef> {
        self.peer
    }

    pub fn data(&self) -> &DeviceData {
        &self.data
    }

    /// Pass in which this outlet was last written.
    pub fn stamp(&self) -> Option<PassStamp> {
        self.stamp
    }

    pub fn is_connected(&self) -> bool {
        self.peer.is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.data = DeviceData::invalid();
        self.stamp = None;
    }
}
