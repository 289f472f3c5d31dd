//! Topology and device-access errors.

use pn_core::{DeviceId, SlotIndex};
use pn_devices::{ComputeError, DeviceKind};
use thiserror::Error;

/// Which side of a device a slot sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSide {
    In,
    Out,
}

impl std::fmt::Display for SlotSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotSide::In => f.write_str("inlet"),
            SlotSide::Out => f.write_str("outlet"),
        }
    }
}

/// Graph construction and access errors.
///
/// Everything raised by `DeviceGraphBuilder::build` is a topology error: it
/// is fatal for the load and never reached while solving.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Device {device} does not exist")]
    UnknownDevice { device: DeviceId },

    #[error("Device {device} has no {side} slot {slot}")]
    SlotOutOfRange {
        device: DeviceId,
        side: SlotSide,
        slot: SlotIndex,
    },

    #[error("Outlet {slot} of device {device} is already connected")]
    OutletTaken { device: DeviceId, slot: SlotIndex },

    #[error("Inlet {slot} of device {device} is already connected")]
    InletTaken { device: DeviceId, slot: SlotIndex },

    #[error("Device {device} is connected to itself")]
    SelfLoop { device: DeviceId },

    #[error("Inlet {slot} of device {device} is connected and cannot take a boundary")]
    BoundaryOnConnectedInlet { device: DeviceId, slot: SlotIndex },

    #[error("Boundary on inlet {slot} of device {device} is not a valid finite value")]
    InvalidBoundary { device: DeviceId, slot: SlotIndex },

    #[error("Device {device} cannot be its own parallel sibling")]
    SelfParallel { device: DeviceId },

    #[error("Parallel link {device} -> {sibling} is not reciprocated")]
    AsymmetricParallel { device: DeviceId, sibling: DeviceId },

    #[error("Parallel siblings {device} ({kind}) and {sibling} ({sibling_kind}) differ in kind")]
    ParallelKindMismatch {
        device: DeviceId,
        kind: DeviceKind,
        sibling: DeviceId,
        sibling_kind: DeviceKind,
    },

    #[error("Pressure loss of device {device} is not finite")]
    NonFiniteLoss { device: DeviceId },

    #[error("Device {device} is a {actual}, expected a {expected}")]
    WrongKind {
        device: DeviceId,
        expected: DeviceKind,
        actual: DeviceKind,
    },

    #[error("Device parameter rejected: {0}")]
    Parameter(#[from] ComputeError),
}

pub type GraphResult<T> = Result<T, GraphError>;
