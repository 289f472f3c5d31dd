//! Read-only views of a solved tick.

use pn_core::units::{Pressure, Temperature, VolumeRate};
use pn_core::{DeviceData, DeviceId, Real};
use pn_devices::DeviceKind;
use pn_graph::DeviceGraph;
use pn_solver::{Phase, SimulationState};
use serde::Serialize;
use uom::si::pressure::kilopascal;
use uom::si::thermodynamic_temperature::kelvin;
use uom::si::volume_rate::liter_per_second;

/// One device as readers see it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceReading {
    pub id: DeviceId,
    pub name: String,
    pub kind: DeviceKind,
    /// Device data (outlets mixed; a consumer's received input)
    pub data: DeviceData,
    /// Last value sent on each outlet
    pub outlets: Vec<DeviceData>,
    pub pressure_loss: Real,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_share: Option<Real>,
}

impl DeviceReading {
    pub fn pressure(&self) -> Pressure {
        self.data.pressure_quantity()
    }

    pub fn temperature(&self) -> Temperature {
        self.data.temperature_quantity()
    }

    pub fn flow(&self) -> VolumeRate {
        self.data.flow_quantity()
    }

    pub fn pressure_kpa(&self) -> Real {
        self.pressure().get::<kilopascal>()
    }

    pub fn temperature_kelvin(&self) -> Real {
        self.temperature().get::<kelvin>()
    }

    pub fn flow_liters_per_second(&self) -> Real {
        self.flow().get::<liter_per_second>()
    }

    /// `GetSlotOutData` for readers.
    pub fn slot_out(&self, slot: usize) -> Option<&DeviceData> {
        self.outlets.get(slot)
    }
}

/// Everything readers may observe about one tick.
///
/// Built only after a solve has finished, so no reading is ever taken from a
/// device mid-pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: Phase,
    pub converged: bool,
    pub iterations: usize,
    pub max_delta: Real,
    pub devices: Vec<DeviceReading>,
}

impl Snapshot {
    pub fn capture(graph: &DeviceGraph, state: &SimulationState) -> Self {
        let devices = graph
            .devices()
            .iter()
            .map(|d| DeviceReading {
                id: d.id(),
                name: d.name().to_string(),
                kind: d.kind(),
                data: d.device_data(),
                outlets: d.slots_out().iter().map(|s| *s.data()).collect(),
                pressure_loss: d.pressure_loss(),
                parallel_share: graph.parallel_share(d.id()),
            })
            .collect();
        Self {
            tick: state.tick,
            phase: state.phase,
            converged: state.converged,
            iterations: state.iteration_count,
            max_delta: state.max_delta,
            devices,
        }
    }

    pub fn device(&self, id: DeviceId) -> Option<&DeviceReading> {
        self.devices.iter().find(|r| r.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&DeviceReading> {
        self.devices.iter().find(|r| r.name == name)
    }
}
