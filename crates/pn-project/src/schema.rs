//! Scenario schema definitions.

use pn_solver::SolverConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub devices: Vec<DeviceDef>,
    #[serde(default)]
    pub connections: Vec<ConnectionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceDef {
    pub id: String,
    pub kind: DeviceKindDef,
    #[serde(default)]
    pub pressure_loss: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub boundaries: Vec<BoundaryDef>,
    /// Id of the parallel sibling; both sides must name each other
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DeviceKindDef {
    Pipe,
    Valve {
        openness: f64,
        #[serde(default)]
        law: ValveLawDef,
    },
    Pump {
        rise: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_pressure: Option<f64>,
    },
    TeeSplit {
        #[serde(default = "default_split_ratio")]
        default_ratio: f64,
    },
    TeeMerge,
    HeatExchanger {
        efficiency: f64,
    },
    Consumer {
        #[serde(default)]
        sink_pressure: f64,
    },
}

fn default_split_ratio() -> f64 {
    0.5
}

impl DeviceKindDef {
    /// (inlets, outlets)
    pub fn slot_counts(&self) -> (usize, usize) {
        match self {
            DeviceKindDef::Pipe | DeviceKindDef::Valve { .. } | DeviceKindDef::Pump { .. } => {
                (1, 1)
            }
            DeviceKindDef::TeeSplit { .. } => (1, 2),
            DeviceKindDef::TeeMerge => (2, 1),
            DeviceKindDef::HeatExchanger { .. } => (2, 2),
            DeviceKindDef::Consumer { .. } => (1, 0),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            DeviceKindDef::Pipe => "Pipe",
            DeviceKindDef::Valve { .. } => "Valve",
            DeviceKindDef::Pump { .. } => "Pump",
            DeviceKindDef::TeeSplit { .. } => "TeeSplit",
            DeviceKindDef::TeeMerge => "TeeMerge",
            DeviceKindDef::HeatExchanger { .. } => "HeatExchanger",
            DeviceKindDef::Consumer { .. } => "Consumer",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValveLawDef {
    #[default]
    Linear,
    Quadratic,
}

/// Fixed condition on an unconnected inlet (bar, °C, m³/h).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundaryDef {
    #[serde(default)]
    pub slot: usize,
    pub flow: f64,
    pub pressure: f64,
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionDef {
    pub from: String,
    #[serde(default)]
    pub from_slot: usize,
    pub to: String,
    #[serde(default)]
    pub to_slot: usize,
}
