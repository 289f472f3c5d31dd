//! Scenario validation logic.

use std::collections::{HashMap, HashSet};

use crate::schema::{BoundaryDef, ConnectionDef, DeviceDef, DeviceKindDef, Scenario};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Device '{device}' ({kind}) has no {side} slot {slot}")]
    SlotOutOfRange {
        device: String,
        kind: String,
        side: &'static str,
        slot: usize,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if let Err(err) = scenario.solver.validate() {
        return Err(ValidationError::InvalidValue {
            field: "solver".to_string(),
            value: format!(
                "max_iterations={}, convergence_epsilon={}",
                scenario.solver.max_iterations, scenario.solver.convergence_epsilon
            ),
            reason: err.to_string(),
        });
    }

    let mut devices: HashMap<&str, &DeviceDef> = HashMap::new();
    for device in &scenario.devices {
        if devices.insert(device.id.as_str(), device).is_some() {
            return Err(ValidationError::DuplicateId {
                id: device.id.clone(),
                context: "devices".to_string(),
            });
        }
        validate_device(device)?;
    }

    for device in &scenario.devices {
        if let Some(sibling) = &device.parallel {
            if !devices.contains_key(sibling.as_str()) {
                return Err(ValidationError::MissingReference {
                    id: sibling.clone(),
                    context: format!("parallel of device '{}'", device.id),
                });
            }
        }
    }

    let mut used_out = HashSet::new();
    let mut used_in = HashSet::new();
    for (i, conn) in scenario.connections.iter().enumerate() {
        validate_connection(i, conn, &devices)?;
        if !used_out.insert((conn.from.as_str(), conn.from_slot)) {
            return Err(ValidationError::DuplicateId {
                id: format!("{}.out{}", conn.from, conn.from_slot),
                context: "connections".to_string(),
            });
        }
        if !used_in.insert((conn.to.as_str(), conn.to_slot)) {
            return Err(ValidationError::DuplicateId {
                id: format!("{}.in{}", conn.to, conn.to_slot),
                context: "connections".to_string(),
            });
        }
    }

    Ok(())
}

fn validate_device(device: &DeviceDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("device '{}' {}", device.id, name);

    if device.id.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "device id".to_string(),
            value: format!("{:?}", device.id),
            reason: "must not be empty".to_string(),
        });
    }
    finite(&field("pressure_loss"), device.pressure_loss)?;

    match &device.kind {
        DeviceKindDef::Pipe | DeviceKindDef::TeeMerge => {}
        DeviceKindDef::Valve { openness, .. } => {
            fraction(&field("openness"), *openness)?;
        }
        DeviceKindDef::Pump {
            rise,
            target_pressure,
        } => {
            finite(&field("rise"), *rise)?;
            if *rise < 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: field("rise"),
                    value: rise.to_string(),
                    reason: "must be non-negative".to_string(),
                });
            }
            if let Some(target) = target_pressure {
                finite(&field("target_pressure"), *target)?;
            }
        }
        DeviceKindDef::TeeSplit { default_ratio } => {
            fraction(&field("default_ratio"), *default_ratio)?;
        }
        DeviceKindDef::HeatExchanger { efficiency } => {
            fraction(&field("efficiency"), *efficiency)?;
        }
        DeviceKindDef::Consumer { sink_pressure } => {
            finite(&field("sink_pressure"), *sink_pressure)?;
        }
    }

    let (inlets, _) = device.kind.slot_counts();
    let mut seen = HashSet::new();
    for boundary in &device.boundaries {
        validate_boundary(device, boundary, inlets)?;
        if !seen.insert(boundary.slot) {
            return Err(ValidationError::DuplicateId {
                id: format!("{}.in{}", device.id, boundary.slot),
                context: "boundaries".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_boundary(
    device: &DeviceDef,
    boundary: &BoundaryDef,
    inlets: usize,
) -> Result<(), ValidationError> {
    if boundary.slot >= inlets {
        return Err(ValidationError::SlotOutOfRange {
            device: device.id.clone(),
            kind: device.kind.type_name().to_string(),
            side: "inlet",
            slot: boundary.slot,
        });
    }
    let field = |name: &str| format!("device '{}' boundary {}", device.id, name);
    finite(&field("flow"), boundary.flow)?;
    finite(&field("pressure"), boundary.pressure)?;
    finite(&field("temperature"), boundary.temperature)?;
    Ok(())
}

fn validate_connection(
    index: usize,
    conn: &ConnectionDef,
    devices: &HashMap<&str, &DeviceDef>,
) -> Result<(), ValidationError> {
    let lookup = |id: &str, end: &str| {
        devices
            .get(id)
            .copied()
            .ok_or_else(|| ValidationError::MissingReference {
                id: id.to_string(),
                context: format!("connection {} {}", index, end),
            })
    };
    let from = lookup(&conn.from, "from")?;
    let to = lookup(&conn.to, "to")?;

    if conn.from_slot >= from.kind.slot_counts().1 {
        return Err(ValidationError::SlotOutOfRange {
            device: from.id.clone(),
            kind: from.kind.type_name().to_string(),
            side: "outlet",
            slot: conn.from_slot,
        });
    }
    if conn.to_slot >= to.kind.slot_counts().0 {
        return Err(ValidationError::SlotOutOfRange {
            device: to.id.clone(),
            kind: to.kind.type_name().to_string(),
            side: "inlet",
            slot: conn.to_slot,
        });
    }
    if from.id == to.id {
        return Err(ValidationError::InvalidValue {
            field: format!("connection {}", index),
            value: format!("{} -> {}", conn.from, conn.to),
            reason: "a device cannot feed itself".to_string(),
        });
    }
    if to.boundaries.iter().any(|b| b.slot == conn.to_slot) {
        return Err(ValidationError::InvalidValue {
            field: format!("connection {}", index),
            value: format!("{}.in{}", conn.to, conn.to_slot),
            reason: "inlet already has a boundary".to_string(),
        });
    }
    Ok(())
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite".to_string(),
        })
    }
}

fn fraction(field: &str, value: f64) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be between 0 and 1".to_string(),
        })
    }
}
