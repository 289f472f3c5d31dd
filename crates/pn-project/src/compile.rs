//! Turn a validated scenario into a runnable device graph.

use std::collections::BTreeMap;

use pn_core::{DeviceData, DeviceId};
use pn_devices::{Consumer, HeatExchanger, Math, Pipe, Pump, TeeMerge, TeeSplit, Valve, ValveLaw};
use pn_graph::{DeviceGraph, DeviceGraphBuilder};
use pn_solver::SolverConfig;

use crate::schema::{DeviceKindDef, Scenario, ValveLawDef};
use crate::validate::validate_scenario;
use crate::{ProjectError, ProjectResult};

/// A scenario ready to simulate.
#[derive(Debug, Clone)]
pub struct CompiledScenario {
    pub name: String,
    pub graph: DeviceGraph,
    pub config: SolverConfig,
    /// Scenario device id to graph id
    pub ids: BTreeMap<String, DeviceId>,
}

impl CompiledScenario {
    pub fn id(&self, name: &str) -> Option<DeviceId> {
        self.ids.get(name).copied()
    }
}

pub fn compile(scenario: &Scenario) -> ProjectResult<CompiledScenario> {
    validate_scenario(scenario)?;

    let mut builder = DeviceGraphBuilder::new();
    let mut ids = BTreeMap::new();

    for def in &scenario.devices {
        let id = builder.add_device(def.id.clone(), build_math(&def.kind)?);
        builder.set_pressure_loss(id, def.pressure_loss);
        for b in &def.boundaries {
            builder.set_boundary(
                id,
                b.slot,
                DeviceData::new(b.flow, b.pressure, b.temperature),
            );
        }
        ids.insert(def.id.clone(), id);
    }

    for def in &scenario.devices {
        if let Some(sibling) = &def.parallel {
            let (Some(&a), Some(&b)) = (ids.get(&def.id), ids.get(sibling)) else {
                continue;
            };
            builder.set_parallel(a, b);
        }
    }

    for conn in &scenario.connections {
        let (Some(&from), Some(&to)) = (ids.get(&conn.from), ids.get(&conn.to)) else {
            return Err(ProjectError::Compile {
                what: format!("unresolved connection {} -> {}", conn.from, conn.to),
            });
        };
        builder.connect(from, conn.from_slot, to, conn.to_slot);
    }

    Ok(CompiledScenario {
        name: scenario.name.clone(),
        graph: builder.build()?,
        config: scenario.solver,
        ids,
    })
}

fn build_math(kind: &DeviceKindDef) -> ProjectResult<Math> {
    let math: Math = match *kind {
        DeviceKindDef::Pipe => Pipe.into(),
        DeviceKindDef::Valve { openness, law } => Valve::new(openness)
            .with_law(match law {
                ValveLawDef::Linear => ValveLaw::Linear,
                ValveLawDef::Quadratic => ValveLaw::Quadratic,
            })
            .into(),
        DeviceKindDef::Pump {
            rise,
            target_pressure,
        } => {
            let pump = Pump::new(rise)?;
            match target_pressure {
                Some(target) => pump.with_target(target).into(),
                None => pump.into(),
            }
        }
        DeviceKindDef::TeeSplit { default_ratio } => TeeSplit::new(default_ratio)?.into(),
        DeviceKindDef::TeeMerge => TeeMerge.into(),
        DeviceKindDef::HeatExchanger { efficiency } => HeatExchanger::new(efficiency)?.into(),
        DeviceKindDef::Consumer { sink_pressure } => Consumer::new(sink_pressure)?.into(),
    };
    Ok(math)
}
