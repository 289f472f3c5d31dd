//! The physical payload exchanged between devices.

use crate::numeric::Real;
use crate::units::{self, Pressure, Temperature, VolumeRate};

/// Flow below this magnitude counts as "no flow" when mixing streams.
pub const EPSILON_FLOW: Real = 1e-12;

/// One stream state: flow, pressure and temperature.
///
/// Values are produced fresh by a device's math every pass and never mutated
/// after being sent. `valid == false` marks a slot that has not received a
/// usable value yet (cold start, or an upstream device that failed).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceData {
    /// Flow Q (m³/h)
    pub flow: Real,
    /// Gauge pressure (bar)
    pub pressure: Real,
    /// Temperature (°C)
    pub temperature: Real,
    pub valid: bool,
}

impl Default for DeviceData {
    fn default() -> Self {
        Self::invalid()
    }
}

impl DeviceData {
    pub const fn new(flow: Real, pressure: Real, temperature: Real) -> Self {
        Self {
            flow,
            pressure,
            temperature,
            valid: true,
        }
    }

    pub const fn invalid() -> Self {
        Self {
            flow: 0.0,
            pressure: 0.0,
            temperature: 0.0,
            valid: false,
        }
    }

    pub fn with_flow(self, flow: Real) -> Self {
        Self { flow, ..self }
    }

    pub fn with_pressure(self, pressure: Real) -> Self {
        Self { pressure, ..self }
    }

    pub fn with_temperature(self, temperature: Real) -> Self {
        Self {
            temperature,
            ..self
        }
    }

    /// Largest absolute channel difference against `other`.
    ///
    /// Two invalid values compare equal; a valid/invalid pair is infinitely
    /// far apart so it can never pass a convergence check.
    pub fn max_abs_diff(&self, other: &DeviceData) -> Real {
        match (self.valid, other.valid) {
            (false, false) => 0.0,
            (true, true) => (self.flow - other.flow)
                .abs()
                .max((self.pressure - other.pressure).abs())
                .max((self.temperature - other.temperature).abs()),
            _ => Real::INFINITY,
        }
    }

    /// Combine two streams into one.
    ///
    /// Flows add, temperature is flow-weighted (plain mean when neither side
    /// flows), pressure is the lower of the streams that actually carry flow.
    /// Invalid when either side is invalid.
    pub fn mix(a: &DeviceData, b: &DeviceData) -> DeviceData {
        if !a.valid || !b.valid {
            return DeviceData::invalid();
        }

        let flow = a.flow + b.flow;
        let temperature = if flow.abs() > EPSILON_FLOW {
            (a.flow * a.temperature + b.flow * b.temperature) / flow
        } else {
            0.5 * (a.temperature + b.temperature)
        };

        let a_flows = a.flow.abs() > EPSILON_FLOW;
        let b_flows = b.flow.abs() > EPSILON_FLOW;
        let pressure = match (a_flows, b_flows) {
            (true, false) => a.pressure,
            (false, true) => b.pressure,
            _ => a.pressure.min(b.pressure),
        };

        DeviceData::new(flow, pressure, temperature)
    }

    pub fn pressure_quantity(&self) -> Pressure {
        units::bar(self.pressure)
    }

    pub fn temperature_quantity(&self) -> Temperature {
        units::celsius(self.temperature)
    }

    pub fn flow_quantity(&self) -> VolumeRate {
        units::m3_per_h(self.flow)
    }
}
