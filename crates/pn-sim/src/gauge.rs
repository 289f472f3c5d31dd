//! Gauges: map one channel of a reading onto a needle angle.

use pn_core::{DeviceData, Real};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Which quantity a gauge shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Flow,
    Pressure,
    Temperature,
}

impl Channel {
    pub fn read(self, data: &DeviceData) -> Real {
        match self {
            Channel::Flow => data.flow,
            Channel::Pressure => data.pressure,
            Channel::Temperature => data.temperature,
        }
    }
}

/// Mapping from a value to a dial fraction in 0..1.
///
/// Values outside `min..max` pin to the ends of the dial. The exponential
/// scale spreads the low end (`base > 1`) or the high end (`base < 1`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GaugeScale {
    Linear { min: Real, max: Real },
    Exponential { min: Real, max: Real, base: Real },
}

impl GaugeScale {
    pub fn linear(min: Real, max: Real) -> SimResult<Self> {
        check_range(min, max)?;
        Ok(GaugeScale::Linear { min, max })
    }

    pub fn exponential(min: Real, max: Real, base: Real) -> SimResult<Self> {
        check_range(min, max)?;
        if !base.is_finite() || base <= 0.0 || base == 1.0 {
            return Err(SimError::InvalidArg {
                what: "exponential gauge base must be positive and not 1",
            });
        }
        Ok(GaugeScale::Exponential { min, max, base })
    }

    /// Dial fraction for `value`. NaN reads as the bottom of the dial.
    pub fn fraction(&self, value: Real) -> Real {
        let (min, max) = match *self {
            GaugeScale::Linear { min, max } | GaugeScale::Exponential { min, max, .. } => {
                (min, max)
            }
        };
        let t = if value.is_nan() {
            0.0
        } else {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        };
        match *self {
            GaugeScale::Linear { .. } => t,
            GaugeScale::Exponential { base, .. } => (base.powf(t) - 1.0) / (base - 1.0),
        }
    }
}

fn check_range(min: Real, max: Real) -> SimResult<()> {
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(SimError::InvalidArg {
            what: "gauge range must be finite with min < max",
        });
    }
    Ok(())
}

/// A dial reading one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub channel: Channel,
    pub scale: GaugeScale,
    /// Needle angle at the bottom of the scale (degrees)
    pub min_angle: Real,
    /// Needle angle at the top of the scale (degrees)
    pub max_angle: Real,
}

impl Gauge {
    pub fn new(channel: Channel, scale: GaugeScale) -> Self {
        Self {
            channel,
            scale,
            min_angle: -135.0,
            max_angle: 135.0,
        }
    }

    pub fn with_sweep(mut self, min_angle: Real, max_angle: Real) -> Self {
        self.min_angle = min_angle;
        self.max_angle = max_angle;
        self
    }

    /// Needle angle for a reading; `None` while the data is not valid.
    pub fn angle(&self, data: &DeviceData) -> Option<Real> {
        if !data.valid {
            return None;
        }
        let f = self.scale.fraction(self.channel.read(data));
        Some(self.min_angle + f * (self.max_angle - self.min_angle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn linear_midpoint() {
        let g = Gauge::new(Channel::Pressure, GaugeScale::linear(0.0, 10.0).unwrap());
        assert_eq!(g.angle(&DeviceData::new(1.0, 5.0, 20.0)), Some(0.0));
        assert_eq!(g.angle(&DeviceData::new(1.0, 50.0, 20.0)), Some(135.0));
        assert_eq!(g.angle(&DeviceData::invalid()), None);
    }

    #[test]
    fn exponential_ends_are_pinned() {
        let s = GaugeScale::exponential(0.0, 100.0, 10.0).unwrap();
        assert_eq!(s.fraction(0.0), 0.0);
        assert!((s.fraction(100.0) - 1.0).abs() < 1e-12);
        // Low end spread out.
        assert!(s.fraction(50.0) < 0.5);
    }

    #[test]
    fn bad_scales_rejected() {
        assert!(GaugeScale::linear(1.0, 1.0).is_err());
        assert!(GaugeScale::linear(0.0, f64::INFINITY).is_err());
        assert!(GaugeScale::exponential(0.0, 1.0, 1.0).is_err());
        assert!(GaugeScale::exponential(0.0, 1.0, -2.0).is_err());
    }

    #[test]
    fn temperature_channel_with_custom_sweep() {
        let g = Gauge::new(Channel::Temperature, GaugeScale::linear(0.0, 100.0).unwrap())
            .with_sweep(0.0, 270.0);
        let angle = g.angle(&DeviceData::new(0.0, 0.0, 40.0)).unwrap();
        assert!((angle - 108.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn fraction_is_clamped_and_monotonic(
            a in -1e3_f64..1e3,
            b in -1e3_f64..1e3,
            base in prop_oneof![0.05_f64..0.95, 1.05_f64..50.0],
            exponential in any::<bool>(),
        ) {
            let scale = if exponential {
                GaugeScale::exponential(-100.0, 400.0, base).unwrap()
            } else {
                GaugeScale::linear(-100.0, 400.0).unwrap()
            };
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (fl, fh) = (scale.fraction(lo), scale.fraction(hi));
            prop_assert!((0.0..=1.0 + 1e-12).contains(&fl));
            prop_assert!((0.0..=1.0 + 1e-12).contains(&fh));
            prop_assert!(fl <= fh + 1e-12);
        }
    }
}
