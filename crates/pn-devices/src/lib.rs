//! pn-devices: the math behind each device kind.
//!
//! Provides one model per kind of piping element:
//! - Pipe, Valve, Pump (single stream)
//! - TeeSplit / TeeMerge (branch points)
//! - HeatExchanger (two coupled streams)
//! - Consumer (sink)
//!
//! Every model implements [`DeviceMath`]. The closed [`Math`] enum is what the
//! graph stores and dispatches through. `compute` is a pure function of the
//! inputs, the device's pressure loss and the downstream demand, so running it
//! twice on the same arguments yields identical data.
//!
//! # Example
//!
//! ```
//! use pn_core::DeviceData;
//! use pn_devices::{ComputeContext, Math, Pipe};
//!
//! let pipe = Math::from(Pipe);
//! let out = pipe
//!     .compute(&[DeviceData::new(10.0, 50.0, 20.0)], 5.0, &ComputeContext::default())
//!     .unwrap();
//! assert_eq!(out[0].pressure, 45.0);
//! ```

pub mod common;
pub mod consumer;
pub mod error;
pub mod heat_exchanger;
pub mod math;
pub mod pipe;
pub mod pump;
pub mod tee;
pub mod traits;
pub mod valve;

pub use consumer::Consumer;
pub use error::{ComputeError, ComputeResult};
pub use heat_exchanger::HeatExchanger;
pub use math::{DeviceKind, Math};
pub use pipe::Pipe;
pub use pump::Pump;
pub use tee::{TeeMerge, TeeSplit};
pub use traits::{ComputeContext, DeviceMath};
pub use valve::{Valve, ValveLaw};
