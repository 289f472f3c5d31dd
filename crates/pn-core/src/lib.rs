//! pn-core: stable foundation for pipenet.
//!
//! Contains:
//! - data (the `DeviceData` payload exchanged between devices)
//! - units (uom readouts for engine units)
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for devices)
//! - error (shared error types)

pub mod data;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use data::DeviceData;
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
