//! Simulation session for device networks.
//!
//! Provides:
//! - A [`Simulation`] that owns a graph and solver state and advances one
//!   tick at a time
//! - A request queue: start/stop and parameter changes submitted at any time
//!   take effect at the start of the next tick
//! - Immutable [`Snapshot`]s published after every solved tick
//! - Gauge scales mapping a reading onto a needle angle

pub mod error;
pub mod gauge;
pub mod request;
pub mod session;
pub mod snapshot;

pub use error::{SimError, SimResult};
pub use gauge::{Channel, Gauge, GaugeScale};
pub use request::Request;
pub use session::{Simulation, TickOutcome};
pub use snapshot::{DeviceReading, Snapshot};
