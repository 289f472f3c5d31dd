//! pn-graph: device arena and topology for pipenet.
//!
//! Provides:
//! - Slots and devices (the per-device propagation contract)
//! - An incremental builder that validates topology before freezing it
//! - The evaluation order used by the solver (topological, cycles by id)
//!
//! # Example
//!
//! ```
//! use pn_core::DeviceData;
//! use pn_devices::{Consumer, Pipe, Pump};
//! use pn_graph::DeviceGraphBuilder;
//!
//! let mut builder = DeviceGraphBuilder::new();
//! let pump = builder.add_device("pump", Pump::new(50.0).unwrap());
//! let pipe = builder.add_device("pipe", Pipe);
//! let sink = builder.add_device("sink", Consumer::default());
//! builder.set_boundary(pump, 0, DeviceData::new(10.0, 0.0, 20.0));
//! builder.connect(pump, 0, pipe, 0);
//! builder.connect(pipe, 0, sink, 0);
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.len(), 3);
//! assert!(graph.is_acyclic());
//! ```

pub mod builder;
pub mod device;
pub mod error;
pub mod graph;
pub mod order;
pub mod slot;
pub(crate) mod validate;

pub use builder::DeviceGraphBuilder;
pub use device::Device;
pub use error::{GraphError, GraphResult, SlotSide};
pub use graph::{Connection, DeviceGraph};
pub use order::EvaluationOrder;
pub use slot::{PassStamp, SlotIn, SlotOut, SlotRef};
