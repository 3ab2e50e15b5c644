//! # topo_diagram
//!
//! Device name resolution for Visio network diagrams.
//!
//! A page descriptor lists shapes, each pointing at a stencil master by id.
//! The master descriptor gives every master a display name. Joining the two
//! yields one device name per shape: the master name with whitespace removed,
//! followed by the shape id (`Core Switch` + `12` → `CoreSwitch12`).
//!
//! Masters whose names contain `Rack Frame` or `Dynamic connector` are
//! decoration, not devices, and are dropped before the join.
//!
//! ## Example
//!
//! ```rust,no_run
//! use topo_diagram::DevicePipeline;
//!
//! let pipeline = DevicePipeline::visio().unwrap();
//! let devices = pipeline.run("extracted_vsdx", "machine_names.txt").unwrap();
//! println!("{} devices", devices.len());
//! ```

pub mod descriptor;
pub mod error;
pub mod exporter;
pub mod namespace;
pub mod pipeline;
pub mod resolver;

pub use descriptor::{Master, MasterFilter, Shape, EXCLUDED_MASTER_NAMES};
pub use error::{DiagramError, DiagramResult};
pub use exporter::{render, write_names};
pub use namespace::{ExpandedName, NamespaceTable, VISIO_NAMESPACE};
pub use pipeline::DevicePipeline;
pub use resolver::{resolve, DeviceSet, ReferenceResolver};
