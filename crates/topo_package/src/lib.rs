//! # topo_package
//!
//! Access to Visio diagram containers (`.vsdx`) for topo.
//!
//! A `.vsdx` file is a zip archive holding namespaced XML parts. This crate opens
//! the archive, exposes its entries by relative path, and extracts it under a
//! target root. It also picks the newest container out of an upload directory.
//!
//! ## Example
//!
//! ```rust,no_run
//! use topo_package::{uploads, VsdxPackage, PAGE_DESCRIPTOR};
//!
//! if let Some(selection) = uploads::latest_package("uploads").unwrap() {
//!     uploads::prune(&selection.older);
//!
//!     let mut package = VsdxPackage::open(&selection.latest).unwrap();
//!     let page = package.read_text(PAGE_DESCRIPTOR).unwrap();
//!     println!("page descriptor is {} bytes", page.len());
//!
//!     package.extract_to("extracted_vsdx").unwrap();
//! }
//! ```

pub mod error;
pub mod package;
pub mod uploads;

pub use error::{PackageError, PackageResult};
pub use package::{VsdxPackage, MASTER_DESCRIPTOR, PACKAGE_EXTENSION, PAGE_DESCRIPTOR};
pub use uploads::PackageSelection;
