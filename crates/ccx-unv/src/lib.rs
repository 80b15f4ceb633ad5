//! CalculiX `.inp` mesh to I-DEAS Universal (`.unv`) translation.
//!
//! ```rust,no_run
//! use ccx_unv::{convert, output_path_for};
//!
//! let report = convert("bracket.inp", output_path_for("bracket.inp"))?;
//! println!("{} elements written", report.elements_written);
//! # Ok::<(), ccx_unv::UnvError>(())
//! ```

pub mod connectivity;
pub mod convert;
pub mod element_types;
pub mod error;
pub mod report;
pub mod translate;
pub mod writer;

pub use connectivity::{ConnectivityFamily, remap_indices};
pub use convert::{convert, convert_mesh, output_path_for};
pub use element_types::{UnvElementType, calculix_type, classify, lookup};
pub use error::{Result, UnvError};
pub use report::ConversionReport;
pub use translate::{ElementRecord, SkippedElement, Translation, translate, unv_node_order};
pub use writer::{UnvWriter, format_exponential, write_unv};
