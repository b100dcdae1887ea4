//! # Carevis Common
//!
//! Shared types, utilities, and common functionality for carevis.
//!
//! This crate provides the visit record model, the immutable dataset handle
//! and its CSV loader, the workspace error type, and logging bootstrap used
//! by every other crate in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod dataset;
pub mod error;
pub mod logging;
pub mod macros;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use dataset::{DatasetLoader, LoadReport, VisitDataset, REQUIRED_COLUMNS};
pub use error::{CarevisError, Result};
pub use logging::{init_default_logging, init_logging, LoggingConfig, LogFormat};
pub use types::*;
pub use utils::*;
