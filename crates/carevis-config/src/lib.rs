//! # Carevis Config
//!
//! Type-safe configuration management for carevis.
//!
//! This crate provides the configuration schema with its defaults, a loader
//! for YAML and TOML files with `CAREVIS_*` environment overrides, and the
//! validator run before any view is produced.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
