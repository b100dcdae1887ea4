//! # Carevis Dashboard
//!
//! Command-line front end of the healthcare visit dashboard.
//!
//! [`Dashboard`] loads the visit register once, lists the menu and the
//! selectable filter values, and writes the rendered views to the output
//! directory.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod error;

pub use app::*;
pub use error::*;
