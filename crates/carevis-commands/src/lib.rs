//! # Carevis Commands
//!
//! The dashboard's closed menu of six visualizations and the router that
//! answers a view request.
//!
//! A [`ViewRequest`] names one menu entry together with its filters. The
//! [`Router`] runs the matching aggregation over the shared dataset, hands
//! the result to a [`carevis_graphs::RenderSurface`], and turns an empty
//! result into a localized notice.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod menu;
pub mod request;
pub mod router;

pub use menu::Visualization;
pub use request::{Selection, ViewRequest};
pub use router::{Router, View};
