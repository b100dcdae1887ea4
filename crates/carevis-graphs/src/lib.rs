//! # Carevis Graphs
//!
//! Visit aggregations and chart rendering for carevis.
//!
//! The [`aggregator`] module turns a [`carevis_common::VisitDataset`] into
//! plain result tables. Chart builders turn those tables into backend-free
//! descriptions, and a [`RenderSurface`] draws the descriptions into PNG
//! images. [`PlottersSurface`] is the bundled surface.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod bar_chart;
pub mod clinic_map;
pub mod histogram;
pub mod renderer;
pub mod season;
pub mod traits;
pub mod types;

pub use aggregator::*;
pub use bar_chart::{average_age_chart, family_services_chart, seasonal_services_chart, service_sex_chart};
pub use clinic_map::{clinic_map_chart, marker_geojson};
pub use histogram::age_histogram_chart;
pub use renderer::PlottersSurface;
pub use season::Season;
pub use traits::*;
pub use types::*;
