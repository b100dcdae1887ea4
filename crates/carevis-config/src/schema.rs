//! Configuration schema definitions.
//!
//! Every section is `#[serde(default)]`, so a configuration file only needs
//! to name the values it changes.

use carevis_common::{ClinicDirectory, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for carevis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Visit dataset source.
    pub data: DataConfig,
    /// Clinics that take part in the location view.
    pub clinics: ClinicDirectory,
    /// Location view settings.
    pub map: MapConfig,
    /// Family selector settings.
    pub family: FamilyConfig,
    /// Chart sizing and styling.
    pub charts: ChartsConfig,
    /// Where rendered views are written.
    pub output: OutputConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Locale used for labels and notices, e.g. `en-US`.
    pub locale: String,
}

/// Visit dataset source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the CSV export of the visit register.
    pub path: PathBuf,
}

/// Location view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Latitude of the initial viewport center.
    pub center_latitude: f64,
    /// Longitude of the initial viewport center.
    pub center_longitude: f64,
    /// Slippy-map style zoom level of the initial viewport.
    pub zoom: u8,
    /// Latitude step between markers of the same clinic.
    pub marker_offset: f64,
    /// Services shown per clinic.
    pub top_services: usize,
}

/// Family selector settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyConfig {
    /// Smallest selectable family number.
    pub min: u32,
    /// Largest selectable family number.
    pub max: u32,
    /// Services shown for the selected family.
    pub top_services: usize,
}

/// Chart sizing and styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Services shown per season.
    pub top_services: usize,
    /// Number of histogram bins in the age distribution.
    pub histogram_bins: usize,
    /// Category labels longer than this are truncated.
    pub label_max_chars: usize,
    /// Whether to draw a background grid.
    pub show_grid: bool,
    /// Color configuration.
    pub colors: ColorsConfig,
}

/// Color configuration, as `#rrggbb` hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    /// Chart background.
    pub background: String,
    /// Titles, labels and axes.
    pub text: String,
    /// Series colors, cycled in order.
    pub palette: Vec<String>,
    /// Histogram bars.
    pub histogram: String,
    /// Density curve.
    pub density: String,
    /// Map markers.
    pub marker: String,
}

/// Where rendered views are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory, created on demand.
    pub directory: PathBuf,
    /// Whether the location view also writes a GeoJSON file.
    pub write_geojson: bool,
}

impl FamilyConfig {
    /// Whether the family number is selectable.
    pub const fn contains(&self, family_number: u32) -> bool {
        family_number >= self.min && family_number <= self.max
    }
}
