//! Chart descriptions handed to a [`RenderSurface`](crate::RenderSurface).
//!
//! These are plain data: the aggregation results reshaped into categories,
//! series, bins and markers, plus the localized text and the styling taken
//! from the configuration. No drawing happens here.

use carevis_config::{ChartsConfig, ColorsConfig};
use serde::Serialize;

/// Styling shared by every chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartStyle {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Whether to draw the background grid
    pub show_grid: bool,
    /// Category labels are truncated to this many characters
    pub label_max_chars: usize,
    /// Colors as `#rrggbb`
    pub colors: ColorsConfig,
}

impl From<&ChartsConfig> for ChartStyle {
    fn from(config: &ChartsConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            show_grid: config.show_grid,
            label_max_chars: config.label_max_chars,
            colors: config.colors.clone(),
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from(&ChartsConfig::default())
    }
}

/// Localized text of a chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartLabels {
    /// Caption
    pub title: String,
    /// Horizontal axis description
    pub x_label: String,
    /// Vertical axis description
    pub y_label: String,
}

impl ChartLabels {
    /// Creates chart labels.
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
        }
    }
}

/// Direction the bars grow in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    /// Categories on the vertical axis, values grow to the right
    Horizontal,
    /// Categories on the horizontal axis, values grow upwards
    Vertical,
}

/// How bar values are printed next to the bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueFormat {
    /// Integer with thousands separators
    Count,
    /// One decimal place
    Mean,
}

/// One stacked layer of a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    /// Legend entry
    pub name: String,
    /// One value per category
    pub values: Vec<f64>,
}

/// A bar chart with one bar per category, stacked when several series exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartSpec {
    /// Title and axis text
    pub labels: ChartLabels,
    /// Bar direction
    pub orientation: Orientation,
    /// Category names, first one drawn nearest the origin of the reading order
    pub categories: Vec<String>,
    /// Stacked series; every series has one value per category
    pub series: Vec<BarSeries>,
    /// Color each bar of a single-series chart with its own palette entry
    pub color_by_category: bool,
    /// Print bar totals
    pub annotate: Option<ValueFormat>,
    /// Styling
    pub style: ChartStyle,
}

impl BarChartSpec {
    /// Total of every category over all series.
    pub fn totals(&self) -> Vec<f64> {
        (0..self.categories.len())
            .map(|i| {
                self.series
                    .iter()
                    .map(|series| series.values.get(i).copied().unwrap_or(0.0))
                    .sum()
            })
            .collect()
    }

    /// Largest category total, at least one so empty charts still get an axis.
    pub fn max_total(&self) -> f64 {
        self.totals().into_iter().fold(1.0, f64::max)
    }

    /// Whether a legend is drawn.
    pub fn has_legend(&self) -> bool {
        self.series.len() > 1
    }
}

/// A histogram bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBar {
    /// Lower edge
    pub lower: f64,
    /// Upper edge
    pub upper: f64,
    /// Height
    pub count: f64,
}

/// A histogram with an optional overlaid density curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSpec {
    /// Title and axis text
    pub labels: ChartLabels,
    /// Bars in ascending order
    pub bars: Vec<HistogramBar>,
    /// Curve points already scaled to bar heights
    pub curve: Vec<(f64, f64)>,
    /// Styling
    pub style: ChartStyle,
}

/// A labelled point on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Short text drawn beside the marker
    pub label: String,
    /// Popup text of the marker
    pub popup: String,
}

/// A named site drawn under its markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSite {
    /// Site name
    pub name: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// A marker map over a lon/lat viewport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerMapSpec {
    /// Title and axis text
    pub labels: ChartLabels,
    /// Viewport center as `(latitude, longitude)`
    pub center: (f64, f64),
    /// Slippy-map style zoom level of the viewport
    pub zoom: u8,
    /// Sites the markers belong to
    pub sites: Vec<MapSite>,
    /// Markers
    pub markers: Vec<MapMarker>,
    /// Styling
    pub style: ChartStyle,
}

/// An encoded chart image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    /// Chart title
    pub title: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// PNG bytes
    pub png: Vec<u8>,
}
