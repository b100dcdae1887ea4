//! Default values for every configuration section.

use crate::schema::{
    ChartsConfig, ColorsConfig, Config, DataConfig, FamilyConfig, MapConfig, OutputConfig,
};
use carevis_common::{ClinicDirectory, LoggingConfig};
use std::path::PathBuf;

/// Default locale.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Default number of services listed by the ranked views.
pub const DEFAULT_TOP_SERVICES: usize = 5;

/// Default number of bins of the age histogram.
pub const DEFAULT_HISTOGRAM_BINS: usize = 15;

/// Series palette, matplotlib's `tab10`.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            clinics: ClinicDirectory::south_lebanon(),
            map: MapConfig::default(),
            family: FamilyConfig::default(),
            charts: ChartsConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("cleaned_data.csv"),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_latitude: 33.3,
            center_longitude: 35.3,
            zoom: 10,
            marker_offset: 0.005,
            top_services: DEFAULT_TOP_SERVICES,
        }
    }
}

impl Default for FamilyConfig {
    fn default() -> Self {
        Self {
            min: 0,
            max: 10,
            top_services: DEFAULT_TOP_SERVICES,
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            top_services: DEFAULT_TOP_SERVICES,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            label_max_chars: 32,
            show_grid: true,
            colors: ColorsConfig::default(),
        }
    }
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#000000".to_string(),
            palette: DEFAULT_PALETTE.iter().map(ToString::to_string).collect(),
            histogram: "#87ceeb".to_string(),
            density: "#1f77b4".to_string(),
            marker: "#1f77b4".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            write_geojson: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard_layout() {
        let config = Config::default();
        assert_eq!(config.locale, "en-US");
        assert_eq!(config.clinics.len(), 3);
        assert_eq!((config.family.min, config.family.max), (0, 10));
        assert_eq!(config.charts.histogram_bins, 15);
        assert_eq!(config.map.top_services, 5);
        assert!((config.map.marker_offset - 0.005).abs() < f64::EPSILON);
        assert_eq!(config.charts.colors.palette.len(), 10);
    }
}
