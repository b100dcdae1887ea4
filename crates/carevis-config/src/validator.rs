//! Runtime validation of a loaded configuration.

use crate::schema::{ColorsConfig, Config};
use carevis_common::{ensure, Result};
use std::collections::HashSet;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        Self::validate_limits(config)?;
        Self::validate_family(config)?;
        Self::validate_clinics(config)?;
        Self::validate_map(config)?;
        Self::validate_charts(config)?;
        ensure!(!config.locale.trim().is_empty(), field = "locale", "locale cannot be empty");
        Ok(())
    }

    fn validate_limits(config: &Config) -> Result<()> {
        ensure!(
            config.charts.top_services > 0,
            field = "charts.top_services",
            "top services limit must be positive"
        );
        ensure!(
            config.family.top_services > 0,
            field = "family.top_services",
            "top services limit must be positive"
        );
        ensure!(
            config.map.top_services > 0,
            field = "map.top_services",
            "top services limit must be positive"
        );
        ensure!(
            config.charts.histogram_bins > 0,
            field = "charts.histogram_bins",
            "histogram bins must be positive"
        );
        Ok(())
    }

    fn validate_family(config: &Config) -> Result<()> {
        ensure!(
            config.family.min <= config.family.max,
            field = "family",
            "family range is empty: min {} is greater than max {}",
            config.family.min,
            config.family.max
        );
        Ok(())
    }

    fn validate_clinics(config: &Config) -> Result<()> {
        let mut names = HashSet::new();
        for clinic in config.clinics.locations() {
            ensure!(
                !clinic.name.trim().is_empty(),
                field = "clinics.name",
                "clinic name cannot be empty"
            );
            ensure!(
                names.insert(clinic.name.as_str()),
                field = "clinics.name",
                "duplicate clinic '{}'",
                clinic.name
            );
            ensure!(
                is_latitude(clinic.latitude),
                field = "clinics.latitude",
                "latitude of '{}' out of range: {}",
                clinic.name,
                clinic.latitude
            );
            ensure!(
                is_longitude(clinic.longitude),
                field = "clinics.longitude",
                "longitude of '{}' out of range: {}",
                clinic.name,
                clinic.longitude
            );
        }
        Ok(())
    }

    fn validate_map(config: &Config) -> Result<()> {
        ensure!(
            is_latitude(config.map.center_latitude),
            field = "map.center_latitude",
            "latitude out of range: {}",
            config.map.center_latitude
        );
        ensure!(
            is_longitude(config.map.center_longitude),
            field = "map.center_longitude",
            "longitude out of range: {}",
            config.map.center_longitude
        );
        ensure!(
            config.map.zoom <= 20,
            field = "map.zoom",
            "zoom must be at most 20, got {}",
            config.map.zoom
        );
        ensure!(
            config.map.marker_offset.is_finite() && config.map.marker_offset >= 0.0,
            field = "map.marker_offset",
            "marker offset must be a non-negative number"
        );
        Ok(())
    }

    fn validate_charts(config: &Config) -> Result<()> {
        ensure!(
            config.charts.width > 0 && config.charts.height > 0,
            field = "charts",
            "chart size must be positive, got {}x{}",
            config.charts.width,
            config.charts.height
        );
        ensure!(
            config.charts.label_max_chars > 3,
            field = "charts.label_max_chars",
            "label length must leave room for an ellipsis"
        );
        Self::validate_colors(&config.charts.colors)
    }

    fn validate_colors(colors: &ColorsConfig) -> Result<()> {
        for (field, value) in [
            ("charts.colors.background", &colors.background),
            ("charts.colors.text", &colors.text),
            ("charts.colors.histogram", &colors.histogram),
            ("charts.colors.density", &colors.density),
            ("charts.colors.marker", &colors.marker),
        ] {
            ensure!(is_hex_color(value), field = field, "invalid hex color '{}'", value);
        }
        ensure!(
            !colors.palette.is_empty(),
            field = "charts.colors.palette",
            "palette cannot be empty"
        );
        for value in &colors.palette {
            ensure!(
                is_hex_color(value),
                field = "charts.colors.palette",
                "invalid hex color '{}'",
                value
            );
        }
        Ok(())
    }
}

/// Whether `value` is a `#rrggbb` color.
pub fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

fn is_latitude(value: f64) -> bool {
    (-90.0..=90.0).contains(&value)
}

fn is_longitude(value: f64) -> bool {
    (-180.0..=180.0).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carevis_common::{CarevisError, ClinicDirectory, ClinicLocation};

    fn field_of(config: &Config) -> Option<String> {
        match ConfigValidator::validate(config) {
            Err(CarevisError::Validation { field, .. }) => field,
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(()) => None,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_zero_limits() {
        let mut config = Config::default();
        config.charts.histogram_bins = 0;
        assert_eq!(field_of(&config).as_deref(), Some("charts.histogram_bins"));

        let mut config = Config::default();
        config.family.top_services = 0;
        assert_eq!(field_of(&config).as_deref(), Some("family.top_services"));
    }

    #[test]
    fn test_rejects_inverted_family_range() {
        let mut config = Config::default();
        config.family.min = 11;
        assert_eq!(field_of(&config).as_deref(), Some("family"));
    }

    #[test]
    fn test_rejects_duplicate_clinics() {
        let mut config = Config::default();
        config.clinics = ClinicDirectory::new(vec![
            ClinicLocation::new("Tyre", 33.27, 35.19),
            ClinicLocation::new("Tyre", 33.28, 35.20),
        ]);
        assert_eq!(field_of(&config).as_deref(), Some("clinics.name"));
    }

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        let mut config = Config::default();
        config.clinics = ClinicDirectory::new(vec![ClinicLocation::new("Nowhere", 95.0, 35.0)]);
        assert_eq!(field_of(&config).as_deref(), Some("clinics.latitude"));

        let mut config = Config::default();
        config.map.center_longitude = 200.0;
        assert_eq!(field_of(&config).as_deref(), Some("map.center_longitude"));
    }

    #[test]
    fn test_rejects_bad_colors() {
        let mut config = Config::default();
        config.charts.colors.background = "white".to_string();
        assert_eq!(field_of(&config).as_deref(), Some("charts.colors.background"));

        let mut config = Config::default();
        config.charts.colors.palette = vec!["#12345".to_string()];
        assert_eq!(field_of(&config).as_deref(), Some("charts.colors.palette"));
    }

    #[test]
    fn test_rejects_empty_chart() {
        let mut config = Config::default();
        config.charts.width = 0;
        assert_eq!(field_of(&config).as_deref(), Some("charts"));
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#1f77b4"));
        assert!(is_hex_color("#FFFFFF"));
        assert!(!is_hex_color("1f77b4"));
        assert!(!is_hex_color("#1f77b"));
        assert!(!is_hex_color("#gggggg"));
    }
}
