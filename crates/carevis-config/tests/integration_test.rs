//! Integration tests for carevis-config crate.

use carevis_common::test_utils::create_temp_dir;
use carevis_common::CarevisError;
use carevis_config::{Config, ConfigLoader, ConfigSource};
use std::path::PathBuf;

#[tokio::test]
async fn test_missing_file_yields_defaults() {
    let dir = create_temp_dir();
    let loader = ConfigLoader::new(dir.path().join("absent.yaml"));

    let config = loader.load().await.unwrap();

    assert_eq!(config.family, Config::default().family);
    assert_eq!(config.clinics, Config::default().clinics);

    let (_, source) = loader.load_with_source().await.unwrap();
    assert_eq!(source, ConfigSource::Defaults);
}

#[tokio::test]
async fn test_existing_file_is_reported_as_source() {
    let dir = create_temp_dir();
    let path = dir.path().join("carevis.yaml");
    std::fs::write(&path, "locale: en-US\n").unwrap();

    let (config, source) = ConfigLoader::new(&path).load_with_source().await.unwrap();

    assert_eq!(config.locale, "en-US");
    assert_eq!(source, ConfigSource::File(path));
}

#[tokio::test]
async fn test_load_yaml_file() {
    let dir = create_temp_dir();
    let path = dir.path().join("carevis.yaml");
    std::fs::write(
        &path,
        r##"
data:
  path: visits.csv
charts:
  width: 800
  height: 400
  colors:
    histogram: "#ff8800"
output:
  directory: rendered
  write_geojson: false
logging:
  format: json
"##,
    )
    .unwrap();

    let config = ConfigLoader::new(&path).load().await.unwrap();

    assert_eq!(config.data.path, PathBuf::from("visits.csv"));
    assert_eq!((config.charts.width, config.charts.height), (800, 400));
    assert_eq!(config.charts.colors.histogram, "#ff8800");
    assert_eq!(config.charts.colors.background, "#ffffff");
    assert!(!config.output.write_geojson);
}

#[tokio::test]
async fn test_load_toml_file() {
    let dir = create_temp_dir();
    let path = dir.path().join("carevis.toml");
    std::fs::write(
        &path,
        r#"
locale = "en-US"

[family]
min = 1
max = 12
"#,
    )
    .unwrap();

    let config = ConfigLoader::new(&path).load().await.unwrap();
    assert_eq!((config.family.min, config.family.max), (1, 12));
}

#[tokio::test]
async fn test_invalid_values_fail_validation() {
    let dir = create_temp_dir();
    let path = dir.path().join("carevis.yaml");
    std::fs::write(&path, "family:\n  min: 9\n  max: 2\n").unwrap();

    let err = ConfigLoader::new(&path).load().await.unwrap_err();
    assert!(matches!(err, CarevisError::Validation { .. }));
}

#[tokio::test]
async fn test_malformed_file_is_config_error() {
    let dir = create_temp_dir();
    let path = dir.path().join("carevis.yaml");
    std::fs::write(&path, "charts: [unterminated\n").unwrap();

    let err = ConfigLoader::new(&path).load().await.unwrap_err();
    assert!(matches!(err, CarevisError::Config { .. }));
}
