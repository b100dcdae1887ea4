//! Configuration loading utilities

use crate::schema::Config;
use crate::validator::ConfigValidator;
use carevis_common::{with_context, CarevisError, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, instrument};

/// Environment variable overriding `data.path`.
pub const ENV_DATA_PATH: &str = "CAREVIS_DATA_PATH";
/// Environment variable overriding `output.directory`.
pub const ENV_OUTPUT_DIR: &str = "CAREVIS_OUTPUT_DIR";
/// Environment variable overriding `logging.level`.
pub const ENV_LOG_LEVEL: &str = "CAREVIS_LOG_LEVEL";
/// Environment variable overriding `locale`.
pub const ENV_LOCALE: &str = "CAREVIS_LOCALE";
/// Environment variable overriding every top-N service limit.
pub const ENV_TOP_N: &str = "CAREVIS_TOP_N";

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` or `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl ConfigFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            _ => Err(CarevisError::config(format!(
                "unsupported configuration format for '{}', expected .yaml, .yml or .toml",
                path.display()
            ))),
        }
    }

    /// Parses configuration text in this format.
    pub fn parse(self, content: &str) -> Result<Config> {
        let config = match self {
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        };
        Ok(config)
    }
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file.
    File(PathBuf),
    /// No file existed; built-in defaults were used.
    Defaults,
}

/// Configuration loader for the application
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a loader for the given configuration file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this loader reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads, overrides from the environment, and validates.
    ///
    /// A missing file is not an error: defaults are used instead.
    pub async fn load(&self) -> Result<Config> {
        self.load_with_source().await.map(|(config, _)| config)
    }

    /// Like [`load`](Self::load), also reporting where the configuration
    /// came from. Loading runs before logging is set up, so callers log the
    /// source once their subscriber is installed.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load_with_source(&self) -> Result<(Config, ConfigSource)> {
        let (mut config, source) = if tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            let format = ConfigFormat::from_path(&self.path)?;
            let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
                with_context!(e, "Failed to read configuration {}", self.path.display())
            })?;
            debug!(?format, "Parsing configuration file");
            (format.parse(&content)?, ConfigSource::File(self.path.clone()))
        } else {
            (Config::default(), ConfigSource::Defaults)
        };

        Self::apply_env_overrides(&mut config)?;
        ConfigValidator::validate(&config)?;
        Ok((config, source))
    }

    /// Applies `CAREVIS_*` environment variable overrides.
    pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
        Self::apply_overrides(config, |name| env::var(name).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATA_PATH) {
            config.data.path = PathBuf::from(path);
        }

        if let Some(directory) = lookup(ENV_OUTPUT_DIR) {
            config.output.directory = PathBuf::from(directory);
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.logging.level = level;
        }

        if let Some(locale) = lookup(ENV_LOCALE) {
            config.locale = locale;
        }

        if let Some(top_n) = lookup(ENV_TOP_N) {
            let top_n = parse_var::<usize>(ENV_TOP_N, &top_n)?;
            config.charts.top_services = top_n;
            config.family.top_services = top_n;
            config.map.top_services = top_n;
        }

        Ok(())
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| {
        CarevisError::config_with_source(
            format!("Failed to parse environment variable '{name}'"),
            e,
        )
    })
}
