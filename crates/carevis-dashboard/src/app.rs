//! Dashboard lifecycle: load the register once, answer requests, write views.

use crate::error::{DashboardError, DashboardResult};
use carevis_commands::{Router, Selection, View, ViewRequest, Visualization};
use carevis_common::{DatasetLoader, VisitDataset};
use carevis_config::Config;
use carevis_graphs::{PlottersSurface, RenderSurface};
use carevis_i18n::Localizer;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Values the selectors offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOptions {
    /// Services, in first-encounter order.
    pub services: Vec<String>,
    /// Nationalities, in first-encounter order.
    pub nationalities: Vec<String>,
    /// Lowest selectable family number.
    pub family_min: u32,
    /// Highest selectable family number.
    pub family_max: u32,
}

/// What showing a view produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    /// Files written to the output directory.
    Written(Vec<PathBuf>),
    /// Notice shown instead of a chart.
    Notice(String),
}

/// Localized menu entries in menu order.
pub fn menu_entries(localizer: &Localizer, config: &Config) -> Vec<(Visualization, String)> {
    Visualization::ALL
        .into_iter()
        .map(|entry| (entry, entry.label(localizer, config)))
        .collect()
}

/// The dashboard over one loaded visit register.
#[derive(Debug)]
pub struct Dashboard<S = PlottersSurface> {
    router: Router<S>,
}

impl Dashboard<PlottersSurface> {
    /// Loads the register named in `config` and prepares the plotters surface.
    #[instrument(skip(config), fields(data = %config.data.path.display()))]
    pub async fn start(config: Config) -> DashboardResult<Self> {
        let (dataset, report) = DatasetLoader::new(&config.data.path).load().await?;
        info!(
            records = dataset.len(),
            coerced_cells = report.coerced_cells(),
            "Visit register loaded"
        );
        Self::with_surface(dataset, config, PlottersSurface::new())
    }
}

impl<S: RenderSurface> Dashboard<S> {
    /// Creates a dashboard over an already loaded dataset.
    pub fn with_surface(dataset: VisitDataset, config: Config, surface: S) -> DashboardResult<Self> {
        let localizer = Localizer::new(&config.locale)?;
        Ok(Self {
            router: Router::new(dataset, config, localizer, surface),
        })
    }

    /// The router answering requests.
    pub const fn router(&self) -> &Router<S> {
        &self.router
    }

    /// Localized menu entries.
    pub fn menu(&self) -> Vec<(Visualization, String)> {
        menu_entries(self.router.localizer(), self.router.config())
    }

    /// Values the service, nationality, and family selectors offer.
    pub fn options(&self) -> SelectorOptions {
        let dataset = self.router.dataset();
        let family = &self.router.config().family;
        SelectorOptions {
            services: dataset.distinct_services().into_iter().map(String::from).collect(),
            nationalities: dataset
                .distinct_nationalities()
                .into_iter()
                .map(String::from)
                .collect(),
            family_min: family.min,
            family_max: family.max,
        }
    }

    /// Builds the request for `visualization` from a user selection.
    pub fn request(
        &self,
        visualization: Visualization,
        selection: Selection,
    ) -> DashboardResult<ViewRequest> {
        Ok(ViewRequest::from_selection(
            visualization,
            selection,
            self.router.dataset(),
            &self.router.config().family,
        )?)
    }

    /// Renders `request` and writes its files.
    pub async fn show(&self, request: &ViewRequest) -> DashboardResult<Shown> {
        let view = self.router.dispatch(request)?;
        self.write_view(request.visualization(), view).await
    }

    /// Renders every entry that takes no selection.
    pub async fn show_all(&self) -> DashboardResult<Vec<(Visualization, Shown)>> {
        let mut shown = Vec::new();
        for (entry, view) in self.router.dispatch_all() {
            shown.push((entry, self.write_view(entry, view?).await?));
        }
        Ok(shown)
    }

    async fn write_view(&self, entry: Visualization, view: View) -> DashboardResult<Shown> {
        let output = &self.router.config().output;
        let base = output.directory.join(entry.slug());

        match view {
            View::Notice(text) => Ok(Shown::Notice(text)),
            View::Chart(chart) => {
                let png = write_file(&base.with_extension("png"), &chart.png).await?;
                Ok(Shown::Written(vec![png]))
            }
            View::Map { chart, geojson } => {
                let mut written = vec![write_file(&base.with_extension("png"), &chart.png).await?];
                if output.write_geojson {
                    let bytes = serde_json::to_vec_pretty(&geojson)?;
                    written.push(write_file(&base.with_extension("geojson"), &bytes).await?);
                }
                Ok(Shown::Written(written))
            }
        }
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> DashboardResult<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DashboardError::write(parent, e))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| DashboardError::write(path, e))?;
    info!(path = %path.display(), bytes = bytes.len(), "Wrote view");
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use carevis_common::test_utils::{create_temp_dir, sample_dataset};
    use carevis_graphs::{BarChartSpec, HistogramSpec, MarkerMapSpec, RenderedChart};

    #[derive(Debug)]
    struct StubSurface;

    impl StubSurface {
        fn chart(title: &str) -> carevis_common::Result<RenderedChart> {
            Ok(RenderedChart {
                title: title.to_string(),
                width: 2,
                height: 2,
                png: b"\x89PNG stub".to_vec(),
            })
        }
    }

    impl RenderSurface for StubSurface {
        fn bar_chart(&self, spec: &BarChartSpec) -> carevis_common::Result<RenderedChart> {
            Self::chart(&spec.labels.title)
        }

        fn histogram(&self, spec: &HistogramSpec) -> carevis_common::Result<RenderedChart> {
            Self::chart(&spec.labels.title)
        }

        fn marker_map(&self, spec: &MarkerMapSpec) -> carevis_common::Result<RenderedChart> {
            Self::chart(&spec.labels.title)
        }
    }

    fn dashboard(output: &Path) -> Dashboard<StubSurface> {
        let mut config = Config::default();
        config.output.directory = output.join("views");
        Dashboard::with_surface(sample_dataset(), config, StubSurface).unwrap()
    }

    #[test]
    fn test_menu_lists_six_entries() {
        let dir = create_temp_dir();
        let menu = dashboard(dir.path()).menu();
        assert_eq!(menu.len(), 6);
        assert_eq!(menu[4].1, "5. Top Services by Family Number");
    }

    #[test]
    fn test_options() {
        let dir = create_temp_dir();
        let options = dashboard(dir.path()).options();
        assert_eq!(options.services, vec!["Dental", "General Medicine", "Pediatrics"]);
        assert_eq!(options.nationalities, vec!["Lebanese", "Syrian", "Palestinian"]);
        assert_eq!((options.family_min, options.family_max), (0, 10));
    }

    #[tokio::test]
    async fn test_show_writes_png() {
        let dir = create_temp_dir();
        let dashboard = dashboard(dir.path());

        let shown = dashboard.show(&ViewRequest::AverageAge).await.unwrap();

        let expected = dir.path().join("views").join("average-age.png");
        assert_eq!(shown, Shown::Written(vec![expected.clone()]));
        assert!(std::fs::read(expected).unwrap().starts_with(b"\x89PNG"));
    }

    #[tokio::test]
    async fn test_map_writes_geojson() {
        let dir = create_temp_dir();
        let dashboard = dashboard(dir.path());

        let Shown::Written(files) = dashboard.show(&ViewRequest::ClinicMap).await.unwrap() else {
            panic!("expected written files");
        };

        assert_eq!(files.len(), 2);
        let geojson: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&files[1]).unwrap()).unwrap();
        assert_eq!(geojson["type"], "FeatureCollection");
    }

    #[tokio::test]
    async fn test_notice_writes_nothing() {
        let dir = create_temp_dir();
        let dashboard = dashboard(dir.path());
        let request = dashboard
            .request(
                Visualization::FamilyServices,
                Selection {
                    family: Some(8),
                    ..Selection::default()
                },
            )
            .unwrap();

        let shown = dashboard.show(&request).await.unwrap();

        assert_eq!(shown, Shown::Notice("No data for selected family.".into()));
        assert!(!dir.path().join("views").exists());
    }

    #[tokio::test]
    async fn test_show_all() {
        let dir = create_temp_dir();
        let shown = dashboard(dir.path()).show_all().await.unwrap();

        let entries: Vec<_> = shown.iter().map(|(entry, _)| entry.slug()).collect();
        assert_eq!(
            entries,
            vec!["service-by-sex", "average-age", "clinic-map", "seasonal-services"]
        );
        assert!(dir.path().join("views").join("seasonal-services.png").exists());
        assert!(dir.path().join("views").join("clinic-map.geojson").exists());
    }
}
