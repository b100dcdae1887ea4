//! Maps a view request to its aggregation and rendering.

use crate::menu::Visualization;
use crate::request::ViewRequest;
use carevis_common::{ensure, FamilyNumber, Result, VisitDataset};
use carevis_config::Config;
use carevis_graphs::{
    age_distribution, age_histogram_chart, average_age_by_service, average_age_chart,
    clinic_map_chart, count_by_service_and_sex, family_services_chart, marker_geojson,
    seasonal_services_chart, service_sex_chart, top_services_by_clinic, top_services_by_family,
    top_services_by_season, ChartLabels, ChartStyle, Outcome, RenderSurface, RenderedChart,
};
use carevis_i18n::{fluent_args, FluentArgs, Localizer};
use serde_json::Value;
use tracing::{debug, info, instrument};

/// What a dispatched request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// A rendered chart.
    Chart(RenderedChart),
    /// The rendered clinic map with its markers as GeoJSON.
    Map {
        /// Rendered map image.
        chart: RenderedChart,
        /// Marker `FeatureCollection`.
        geojson: Value,
    },
    /// Informational message shown instead of a chart.
    Notice(String),
}

impl View {
    /// Notice text, if this view is a notice.
    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::Notice(text) => Some(text),
            _ => None,
        }
    }

    /// Rendered image, if any.
    pub const fn chart(&self) -> Option<&RenderedChart> {
        match self {
            Self::Chart(chart) | Self::Map { chart, .. } => Some(chart),
            Self::Notice(_) => None,
        }
    }
}

/// Routes view requests over one immutable dataset.
#[derive(Debug)]
pub struct Router<S> {
    dataset: VisitDataset,
    config: Config,
    style: ChartStyle,
    localizer: Localizer,
    surface: S,
}

impl<S: RenderSurface> Router<S> {
    /// Creates a router drawing on `surface`.
    pub fn new(dataset: VisitDataset, config: Config, localizer: Localizer, surface: S) -> Self {
        let style = ChartStyle::from(&config.charts);
        Self {
            dataset,
            config,
            style,
            localizer,
            surface,
        }
    }

    /// The dataset requests are answered from.
    pub const fn dataset(&self) -> &VisitDataset {
        &self.dataset
    }

    /// The configuration in effect.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The localizer used for chart text and notices.
    pub const fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    /// Runs the aggregation and rendering matching `request`.
    ///
    /// An empty aggregation result becomes [`View::Notice`], never an error.
    #[instrument(skip(self), fields(view = request.visualization().slug()))]
    pub fn dispatch(&self, request: &ViewRequest) -> Result<View> {
        let view = match request {
            ViewRequest::ServiceBySex => self.service_by_sex(),
            ViewRequest::AverageAge => self.average_age(),
            ViewRequest::AgeDistribution {
                service,
                nationality,
            } => self.age_distribution(service, nationality),
            ViewRequest::ClinicMap => self.clinic_map(),
            ViewRequest::FamilyServices { family_number } => self.family_services(*family_number),
            ViewRequest::SeasonalServices => self.seasonal_services(),
        }?;

        match &view {
            View::Notice(text) => info!(notice = %text, "No data for view"),
            View::Chart(chart) | View::Map { chart, .. } => {
                debug!(bytes = chart.png.len(), "Rendered view");
            }
        }
        Ok(view)
    }

    /// Dispatches every menu entry that takes no selection, in menu order.
    pub fn dispatch_all(&self) -> Vec<(Visualization, Result<View>)> {
        Visualization::ALL
            .into_iter()
            .filter_map(|entry| ViewRequest::without_selection(entry).map(|request| (entry, request)))
            .map(|(entry, request)| (entry, self.dispatch(&request)))
            .collect()
    }

    fn service_by_sex(&self) -> Result<View> {
        let Outcome::Data(table) = count_by_service_and_sex(&self.dataset) else {
            return Ok(self.no_data());
        };
        let labels = self.labels(Visualization::ServiceBySex, None, "axis-count", "axis-service");
        let spec = service_sex_chart(&table, labels, &self.style);
        Ok(View::Chart(self.surface.bar_chart(&spec)?))
    }

    fn average_age(&self) -> Result<View> {
        let Outcome::Data(ages) = average_age_by_service(&self.dataset) else {
            return Ok(self.no_data());
        };
        let labels = self.labels(Visualization::AverageAge, None, "axis-average-age", "axis-service");
        let spec = average_age_chart(&ages, labels, &self.style);
        Ok(View::Chart(self.surface.bar_chart(&spec)?))
    }

    fn age_distribution(&self, service: &str, nationality: &str) -> Result<View> {
        let outcome = age_distribution(
            &self.dataset,
            service,
            nationality,
            self.config.charts.histogram_bins,
        );
        let Outcome::Data(distribution) = outcome else {
            return Ok(self.no_data());
        };
        let args = fluent_args(&[("service", service.into()), ("nationality", nationality.into())]);
        let labels = self.labels(Visualization::AgeDistribution, Some(&args), "axis-age", "axis-count");
        let spec = age_histogram_chart(&distribution, labels, &self.style);
        Ok(View::Chart(self.surface.histogram(&spec)?))
    }

    fn clinic_map(&self) -> Result<View> {
        let map = &self.config.map;
        let outcome = top_services_by_clinic(
            &self.dataset,
            &self.config.clinics,
            map.top_services,
            map.marker_offset,
        );
        let Outcome::Data(markers) = outcome else {
            return Ok(self.no_data());
        };
        let args = fluent_args(&[("limit", map.top_services.into())]);
        let labels = self.labels(Visualization::ClinicMap, Some(&args), "axis-longitude", "axis-latitude");
        let spec = clinic_map_chart(&markers, &self.config.clinics, map, labels, &self.style);
        Ok(View::Map {
            chart: self.surface.marker_map(&spec)?,
            geojson: marker_geojson(&markers),
        })
    }

    fn family_services(&self, family_number: FamilyNumber) -> Result<View> {
        let family = &self.config.family;
        ensure!(
            family.contains(family_number.0),
            field = "family_number",
            "family number {} is outside {}..={}",
            family_number,
            family.min,
            family.max
        );

        let outcome = top_services_by_family(&self.dataset, family_number, family.top_services);
        let Outcome::Data(services) = outcome else {
            return Ok(View::Notice(self.localizer.text("notice-no-family-data")));
        };
        let args = fluent_args(&[
            ("limit", family.top_services.into()),
            ("family", family_number.0.into()),
        ]);
        let labels = self.labels(Visualization::FamilyServices, Some(&args), "axis-service", "axis-count");
        let spec = family_services_chart(&services, labels, &self.style);
        Ok(View::Chart(self.surface.bar_chart(&spec)?))
    }

    fn seasonal_services(&self) -> Result<View> {
        let limit = self.config.charts.top_services;
        let Outcome::Data(buckets) = top_services_by_season(&self.dataset, limit) else {
            return Ok(self.no_data());
        };
        let args = fluent_args(&[("limit", limit.into())]);
        let labels = self.labels(Visualization::SeasonalServices, Some(&args), "axis-service", "axis-count");
        let spec = seasonal_services_chart(
            &buckets,
            |season| self.localizer.text(season.message_id()),
            labels,
            &self.style,
        );
        Ok(View::Chart(self.surface.bar_chart(&spec)?))
    }

    fn labels(
        &self,
        entry: Visualization,
        args: Option<&FluentArgs<'_>>,
        x_label: &str,
        y_label: &str,
    ) -> ChartLabels {
        let title = args.map_or_else(
            || self.localizer.text(entry.title_id()),
            |args| self.localizer.text_with(entry.title_id(), args),
        );
        ChartLabels::new(title, self.localizer.text(x_label), self.localizer.text(y_label))
    }

    fn no_data(&self) -> View {
        View::Notice(self.localizer.text("notice-no-data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carevis_common::test_utils::{sample_dataset, visit};
    use carevis_common::CarevisError;
    use carevis_graphs::{BarChartSpec, HistogramSpec, MarkerMapSpec};
    use mockall::mock;

    mock! {
        Surface {}
        impl RenderSurface for Surface {
            fn bar_chart(&self, spec: &BarChartSpec) -> Result<RenderedChart>;
            fn histogram(&self, spec: &HistogramSpec) -> Result<RenderedChart>;
            fn marker_map(&self, spec: &MarkerMapSpec) -> Result<RenderedChart>;
        }
    }

    fn rendered(title: &str) -> RenderedChart {
        RenderedChart {
            title: title.to_string(),
            width: 1,
            height: 1,
            png: vec![0x89],
        }
    }

    fn router(dataset: VisitDataset, surface: MockSurface) -> Router<MockSurface> {
        let localizer = Localizer::new("en-US").unwrap();
        Router::new(dataset, Config::default(), localizer, surface)
    }

    fn silent_surface() -> MockSurface {
        let mut surface = MockSurface::new();
        surface.expect_bar_chart().never();
        surface.expect_histogram().never();
        surface.expect_marker_map().never();
        surface
    }

    #[test]
    fn test_service_by_sex_renders_one_bar_chart() {
        let mut surface = MockSurface::new();
        surface
            .expect_bar_chart()
            .withf(|spec| {
                spec.labels.title == "Service Name Counts by Sex" && spec.categories[0] == "Dental"
            })
            .times(1)
            .returning(|spec| Ok(rendered(&spec.labels.title)));
        surface.expect_histogram().never();
        surface.expect_marker_map().never();

        let view = router(sample_dataset(), surface)
            .dispatch(&ViewRequest::ServiceBySex)
            .unwrap();

        assert_eq!(view.chart().map(|c| c.title.as_str()), Some("Service Name Counts by Sex"));
    }

    #[test]
    fn test_age_distribution_renders_histogram() {
        let mut surface = MockSurface::new();
        surface.expect_bar_chart().never();
        surface
            .expect_histogram()
            .withf(|spec| spec.labels.title == "Age Distribution for Dental (Lebanese)" && spec.bars.len() == 15)
            .times(1)
            .returning(|spec| Ok(rendered(&spec.labels.title)));
        surface.expect_marker_map().never();

        let request = ViewRequest::AgeDistribution {
            service: "Dental".into(),
            nationality: "Lebanese".into(),
        };
        let view = router(sample_dataset(), surface).dispatch(&request).unwrap();

        assert!(matches!(view, View::Chart(_)));
    }

    #[test]
    fn test_age_distribution_without_match_is_a_notice() {
        let request = ViewRequest::AgeDistribution {
            service: "Dental".into(),
            nationality: "Palestinian".into(),
        };
        let view = router(sample_dataset(), silent_surface()).dispatch(&request).unwrap();

        assert_eq!(view.notice(), Some("No data for this selection."));
    }

    #[test]
    fn test_clinic_map_returns_geojson() {
        let mut surface = MockSurface::new();
        surface.expect_bar_chart().never();
        surface.expect_histogram().never();
        surface
            .expect_marker_map()
            .withf(|spec| spec.sites.len() == 3 && spec.markers.len() == 6)
            .times(1)
            .returning(|spec| Ok(rendered(&spec.labels.title)));

        let view = router(sample_dataset(), surface)
            .dispatch(&ViewRequest::ClinicMap)
            .unwrap();

        let View::Map { chart, geojson } = view else {
            panic!("expected a map view");
        };
        assert_eq!(chart.title, "Top 5 Services in South Lebanon");
        assert_eq!(geojson["features"].as_array().map(Vec::len), Some(6));
    }

    #[test]
    fn test_family_notice_and_range() {
        let router = router(sample_dataset(), silent_surface());

        let view = router
            .dispatch(&ViewRequest::FamilyServices {
                family_number: FamilyNumber(9),
            })
            .unwrap();
        assert_eq!(view.notice(), Some("No data for selected family."));

        let error = router
            .dispatch(&ViewRequest::FamilyServices {
                family_number: FamilyNumber(11),
            })
            .unwrap_err();
        assert!(matches!(error, CarevisError::Validation { .. }));
    }

    #[test]
    fn test_family_chart_title() {
        let mut surface = MockSurface::new();
        surface
            .expect_bar_chart()
            .withf(|spec| spec.labels.title == "Top 5 Services for Family 2" && spec.categories.len() == 2)
            .times(1)
            .returning(|spec| Ok(rendered(&spec.labels.title)));
        surface.expect_histogram().never();
        surface.expect_marker_map().never();

        let view = router(sample_dataset(), surface)
            .dispatch(&ViewRequest::FamilyServices {
                family_number: FamilyNumber(2),
            })
            .unwrap();
        assert!(view.chart().is_some());
    }

    #[test]
    fn test_seasonal_series_use_localized_names() {
        let mut surface = MockSurface::new();
        surface
            .expect_bar_chart()
            .withf(|spec| {
                let names: Vec<_> = spec.series.iter().map(|s| s.name.as_str()).collect();
                names == ["Winter", "Spring", "Summer", "Fall"]
            })
            .times(1)
            .returning(|spec| Ok(rendered(&spec.labels.title)));
        surface.expect_histogram().never();
        surface.expect_marker_map().never();

        router(sample_dataset(), surface)
            .dispatch(&ViewRequest::SeasonalServices)
            .unwrap();
    }

    #[test]
    fn test_empty_dataset_gives_notices_everywhere() {
        let router = router(VisitDataset::default(), silent_surface());

        for (entry, view) in router.dispatch_all() {
            assert_eq!(
                view.unwrap().notice(),
                Some("No data for this selection."),
                "{entry}"
            );
        }
    }

    #[test]
    fn test_dispatch_all_skips_selection_entries() {
        let mut surface = MockSurface::new();
        surface
            .expect_bar_chart()
            .times(3)
            .returning(|spec| Ok(rendered(&spec.labels.title)));
        surface.expect_histogram().never();
        surface
            .expect_marker_map()
            .times(1)
            .returning(|spec| Ok(rendered(&spec.labels.title)));

        let results = router(sample_dataset(), surface).dispatch_all();

        let entries: Vec<_> = results.iter().map(|(entry, _)| *entry).collect();
        assert_eq!(
            entries,
            vec![
                Visualization::ServiceBySex,
                Visualization::AverageAge,
                Visualization::ClinicMap,
                Visualization::SeasonalServices,
            ]
        );
        assert!(results.iter().all(|(_, view)| view.is_ok()));
    }

    #[test]
    fn test_render_errors_propagate() {
        let mut surface = MockSurface::new();
        surface
            .expect_bar_chart()
            .returning(|_| Err(CarevisError::graph("backend failed")));

        let data = VisitDataset::new(vec![visit().service("Dental").age(30.0).build()]);
        let result = router(data, surface).dispatch(&ViewRequest::AverageAge);

        assert!(matches!(result, Err(CarevisError::Graph { .. })));
    }
}
