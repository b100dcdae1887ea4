//! Integration tests for carevis-commands crate.
//!
//! These tests load a register from disk and route every menu entry
//! through a surface that records what it was asked to draw.

use carevis_commands::{Router, Selection, View, ViewRequest, Visualization};
use carevis_common::test_utils::{init_test_logging, records_to_csv, sample_records, write_temp_csv};
use carevis_common::{DatasetLoader, Result, VisitDataset};
use carevis_config::Config;
use carevis_graphs::{
    BarChartSpec, HistogramSpec, MarkerMapSpec, PlottersSurface, RenderSurface, RenderedChart,
};
use carevis_i18n::Localizer;
use std::cell::RefCell;

#[derive(Debug, Default)]
struct RecordingSurface {
    drawn: RefCell<Vec<String>>,
}

impl RecordingSurface {
    fn record(&self, kind: &str, title: &str) -> Result<RenderedChart> {
        self.drawn.borrow_mut().push(format!("{kind}: {title}"));
        Ok(RenderedChart {
            title: title.to_string(),
            width: 10,
            height: 10,
            png: Vec::new(),
        })
    }
}

impl RenderSurface for RecordingSurface {
    fn bar_chart(&self, spec: &BarChartSpec) -> Result<RenderedChart> {
        self.record("bar", &spec.labels.title)
    }

    fn histogram(&self, spec: &HistogramSpec) -> Result<RenderedChart> {
        self.record("histogram", &spec.labels.title)
    }

    fn marker_map(&self, spec: &MarkerMapSpec) -> Result<RenderedChart> {
        self.record("map", &spec.labels.title)
    }
}

async fn load_sample() -> VisitDataset {
    let file = write_temp_csv(&records_to_csv(&sample_records()));
    let (dataset, report) = DatasetLoader::new(file.path()).load().await.unwrap();
    assert_eq!(report.coerced_cells(), 0);
    dataset
}

#[tokio::test]
async fn test_every_entry_from_disk() {
    init_test_logging();
    let dataset = load_sample().await;
    let config = Config::default();
    let surface = RecordingSurface::default();
    let router = Router::new(
        dataset.clone(),
        config.clone(),
        Localizer::new(&config.locale).unwrap(),
        &surface,
    );

    for entry in Visualization::ALL {
        let request =
            ViewRequest::from_selection(entry, Selection::default(), &dataset, &config.family)
                .unwrap();
        let view = router.dispatch(&request).unwrap();
        match entry {
            Visualization::ClinicMap => assert!(matches!(view, View::Map { .. })),
            // Family 0 does not occur in the sample register
            Visualization::FamilyServices => {
                assert_eq!(view.notice(), Some("No data for selected family."));
            }
            _ => assert!(matches!(view, View::Chart(_)), "{entry}"),
        }
    }

    assert_eq!(
        surface.drawn.borrow().as_slice(),
        [
            "bar: Service Name Counts by Sex",
            "bar: Average Age per Medical Service",
            "histogram: Age Distribution for Dental (Lebanese)",
            "map: Top 5 Services in South Lebanon",
            "bar: Top 5 Medical Services per Season",
        ]
    );
}

#[tokio::test]
async fn test_top_n_follows_configuration() {
    let dataset = load_sample().await;
    let mut config = Config::default();
    config.charts.top_services = 1;
    config.map.top_services = 1;

    let router = Router::new(
        dataset,
        config,
        Localizer::new("en-US").unwrap(),
        RecordingSurface::default(),
    );

    let View::Map { geojson, chart } = router.dispatch(&ViewRequest::ClinicMap).unwrap() else {
        panic!("expected a map view");
    };
    assert_eq!(chart.title, "Top 1 Services in South Lebanon");
    assert_eq!(geojson["features"].as_array().map(Vec::len), Some(3));
}

#[test]
#[ignore = "needs system fonts"]
fn test_plotters_surface_renders_every_entry() {
    let dataset = carevis_common::test_utils::sample_dataset();
    let config = Config::default();
    let router = Router::new(
        dataset,
        config,
        Localizer::new("en-US").unwrap(),
        PlottersSurface::new(),
    );

    for (entry, view) in router.dispatch_all() {
        let view = view.unwrap();
        let png = &view.chart().unwrap().png;
        assert_eq!(&png[1..4], b"PNG", "{entry}");
    }
}
