//! Clinic location view: marker map image plus a GeoJSON export.

use crate::aggregator::ClinicServiceMarker;
use crate::renderer::{
    parse_color, text_style, AXIS_FONT_SIZE, FONT_FAMILY, LABEL_FONT_SIZE, TITLE_FONT_SIZE,
};
use crate::types::{ChartLabels, ChartStyle, MapMarker, MapSite, MarkerMapSpec};
use carevis_common::{truncate_label, ClinicDirectory, Result};
use carevis_config::MapConfig;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde_json::{json, Value};
use std::ops::Range;

/// Builds the marker map of ranked clinic services.
///
/// Sites are the clinics that have at least one marker, in marker order.
pub fn clinic_map_chart(
    markers: &[ClinicServiceMarker],
    directory: &ClinicDirectory,
    map: &MapConfig,
    labels: ChartLabels,
    style: &ChartStyle,
) -> MarkerMapSpec {
    let mut sites: Vec<MapSite> = Vec::new();
    for marker in markers {
        if sites.iter().any(|site| site.name == marker.clinic) {
            continue;
        }
        if let Some(location) = directory.get(&marker.clinic) {
            sites.push(MapSite {
                name: location.name.clone(),
                latitude: location.latitude,
                longitude: location.longitude,
            });
        }
    }

    MarkerMapSpec {
        labels,
        center: (map.center_latitude, map.center_longitude),
        zoom: map.zoom,
        sites,
        markers: markers
            .iter()
            .map(|marker| MapMarker {
                latitude: marker.latitude,
                longitude: marker.longitude,
                label: format!(
                    "{}: {}",
                    truncate_label(&marker.service, style.label_max_chars),
                    marker.count
                ),
                popup: marker.popup_text(),
            })
            .collect(),
        style: style.clone(),
    }
}

/// GeoJSON `FeatureCollection` with one point feature per marker.
pub fn marker_geojson(markers: &[ClinicServiceMarker]) -> Value {
    let features: Vec<Value> = markers
        .iter()
        .map(|marker| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [marker.longitude, marker.latitude],
                },
                "properties": {
                    "clinic": marker.clinic,
                    "service": marker.service,
                    "count": marker.count,
                    "rank": marker.rank,
                    "popup": marker.popup_text(),
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Longitude and latitude ranges shown by the map.
///
/// The zoom level gives a half-width of `180 / 2^zoom` degrees of longitude
/// around the center, with latitude following the image aspect ratio. The
/// box is then grown so every site and marker stays inside.
pub fn viewport(spec: &MarkerMapSpec) -> (Range<f64>, Range<f64>) {
    let (center_lat, center_lon) = spec.center;
    let half_lon = 180.0 / 2f64.powi(i32::from(spec.zoom));
    let half_lat = half_lon * f64::from(spec.style.height.max(1)) / f64::from(spec.style.width.max(1));
    let (pad_lon, pad_lat) = (half_lon * 0.1, half_lat * 0.1);

    let points = spec
        .sites
        .iter()
        .map(|site| (site.latitude, site.longitude))
        .chain(spec.markers.iter().map(|m| (m.latitude, m.longitude)));

    let mut lon = (center_lon - half_lon, center_lon + half_lon);
    let mut lat = (center_lat - half_lat, center_lat + half_lat);
    for (latitude, longitude) in points {
        lon = (lon.0.min(longitude - pad_lon), lon.1.max(longitude + pad_lon));
        lat = (lat.0.min(latitude - pad_lat), lat.1.max(latitude + pad_lat));
    }

    (lon.0..lon.1, lat.0..lat.1)
}

/// Draws the marker map on `root`.
pub fn draw<DB>(root: &DrawingArea<DB, Shift>, spec: &MarkerMapSpec) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let style = &spec.style;
    let (lon_range, lat_range) = viewport(spec);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.labels.title, (FONT_FAMILY, TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(lon_range, lat_range)?;

    let degrees = |value: &f64| format!("{value:.2}");
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(spec.labels.x_label.as_str())
        .y_desc(spec.labels.y_label.as_str())
        .x_label_formatter(&degrees)
        .y_label_formatter(&degrees)
        .label_style(text_style(style, LABEL_FONT_SIZE))
        .axis_desc_style(text_style(style, AXIS_FONT_SIZE));
    if !style.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    let text = parse_color(&style.colors.text);
    let marker = parse_color(&style.colors.marker);
    let site_font = text_style(style, AXIS_FONT_SIZE);
    let marker_font = text_style(style, LABEL_FONT_SIZE);

    chart.draw_series(spec.sites.iter().map(|site| {
        EmptyElement::at((site.longitude, site.latitude))
            + TriangleMarker::new((0, 0), 9, text.filled())
            + Text::new(site.name.clone(), (-10, 12), site_font.clone())
    }))?;

    chart.draw_series(spec.markers.iter().map(|m| {
        EmptyElement::at((m.longitude, m.latitude))
            + Circle::new((0, 0), 6, marker.filled())
            + Text::new(m.label.clone(), (10, -7), marker_font.clone())
    }))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::render_png;
    use carevis_common::test_utils::assert_approx_eq;

    fn markers() -> Vec<ClinicServiceMarker> {
        vec![
            ClinicServiceMarker {
                clinic: "Ankoun".into(),
                service: "Dental".into(),
                count: 12,
                rank: 0,
                latitude: 33.3648,
                longitude: 35.3033,
            },
            ClinicServiceMarker {
                clinic: "Ankoun".into(),
                service: "Eye Care".into(),
                count: 7,
                rank: 1,
                latitude: 33.3698,
                longitude: 35.3033,
            },
            ClinicServiceMarker {
                clinic: "Tyre".into(),
                service: "Pediatrics".into(),
                count: 3,
                rank: 0,
                latitude: 33.2730,
                longitude: 35.1939,
            },
        ]
    }

    fn spec() -> MarkerMapSpec {
        clinic_map_chart(
            &markers(),
            &ClinicDirectory::south_lebanon(),
            &MapConfig::default(),
            ChartLabels::new("Top services", "Longitude", "Latitude"),
            &ChartStyle::default(),
        )
    }

    #[test]
    fn test_sites_are_clinics_with_markers() {
        let spec = spec();
        let names: Vec<_> = spec.sites.iter().map(|site| site.name.as_str()).collect();
        assert_eq!(names, vec!["Ankoun", "Tyre"]);
        assert_eq!(spec.markers.len(), 3);
        assert_eq!(spec.markers[1].label, "Eye Care: 7");
        assert_eq!(spec.markers[1].popup, "Ankoun<br>Eye Care: 7");
    }

    #[test]
    fn test_geojson_feature_collection() {
        let geojson = marker_geojson(&markers());

        assert_eq!(geojson["type"], "FeatureCollection");
        let features = geojson["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[2]["geometry"]["type"], "Point");
        assert_approx_eq(features[2]["geometry"]["coordinates"][0].as_f64().unwrap(), 35.1939, 1e-9);
        assert_approx_eq(features[2]["geometry"]["coordinates"][1].as_f64().unwrap(), 33.2730, 1e-9);
        assert_eq!(features[0]["properties"]["popup"], "Ankoun<br>Dental: 12");
        assert_eq!(features[1]["properties"]["rank"], 1);
    }

    #[test]
    fn test_viewport_follows_zoom() {
        let mut spec = spec();
        spec.sites.clear();
        spec.markers.clear();
        spec.zoom = 1;

        let (lon, lat) = viewport(&spec);

        assert_approx_eq(lon.start, 35.3 - 90.0, 1e-9);
        assert_approx_eq(lon.end, 35.3 + 90.0, 1e-9);
        assert_approx_eq(lat.end - lat.start, 90.0, 1e-9);
    }

    #[test]
    fn test_viewport_contains_every_marker() {
        let mut spec = spec();
        spec.zoom = 14;

        let (lon, lat) = viewport(&spec);

        for marker in &spec.markers {
            assert!(lon.contains(&marker.longitude));
            assert!(lat.contains(&marker.latitude));
        }
    }

    #[test]
    #[ignore = "needs system fonts"]
    fn test_renders_png() {
        let spec = spec();
        let png = render_png(&spec.style, |root| draw(root, &spec)).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
