//! Bar charts: services by sex, average age, family services, seasonal services.

use crate::aggregator::{SeasonBucket, ServiceAge, ServiceCount, ServiceSexTable};
use crate::renderer::{
    palette_color, text_style, AXIS_FONT_SIZE, FONT_FAMILY, LABEL_FONT_SIZE, TITLE_FONT_SIZE,
};
use crate::season::Season;
use crate::types::{BarChartSpec, BarSeries, ChartLabels, ChartStyle, Orientation, ValueFormat};
use carevis_common::{format_count, format_mean, truncate_label, CarevisError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::HashMap;

/// Stacked horizontal bars of visits per service, one layer per sex.
pub fn service_sex_chart(
    table: &ServiceSexTable,
    labels: ChartLabels,
    style: &ChartStyle,
) -> BarChartSpec {
    let series = table
        .sexes
        .iter()
        .enumerate()
        .map(|(column, sex)| BarSeries {
            name: sex.clone(),
            values: table
                .rows
                .iter()
                .map(|row| f64::from(row.counts.get(column).copied().unwrap_or(0)))
                .collect(),
        })
        .collect();

    BarChartSpec {
        labels,
        orientation: Orientation::Horizontal,
        categories: table.rows.iter().map(|row| row.service.clone()).collect(),
        series,
        color_by_category: false,
        annotate: Some(ValueFormat::Count),
        style: style.clone(),
    }
}

/// Horizontal bars of mean age per service.
pub fn average_age_chart(ages: &[ServiceAge], labels: ChartLabels, style: &ChartStyle) -> BarChartSpec {
    BarChartSpec {
        series: vec![BarSeries {
            name: labels.x_label.clone(),
            values: ages.iter().map(|age| age.mean_age).collect(),
        }],
        labels,
        orientation: Orientation::Horizontal,
        categories: ages.iter().map(|age| age.service.clone()).collect(),
        color_by_category: true,
        annotate: Some(ValueFormat::Mean),
        style: style.clone(),
    }
}

/// Vertical bars of the top services of one family.
pub fn family_services_chart(
    services: &[ServiceCount],
    labels: ChartLabels,
    style: &ChartStyle,
) -> BarChartSpec {
    BarChartSpec {
        series: vec![BarSeries {
            name: labels.y_label.clone(),
            values: services.iter().map(|s| f64::from(s.count)).collect(),
        }],
        labels,
        orientation: Orientation::Vertical,
        categories: services.iter().map(|s| s.service.clone()).collect(),
        color_by_category: true,
        annotate: Some(ValueFormat::Count),
        style: style.clone(),
    }
}

/// Vertical bars of the top services of every season, stacked by season.
///
/// Categories are the union of the listed services in first-listed order.
pub fn seasonal_services_chart<F>(
    buckets: &[SeasonBucket],
    season_name: F,
    labels: ChartLabels,
    style: &ChartStyle,
) -> BarChartSpec
where
    F: Fn(Season) -> String,
{
    let mut categories: Vec<String> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for service in buckets.iter().flat_map(|bucket| &bucket.services) {
        positions.entry(service.service.as_str()).or_insert_with(|| {
            categories.push(service.service.clone());
            categories.len() - 1
        });
    }

    let series = buckets
        .iter()
        .map(|bucket| {
            let mut values = vec![0.0; categories.len()];
            for service in &bucket.services {
                if let Some(&position) = positions.get(service.service.as_str()) {
                    values[position] = f64::from(service.count);
                }
            }
            BarSeries {
                name: season_name(bucket.season),
                values,
            }
        })
        .collect();

    BarChartSpec {
        labels,
        orientation: Orientation::Vertical,
        categories,
        series,
        color_by_category: false,
        annotate: Some(ValueFormat::Count),
        style: style.clone(),
    }
}

fn format_value(format: ValueFormat, value: f64) -> String {
    match format {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        ValueFormat::Count => format_count(value.round() as usize),
        ValueFormat::Mean => format_mean(value),
    }
}

fn bar_color(spec: &BarChartSpec, series: usize, category: usize) -> RGBColor {
    let palette = &spec.style.colors.palette;
    if spec.color_by_category && spec.series.len() == 1 {
        palette_color(palette, category)
    } else {
        palette_color(palette, series)
    }
}

/// `(category, start, end)` extents of every series, stacked in series order.
fn stacked_extents(spec: &BarChartSpec) -> Vec<Vec<(usize, f64, f64)>> {
    let mut base = vec![0.0; spec.categories.len()];
    spec.series
        .iter()
        .map(|series| {
            series
                .values
                .iter()
                .take(spec.categories.len())
                .enumerate()
                .map(|(category, value)| {
                    let start = base[category];
                    base[category] += value;
                    (category, start, start + value)
                })
                .collect()
        })
        .collect()
}

/// Draws a bar chart on `root`.
pub fn draw<DB>(root: &DrawingArea<DB, Shift>, spec: &BarChartSpec) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if spec.categories.is_empty() {
        return Err(CarevisError::graph("bar chart has no categories"));
    }
    match spec.orientation {
        Orientation::Horizontal => draw_horizontal(root, spec),
        Orientation::Vertical => draw_vertical(root, spec),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn draw_horizontal<DB>(root: &DrawingArea<DB, Shift>, spec: &BarChartSpec) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let style = &spec.style;
    let count = spec.categories.len() as u32;
    let max = spec.max_total() * 1.15;
    let names: Vec<String> = spec
        .categories
        .iter()
        .map(|name| truncate_label(name, style.label_max_chars))
        .collect();
    // Category 0 is drawn at the top.
    let row_of = |category: usize| count - 1 - category as u32;

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.labels.title, (FONT_FAMILY, TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(20 + 8 * style.label_max_chars.min(40) as u32)
        .build_cartesian_2d(0f64..max, (0u32..count).into_segmented())?;

    let category_label = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(row) => row
            .checked_add(1)
            .and_then(|next| count.checked_sub(next))
            .and_then(|category| names.get(category as usize))
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    };

    let mut mesh = chart.configure_mesh();
    mesh.disable_y_mesh()
        .y_labels(spec.categories.len())
        .y_label_formatter(&category_label)
        .x_desc(spec.labels.x_label.as_str())
        .y_desc(spec.labels.y_label.as_str())
        .label_style(text_style(style, LABEL_FONT_SIZE))
        .axis_desc_style(text_style(style, AXIS_FONT_SIZE));
    if !style.show_grid {
        mesh.disable_x_mesh();
    }
    mesh.draw()?;

    for (index, extents) in stacked_extents(spec).into_iter().enumerate() {
        let legend_color = bar_color(spec, index, 0);
        let bars = extents.into_iter().map(|(category, start, end)| {
            let row = row_of(category);
            let mut bar = Rectangle::new(
                [(start, SegmentValue::Exact(row)), (end, SegmentValue::Exact(row + 1))],
                bar_color(spec, index, category).filled(),
            );
            bar.set_margin(4, 4, 0, 0);
            bar
        });
        let annotation = chart.draw_series(bars)?;
        if spec.has_legend() {
            annotation
                .label(spec.series[index].name.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], legend_color.filled())
                });
        }
    }

    if let Some(format) = spec.annotate {
        let label_style = text_style(style, LABEL_FONT_SIZE).pos(Pos::new(HPos::Left, VPos::Center));
        chart.draw_series(spec.totals().into_iter().enumerate().map(|(category, total)| {
            Text::new(
                format_value(format, total),
                (total + max * 0.01, SegmentValue::CenterOf(row_of(category))),
                label_style.clone(),
            )
        }))?;
    }

    if spec.has_legend() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(text_style(style, LABEL_FONT_SIZE))
            .draw()?;
    }

    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn draw_vertical<DB>(root: &DrawingArea<DB, Shift>, spec: &BarChartSpec) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let style = &spec.style;
    let count = spec.categories.len() as u32;
    let max = spec.max_total() * 1.15;
    let names: Vec<String> = spec
        .categories
        .iter()
        .map(|name| truncate_label(name, style.label_max_chars))
        .collect();
    let rotate = spec.categories.len() > 5;

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.labels.title, (FONT_FAMILY, TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(if rotate {
            20 + 8 * style.label_max_chars.min(40) as u32
        } else {
            50
        })
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..count).into_segmented(), 0f64..max)?;

    let category_label = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(category) => names
            .get(*category as usize)
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    };
    let x_label_style = if rotate {
        text_style(style, LABEL_FONT_SIZE).transform(FontTransform::Rotate90)
    } else {
        text_style(style, LABEL_FONT_SIZE)
    };

    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh()
        .x_labels(spec.categories.len())
        .x_label_formatter(&category_label)
        .x_label_style(x_label_style)
        .y_label_style(text_style(style, LABEL_FONT_SIZE))
        .x_desc(spec.labels.x_label.as_str())
        .y_desc(spec.labels.y_label.as_str())
        .axis_desc_style(text_style(style, AXIS_FONT_SIZE));
    if !style.show_grid {
        mesh.disable_y_mesh();
    }
    mesh.draw()?;

    for (index, extents) in stacked_extents(spec).into_iter().enumerate() {
        let legend_color = bar_color(spec, index, 0);
        let bars = extents.into_iter().map(|(category, start, end)| {
            let column = category as u32;
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(column), start), (SegmentValue::Exact(column + 1), end)],
                bar_color(spec, index, category).filled(),
            );
            bar.set_margin(0, 0, 6, 6);
            bar
        });
        let annotation = chart.draw_series(bars)?;
        if spec.has_legend() {
            annotation
                .label(spec.series[index].name.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], legend_color.filled())
                });
        }
    }

    if let Some(format) = spec.annotate {
        let label_style =
            text_style(style, LABEL_FONT_SIZE).pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(spec.totals().into_iter().enumerate().map(|(category, total)| {
            Text::new(
                format_value(format, total),
                (SegmentValue::CenterOf(category as u32), total + max * 0.01),
                label_style.clone(),
            )
        }))?;
    }

    if spec.has_legend() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(text_style(style, LABEL_FONT_SIZE))
            .draw()?;
    }

    Ok(())
}
