//! Age histogram with its density curve.

use crate::aggregator::AgeDistribution;
use crate::renderer::{
    parse_color, text_style, AXIS_FONT_SIZE, FONT_FAMILY, LABEL_FONT_SIZE, TITLE_FONT_SIZE,
};
use crate::types::{ChartLabels, ChartStyle, HistogramBar, HistogramSpec};
use carevis_common::{CarevisError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Builds the histogram of an age distribution.
///
/// The density curve is scaled by `samples * bin_width` so it sits on the
/// same axis as the bar counts.
#[allow(clippy::cast_precision_loss)]
pub fn age_histogram_chart(
    distribution: &AgeDistribution,
    labels: ChartLabels,
    style: &ChartStyle,
) -> HistogramSpec {
    let scale = distribution.ages.len() as f64 * distribution.bin_width();
    HistogramSpec {
        labels,
        bars: distribution
            .histogram
            .iter()
            .map(|bin| HistogramBar {
                lower: bin.lower,
                upper: bin.upper,
                count: f64::from(bin.count),
            })
            .collect(),
        curve: distribution
            .density
            .iter()
            .map(|&(age, density)| (age, density * scale))
            .collect(),
        style: style.clone(),
    }
}

/// Draws a histogram on `root`.
pub fn draw<DB>(root: &DrawingArea<DB, Shift>, spec: &HistogramSpec) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (Some(first), Some(last)) = (spec.bars.first(), spec.bars.last()) else {
        return Err(CarevisError::graph("histogram has no bins"));
    };
    let style = &spec.style;
    let peak = spec
        .bars
        .iter()
        .map(|bar| bar.count)
        .chain(spec.curve.iter().map(|&(_, y)| y))
        .fold(1.0, f64::max);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.labels.title, (FONT_FAMILY, TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(first.lower..last.upper, 0f64..peak * 1.1)?;

    let age_label = |age: &f64| format!("{age:.0}");
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(spec.labels.x_label.as_str())
        .y_desc(spec.labels.y_label.as_str())
        .x_label_formatter(&age_label)
        .label_style(text_style(style, LABEL_FONT_SIZE))
        .axis_desc_style(text_style(style, AXIS_FONT_SIZE));
    if !style.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    let fill = parse_color(&style.colors.histogram);
    let outline = parse_color(&style.colors.text);
    chart.draw_series(spec.bars.iter().map(|bar| {
        Rectangle::new([(bar.lower, 0.0), (bar.upper, bar.count)], fill.mix(0.8).filled())
    }))?;
    chart.draw_series(spec.bars.iter().map(|bar| {
        Rectangle::new([(bar.lower, 0.0), (bar.upper, bar.count)], outline.stroke_width(1))
    }))?;

    if !spec.curve.is_empty() {
        let line = parse_color(&style.colors.density);
        chart.draw_series(LineSeries::new(spec.curve.iter().copied(), line.stroke_width(2)))?;
    }

    Ok(())
}
