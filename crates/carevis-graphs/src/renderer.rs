//! Plotters implementation of the rendering surface.
//!
//! Charts are drawn into an in-memory RGB buffer with `BitMapBackend` and
//! encoded to PNG with the `image` crate, so nothing touches the disk here.

use crate::types::{BarChartSpec, ChartStyle, HistogramSpec, MarkerMapSpec, RenderedChart};
use crate::{bar_chart, clinic_map, histogram, RenderSurface};
use carevis_common::{CarevisError, Result};
use image::{DynamicImage, ImageOutputFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;
use tracing::{debug, instrument};

/// Font family used for every text element.
pub const FONT_FAMILY: &str = "sans-serif";
/// Caption font size.
pub const TITLE_FONT_SIZE: u32 = 28;
/// Axis description font size.
pub const AXIS_FONT_SIZE: u32 = 16;
/// Tick label and annotation font size.
pub const LABEL_FONT_SIZE: u32 = 14;

/// Draws with plotters and encodes PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlottersSurface;

impl PlottersSurface {
    /// Creates the surface.
    pub const fn new() -> Self {
        Self
    }
}

impl RenderSurface for PlottersSurface {
    #[instrument(skip_all, fields(title = %spec.labels.title))]
    fn bar_chart(&self, spec: &BarChartSpec) -> Result<RenderedChart> {
        let png = render_png(&spec.style, |root| bar_chart::draw(root, spec))?;
        Ok(rendered(&spec.labels.title, &spec.style, png))
    }

    #[instrument(skip_all, fields(title = %spec.labels.title))]
    fn histogram(&self, spec: &HistogramSpec) -> Result<RenderedChart> {
        let png = render_png(&spec.style, |root| histogram::draw(root, spec))?;
        Ok(rendered(&spec.labels.title, &spec.style, png))
    }

    #[instrument(skip_all, fields(title = %spec.labels.title))]
    fn marker_map(&self, spec: &MarkerMapSpec) -> Result<RenderedChart> {
        let png = render_png(&spec.style, |root| clinic_map::draw(root, spec))?;
        Ok(rendered(&spec.labels.title, &spec.style, png))
    }
}

fn rendered(title: &str, style: &ChartStyle, png: Vec<u8>) -> RenderedChart {
    debug!(bytes = png.len(), "Encoded chart");
    RenderedChart {
        title: title.to_string(),
        width: style.width,
        height: style.height,
        png,
    }
}

/// Runs `draw` on a background-filled canvas of the style's size and returns PNG bytes.
pub fn render_png<F>(style: &ChartStyle, draw: F) -> Result<Vec<u8>>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
{
    if style.width == 0 || style.height == 0 {
        return Err(CarevisError::graph(format!(
            "cannot render a {}x{} chart",
            style.width, style.height
        )));
    }

    let mut buffer = vec![0u8; style.width as usize * style.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&parse_color(&style.colors.background))?;
        draw(&root)?;
        root.present()?;
    }
    encode_png(buffer, style.width, style.height)
}

/// Encodes a packed RGB buffer as PNG.
pub fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        CarevisError::graph(format!("pixel buffer does not match a {width}x{height} image"))
    })?;
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image).write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}

/// Parse a color string (hex format) to RGBColor, black if it does not parse.
pub fn parse_color(color_str: &str) -> RGBColor {
    if let Some(hex) = color_str.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return RGBColor(r, g, b);
            }
        }
    }
    RGBColor(0, 0, 0)
}

/// Palette entry `index`, cycling; black for an empty palette.
pub fn palette_color(palette: &[String], index: usize) -> RGBColor {
    if palette.is_empty() {
        return RGBColor(0, 0, 0);
    }
    parse_color(&palette[index % palette.len()])
}

/// Text style of the given size in the chart's text color.
pub fn text_style(style: &ChartStyle, size: u32) -> TextStyle<'static> {
    (FONT_FAMILY, size)
        .into_font()
        .color(&parse_color(&style.colors.text))
}
