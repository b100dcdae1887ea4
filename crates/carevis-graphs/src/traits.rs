//! The rendering surface seam.

use crate::types::{BarChartSpec, HistogramSpec, MarkerMapSpec, RenderedChart};
use carevis_common::Result;

/// Draws chart descriptions into images.
///
/// The aggregation and routing code only ever talks to this trait, so the
/// drawing backend can be swapped or mocked.
pub trait RenderSurface {
    /// Draws a bar chart.
    fn bar_chart(&self, spec: &BarChartSpec) -> Result<RenderedChart>;

    /// Draws a histogram with its density curve.
    fn histogram(&self, spec: &HistogramSpec) -> Result<RenderedChart>;

    /// Draws a marker map.
    fn marker_map(&self, spec: &MarkerMapSpec) -> Result<RenderedChart>;
}

impl<S: RenderSurface + ?Sized> RenderSurface for &S {
    fn bar_chart(&self, spec: &BarChartSpec) -> Result<RenderedChart> {
        (**self).bar_chart(spec)
    }

    fn histogram(&self, spec: &HistogramSpec) -> Result<RenderedChart> {
        (**self).histogram(spec)
    }

    fn marker_map(&self, spec: &MarkerMapSpec) -> Result<RenderedChart> {
        (**self).marker_map(spec)
    }
}
